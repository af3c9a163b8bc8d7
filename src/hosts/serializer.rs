//! Regenerate hosts file text from entries.

use crate::entry::HostEntry;

use super::MANAGED_HEADER;

/// Managed header, a blank line, then one line per entry. Always ends with a single newline.
pub fn serialize(entries: &[HostEntry]) -> String {
    let mut lines: Vec<String> = MANAGED_HEADER.iter().map(|s| s.to_string()).collect();
    lines.push(String::new());
    lines.extend(entries.iter().map(entry_line));
    format!("{}\n", lines.join("\n"))
}

/// `<ip>\t<domain>[\t# <comment>][ [<tag>]]`, prefixed with `# ` when disabled.
pub fn entry_line(entry: &HostEntry) -> String {
    let mut line = format!("{}\t{}", entry.ip, entry.domain);
    if !entry.comment.is_empty() {
        line.push_str(&format!("\t# {}", entry.comment));
    }
    if let Some(tag) = entry.project_tag.as_deref().filter(|t| !t.is_empty()) {
        line.push_str(&format!(" [{tag}]"));
    }
    if !entry.enabled {
        line.insert_str(0, "# ");
    }
    line
}
