//! Parsing real-world hosts text into entries.

use hostpilot::hosts::{parse, parse_lines, Line};

#[test]
fn end_to_end_example() {
    let text = "127.0.0.1\tlocalhost\n# 10.0.0.5\tdb.internal\t# MySQL [Database]\n";
    let entries = parse(text);
    assert_eq!(entries.len(), 2);

    let a = &entries[0];
    assert_eq!(a.ip, "127.0.0.1");
    assert_eq!(a.domain, "localhost");
    assert!(a.enabled);
    assert_eq!(a.project_tag, None);
    assert_eq!(a.comment, "");
    assert_eq!(a.source_line, Some(0));

    let b = &entries[1];
    assert_eq!(b.ip, "10.0.0.5");
    assert_eq!(b.domain, "db.internal");
    assert!(!b.enabled);
    assert_eq!(b.project_tag.as_deref(), Some("Database"));
    assert_eq!(b.comment, "MySQL");
    assert_eq!(b.source_line, Some(1));
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    let text = "\n# This is a comment\n   \n##\n192.168.1.10 nas.lan\n";
    let entries = parse(text);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].domain, "nas.lan");
    assert_eq!(entries[0].source_line, Some(4), "blank lines count toward the index");
}

#[test]
fn single_token_lines_produce_nothing() {
    assert!(parse("127.0.0.1\n").is_empty());
}

#[test]
fn non_ip_first_token_is_dropped() {
    assert!(parse("# see man 5 hosts\n").is_empty());
}

#[test]
fn colon_addresses_are_accepted_without_strict_validation() {
    let entries = parse("::1 localhost ip6-localhost\nfe80::1%lo0 link.local\n");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].ip, "::1");
    assert_eq!(entries[0].comment, "ip6-localhost", "extra aliases become comment text");
    assert_eq!(entries[1].ip, "fe80::1%lo0");
}

#[test]
fn project_tag_without_comment() {
    let entries = parse("127.0.0.1\tapi.test [Local Dev]\n");
    assert_eq!(entries[0].project_tag.as_deref(), Some("Local Dev"));
    assert_eq!(entries[0].comment, "");
}

#[test]
fn bracket_not_at_end_is_not_a_tag() {
    let entries = parse("127.0.0.1 a.test # see [docs] here\n");
    assert_eq!(entries[0].project_tag, None);
    assert_eq!(entries[0].comment, "see [docs] here");
}

#[test]
fn tag_starts_at_leftmost_open_bracket() {
    let entries = parse("127.0.0.1 a.test # x [b [c]\n");
    assert_eq!(entries[0].project_tag.as_deref(), Some("b [c"));
    assert_eq!(entries[0].comment, "x");

    let entries = parse("127.0.0.1 a.test # see [docs] [Dev]\n");
    assert_eq!(entries[0].project_tag.as_deref(), Some("Dev"));
    assert_eq!(entries[0].comment, "see [docs]");

    let entries = parse("127.0.0.1 a.test []\n");
    assert_eq!(entries[0].project_tag, None);
}

#[test]
fn ids_are_unique() {
    let entries = parse("127.0.0.1 a.test\n127.0.0.1 b.test\n");
    assert_ne!(entries[0].id, entries[1].id);
}

#[test]
fn managed_header_is_recognised() {
    let text = "# /etc/hosts - Managed by HostPilot\n\
                # Do not edit manually unless you know what you are doing\n\
                \n\
                127.0.0.1\tlocalhost\n\
                # just words\n";
    let lines = parse_lines(text);
    assert_eq!(lines[0], Line::Header);
    assert_eq!(lines[1], Line::Header);
    assert_eq!(lines[2], Line::Blank);
    assert!(matches!(lines[3], Line::Entry(_)));
    assert_eq!(lines[4], Line::Other("# just words".to_string()));
}
