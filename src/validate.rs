//! IP and domain shape checks for user-entered data.

/// Longest domain accepted.
pub const MAX_DOMAIN_LEN: usize = 253;

/// Four dot-separated decimal groups, each in 0..=255. Leading zeros are accepted as-is.
pub fn is_valid_ipv4(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    if groups.len() != 4 {
        return false;
    }
    groups.iter().all(|g| {
        !g.is_empty()
            && g.len() <= 3
            && g.chars().all(|c| c.is_ascii_digit())
            && g.parse::<u16>().map(|n| n <= 255).unwrap_or(false)
    })
}

/// Eight colon-separated groups of 1-4 hex digits, or the loopback `::1`.
///
/// Zero-compressed forms other than `::1` are rejected.
pub fn is_valid_ipv6(s: &str) -> bool {
    if s == "::1" {
        return true;
    }
    let groups: Vec<&str> = s.split(':').collect();
    groups.len() == 8
        && groups
            .iter()
            .all(|g| (1..=4).contains(&g.len()) && g.chars().all(|c| c.is_ascii_hexdigit()))
}

pub fn is_valid_ip(s: &str) -> bool {
    is_valid_ipv4(s) || is_valid_ipv6(s)
}

/// Alphanumerics, dots and hyphens; must start and end with an alphanumeric.
/// `localhost` is always valid.
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if s == "localhost" {
        return true;
    }
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'-')
}

/// Looser IP check used when reading existing files: dotted-quad shape or anything with a colon.
pub fn looks_like_ip(s: &str) -> bool {
    if s.contains(':') {
        return true;
    }
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()))
}
