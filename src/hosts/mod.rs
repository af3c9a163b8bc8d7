//! Hosts file text format: parse into entries and regenerate.

pub mod parser;
pub mod serializer;

pub use parser::{parse, parse_lines, Line};
pub use serializer::serialize;

/// Comment marker for disabled entries and annotations.
pub const COMMENT_MARKER: char = '#';

/// Header lines written at the top of every generated file.
pub const MANAGED_HEADER: [&str; 2] = [
    "# /etc/hosts - Managed by HostPilot",
    "# Do not edit manually unless you know what you are doing",
];
