//! IPv4/IPv6 shape validation.

use hostpilot::validate::{is_valid_ip, is_valid_ipv4, is_valid_ipv6, looks_like_ip};

#[test]
fn ipv4_accepts_dotted_quads_in_range() {
    assert!(is_valid_ipv4("127.0.0.1"));
    assert!(is_valid_ipv4("0.0.0.0"));
    assert!(is_valid_ipv4("255.255.255.255"));
    assert!(is_valid_ipv4("010.001.0.1"), "leading zeros accepted as-is");
}

#[test]
fn ipv4_rejects_out_of_range_and_wrong_shape() {
    assert!(!is_valid_ipv4("256.1.1.1"));
    assert!(!is_valid_ipv4("1.2.3"));
    assert!(!is_valid_ipv4("1.2.3.4.5"));
    assert!(!is_valid_ipv4("1..3.4"));
    assert!(!is_valid_ipv4("a.b.c.d"));
    assert!(!is_valid_ipv4("1234.1.1.1"));
    assert!(!is_valid_ipv4(""));
}

#[test]
fn ipv6_full_form_and_loopback_only() {
    assert!(is_valid_ipv6("::1"));
    assert!(is_valid_ipv6("fe80:0:0:0:0:0:0:1"));
    assert!(is_valid_ipv6("2001:0DB8:85a3:0000:0000:8A2E:0370:7334"));
    assert!(!is_valid_ipv6("fe80::1"), "zero compression is not expanded");
    assert!(!is_valid_ipv6("12345:0:0:0:0:0:0:1"));
    assert!(!is_valid_ipv6("g:0:0:0:0:0:0:1"));
}

#[test]
fn combined_ip_check() {
    assert!(is_valid_ip("10.0.0.5"));
    assert!(is_valid_ip("::1"));
    assert!(!is_valid_ip("localhost"));
}

#[test]
fn parse_time_shape_is_looser() {
    assert!(looks_like_ip("999.1.1.1"));
    assert!(looks_like_ip("fe80::1%lo0"));
    assert!(!looks_like_ip("localhost"));
    assert!(!looks_like_ip("1.2.3"));
}
