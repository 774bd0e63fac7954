use std::net::Ipv4Addr;

use tinyhttpd::http::stream::PeekReader;
use tinyhttpd::netconfig::{NetConfig, NetConfigError};

fn parse(text: &str) -> Result<NetConfig, NetConfigError> {
    NetConfig::parse(&mut PeekReader::new(text.as_bytes()))
}

#[test]
fn test_parse_full_config() {
    let text = "\
# board settings
h 90:A2:da:00:12:34
i 192.168.1.177
m 255.255.255.0
g 192.168.1.1
d 8.8.8.8
";
    let cfg = parse(text).unwrap();

    assert_eq!(cfg.mac, Some([0x90, 0xa2, 0xda, 0x00, 0x12, 0x34]));
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(192, 168, 1, 177)));
    assert_eq!(cfg.netmask, Some(Ipv4Addr::new(255, 255, 255, 0)));
    assert_eq!(cfg.gateway, Some(Ipv4Addr::new(192, 168, 1, 1)));
    assert_eq!(cfg.dns, Some(Ipv4Addr::new(8, 8, 8, 8)));
}

#[test]
fn test_parse_tags_without_space() {
    let cfg = parse("h00:11:22:33:44:55\ni10.0.0.2\n").unwrap();

    assert_eq!(cfg.mac, Some([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]));
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(10, 0, 0, 2)));
}

#[test]
fn test_parse_mac_any_separator() {
    let cfg = parse("h 01-02-03-04-05-06\n").unwrap();
    assert_eq!(cfg.mac, Some([1, 2, 3, 4, 5, 6]));
}

#[test]
fn test_missing_fields_stay_unset() {
    let cfg = parse("i 10.0.0.5\n").unwrap();
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(10, 0, 0, 5)));
    assert_eq!(cfg.mac, None);
    assert_eq!(cfg.gateway, None);
}

#[test]
fn test_unknown_characters_are_skipped() {
    let cfg = parse("x\ni 10.0.0.5\n").unwrap();
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(10, 0, 0, 5)));
}

#[test]
fn test_comment_lines_are_skipped() {
    let cfg = parse("# i 1.1.1.1\ni 2.2.2.2\n").unwrap();
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(2, 2, 2, 2)));
}

#[test]
fn test_bad_address_is_an_error() {
    assert!(matches!(
        parse("g 192.168.1\n"),
        Err(NetConfigError::Address { field: 'g' })
    ));
}

#[test]
fn test_bad_mac_is_an_error() {
    assert!(matches!(
        parse("h 00:11:zz:33:44:55\n"),
        Err(NetConfigError::HardwareAddress)
    ));
    assert!(matches!(parse("h 00:11"), Err(NetConfigError::HardwareAddress)));
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        NetConfig::load("/no/such/config.txt"),
        Err(NetConfigError::Io(_))
    ));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.txt");
    std::fs::write(&path, "i 172.16.0.9\n").unwrap();

    let cfg = NetConfig::load(&path).unwrap();
    assert_eq!(cfg.ip, Some(Ipv4Addr::new(172, 16, 0, 9)));
}
