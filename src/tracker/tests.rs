use super::*;
use std::net::{SocketAddr, ToSocketAddrs};

#[test]
fn test_compact_peer_v4() {
    let bytes = [192, 168, 1, 1, 0x1A, 0xE1]; // 192.168.1.1:6881
    let peer = PeerAddress::from_compact_v4(&bytes).unwrap();

    assert_eq!(peer.host, "192.168.1.1");
    assert_eq!(peer.port, 6881);
    assert_eq!(PeerAddress::from_compact_v4(&bytes[..5]), None);
}

#[test]
fn test_parse_compact_peers() {
    let data = [
        192, 168, 1, 1, 0x1A, 0xE1, // 192.168.1.1:6881
        10, 0, 0, 1, 0x1A, 0xE2, // 10.0.0.1:6882
    ];

    let peers = parse_compact_peers(&data).unwrap();
    assert_eq!(
        peers,
        vec![
            PeerAddress::new("192.168.1.1", 6881),
            PeerAddress::new("10.0.0.1", 6882)
        ]
    );
    assert!(parse_compact_peers(&[]).unwrap().is_empty());
}

#[test]
fn test_parse_compact_peers_bad_length() {
    let err = parse_compact_peers(&[1, 2, 3, 4, 5, 6, 7]).unwrap_err();
    assert!(matches!(
        err,
        TrackerError::InvalidCompactLength {
            len: 7,
            entry_len: 6
        }
    ));
}

#[test]
fn test_parse_compact_peers_v6() {
    let mut data = [0u8; 18];
    data[15] = 1;
    data[16..].copy_from_slice(&6881u16.to_be_bytes());

    let peers = parse_compact_peers_v6(&data).unwrap();
    assert_eq!(peers, vec![PeerAddress::new("::1", 6881)]);
    assert_eq!(peers[0].to_string(), "[::1]:6881");

    assert!(parse_compact_peers_v6(&data[..17]).is_err());
}

#[test]
fn test_peer_address_display_and_resolve() {
    let addr: SocketAddr = "127.0.0.1:6881".parse().unwrap();
    let peer = PeerAddress::from(addr);
    assert_eq!(peer.to_string(), "127.0.0.1:6881");

    let resolved: Vec<SocketAddr> = peer.to_socket_addrs().unwrap().collect();
    assert_eq!(resolved, vec![addr]);
}
