use super::*;
use crate::bencode::ErrorKind;
use sha1::{Digest, Sha1};
use std::io::Write;

const SINGLE_FILE: &[u8] = b"d8:announce18:http://tracker.com4:infod4:name12:testfile.txt12:piece lengthi524288e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";
const SINGLE_FILE_INFO: &[u8] =
    b"d4:name12:testfile.txt12:piece lengthi524288e6:pieces20:aaaaaaaaaaaaaaaaaaaae";

fn sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

#[test]
fn test_parse_single_file() {
    let torrent = Torrent::from_bytes(SINGLE_FILE).unwrap();

    assert_eq!(torrent.announce.as_deref(), Some("http://tracker.com"));
    assert!(torrent.announce_list.is_empty());
    assert_eq!(torrent.info.name, "testfile.txt");
    assert_eq!(torrent.info.piece_length, 524288);
    assert_eq!(torrent.info.pieces.len(), 20);
    assert_eq!(torrent.info.piece_count(), 1);
    assert_eq!(torrent.info.piece_hash(0), Some([b'a'; 20]));
    assert_eq!(torrent.info.piece_hash(1), None);
    assert!(!torrent.info.is_multi_file());
    assert_eq!(torrent.info.payload, Payload::SingleFile { length: 0 });
}

#[test]
fn test_info_hash_uses_original_bytes() {
    let torrent = Torrent::from_bytes(SINGLE_FILE).unwrap();

    assert_eq!(torrent.info.raw_bytes().as_ref(), SINGLE_FILE_INFO);
    assert_eq!(torrent.info.hash(), sha1(SINGLE_FILE_INFO));
    assert_eq!(torrent.info.hash(), torrent.info.hash());
    assert_eq!(torrent.info.info_hash().as_bytes(), &sha1(SINGLE_FILE_INFO));
}

#[test]
fn test_info_hash_non_canonical_info() {
    // Keys out of order: a canonical re-encode would produce different bytes.
    let info = b"d4:name1:x6:lengthi5e12:piece lengthi1ee";
    let mut data = b"d4:info".to_vec();
    data.extend_from_slice(info);
    data.push(b'e');

    let torrent = Torrent::from_bytes(&data).unwrap();
    assert_eq!(torrent.info.hash(), sha1(info));
    assert_eq!(torrent.info.payload, Payload::SingleFile { length: 5 });
}

#[test]
fn test_parse_multi_file() {
    let data = b"d4:infod5:filesld6:lengthi10e4:pathl3:dir5:a.binee\
                 d6:lengthi20e4:pathl5:b.bineei7ed6:lengthi1eee\
                 4:name4:root12:piece lengthi16384e6:pieces0:ee";
    let torrent = Torrent::from_bytes(data).unwrap();
    let info = &torrent.info;

    assert!(info.is_multi_file());
    assert_eq!(info.name, "root");
    assert_eq!(info.total_length(), 31);
    match &info.payload {
        Payload::MultiFile { files } => {
            // The integer entry is skipped; the path-less entry is kept.
            assert_eq!(files.len(), 3);
            assert_eq!(files[0].path, vec!["dir", "a.bin"]);
            assert_eq!(files[0].length, 10);
            assert_eq!(files[1].path, vec!["b.bin"]);
            assert!(files[2].path.is_empty());
        }
        _ => panic!("expected multi-file payload"),
    }
}

#[test]
fn test_announce_list_skips_malformed_entries() {
    let data = b"d13:announce-listll3:udp3:tcpei5el4:httpi1eelee4:infod4:name1:xee";
    let torrent = Torrent::from_bytes(data).unwrap();

    assert_eq!(torrent.announce, None);
    assert_eq!(
        torrent.announce_list,
        vec![vec!["udp".to_string(), "tcp".to_string()], vec!["http".to_string()], vec![]]
    );
}

#[test]
fn test_trackers_dedup() {
    let data = b"d8:announce1:a13:announce-listll1:a1:bel1:cee4:infod4:name1:xee";
    let torrent = Torrent::from_bytes(data).unwrap();
    assert_eq!(torrent.trackers(), vec!["a", "b", "c"]);
}

#[test]
fn test_missing_info_dict() {
    let err = Torrent::from_bytes(b"d8:announce1:ae").unwrap_err();
    assert!(matches!(err, MetainfoError::MissingInfoDict));

    let err = Torrent::from_bytes(b"d4:infoi1ee").unwrap_err();
    assert!(matches!(err, MetainfoError::MissingInfoDict));
}

#[test]
fn test_not_a_dictionary() {
    let err = Torrent::from_bytes(b"li1ee").unwrap_err();
    assert!(matches!(err, MetainfoError::NotADictionary));
}

#[test]
fn test_invalid_bencode() {
    let err = Torrent::from_bytes(b"d4:infod4:name1:x").unwrap_err();
    match err {
        MetainfoError::Bencode(e) => assert_eq!(e.kind(), ErrorKind::UnterminatedDict),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mistyped_fields_default() {
    let data = b"d8:announcei1e4:infod4:namei1e12:piece length1:x6:pieces3:abc6:length2:noee";
    let torrent = Torrent::from_bytes(data).unwrap();

    assert_eq!(torrent.announce, None);
    assert_eq!(torrent.info.name, "");
    assert_eq!(torrent.info.piece_length, 0);
    assert!(torrent.info.pieces.is_empty());
    assert_eq!(torrent.info.payload, Payload::SingleFile { length: 0 });
}

#[test]
fn test_trailing_data_policy() {
    let mut data = SINGLE_FILE.to_vec();
    data.extend_from_slice(b"garbage");

    let torrent = Torrent::from_bytes(&data).unwrap();
    assert_eq!(torrent.info.hash(), sha1(SINGLE_FILE_INFO));

    assert_eq!(ParseOptions::default().trailing_data, TrailingData::Ignore);

    let warn = ParseOptions {
        trailing_data: TrailingData::Warn,
    };
    assert!(Torrent::from_bytes_with(&data, warn).is_ok());

    let err = Torrent::from_bytes_with(&data, ParseOptions::strict()).unwrap_err();
    match err {
        MetainfoError::TrailingData { consumed, total } => {
            assert_eq!(consumed, SINGLE_FILE.len());
            assert_eq!(total, data.len());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(Torrent::from_bytes_with(SINGLE_FILE, ParseOptions::strict()).is_ok());
}

#[test]
fn test_from_file_and_reader() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SINGLE_FILE).unwrap();

    let from_file = Torrent::from_file(file.path()).unwrap();
    let from_reader = Torrent::from_reader(SINGLE_FILE).unwrap();
    assert_eq!(from_file, from_reader);

    let err = Torrent::from_file(file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(err, MetainfoError::Io(_)));
}

#[test]
fn test_display_summary() {
    let torrent = Torrent::from_bytes(SINGLE_FILE).unwrap();
    let summary = torrent.to_string();

    assert!(summary.contains("Announce: http://tracker.com"));
    assert!(summary.contains("Name: testfile.txt"));
    assert!(summary.contains("Pieces: 1 pieces (20 bytes total)"));
    assert!(summary.contains(&torrent.info.info_hash().to_hex()));
}

#[test]
fn test_info_hash_hex() {
    let hex = "0123456789abcdef0123456789abcdef01234567";
    let hash = InfoHash::from_hex(hex).unwrap();
    assert_eq!(hash.to_hex(), hex);
    assert_eq!(hash.to_string(), hex);
    assert_eq!(hash.as_bytes()[0], 0x01);

    assert!(InfoHash::from_hex("0123").is_err());
    assert!(InfoHash::from_hex("zz23456789abcdef0123456789abcdef01234567").is_err());
}

#[test]
fn test_info_hash_url_encoded() {
    let hash = InfoHash::from_bytes([0xab; 20]);
    assert_eq!(hash.url_encoded(), "%AB".repeat(20));
}
