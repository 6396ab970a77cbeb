use std::io::Write;

use corecheck_ingest::read_rows;

/// 顧客番号 in Shift_JIS.
const HEADER_SJIS: [u8; 8] = [0x8C, 0xDA, 0x8B, 0x71, 0x94, 0xD4, 0x8D, 0x86];

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn shift_jis_and_utf8_files_load_identically() {
    let mut sjis = HEADER_SJIS.to_vec();
    sjis.extend_from_slice(b"\nA001\nA002\n");

    let mut utf8 = "顧客番号".as_bytes().to_vec();
    utf8.extend_from_slice(b"\nA001\nA002\n");

    let mut utf8_bom = vec![0xEF, 0xBB, 0xBF];
    utf8_bom.extend_from_slice(&utf8);

    let from_sjis = read_rows(write_temp(&sjis).path()).unwrap();
    let from_utf8 = read_rows(write_temp(&utf8).path()).unwrap();
    let from_utf8_bom = read_rows(write_temp(&utf8_bom).path()).unwrap();

    assert_eq!(from_sjis, from_utf8);
    assert_eq!(from_utf8, from_utf8_bom);
    assert_eq!(from_sjis.len(), 2);
    assert_eq!(from_sjis[0].get("顧客番号").map(String::as_str), Some("A001"));
}

#[test]
fn undecodable_bytes_error() {
    // 0x81 opens a Shift_JIS pair but 0x0A is no valid trail byte, and the
    // same sequence is not UTF-8 either.
    let file = write_temp(&[0x63, 0x6F, 0x64, 0x65, 0x0A, 0x81, 0x0A]);
    let err = read_rows(file.path()).unwrap_err();
    assert!(err.to_string().contains("could not decode"));
}
