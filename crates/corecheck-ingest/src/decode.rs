//! Multi-encoding text decoding.
//!
//! Source exports arrive as cp932/Shift_JIS from the office systems or as
//! UTF-8 (with or without BOM) from newer tooling. Decoding tries a fixed
//! ordered list of encodings strictly until one accepts the byte stream.

use std::path::Path;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

use crate::error::{IngestError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Candidate encodings, tried in order.
const CANDIDATES: &[(&str, &Encoding)] = &[("cp932", SHIFT_JIS), ("utf-8", UTF_8)];

/// Decode file bytes to text, returning the text and the name of the
/// encoding that accepted it.
///
/// A UTF-8 BOM short-circuits the candidate list (the BOM bytes would
/// otherwise decode as cp932 mojibake); it is stripped from the result.
pub fn decode_text(path: &Path, bytes: &[u8]) -> Result<(String, &'static str)> {
    if bytes.starts_with(&UTF8_BOM) {
        return match UTF_8.decode_without_bom_handling_and_without_replacement(&bytes[3..]) {
            Some(text) => Ok((text.into_owned(), "utf-8-sig")),
            None => Err(IngestError::Encoding {
                path: path.to_path_buf(),
            }),
        };
    }
    for (name, encoding) in CANDIDATES.iter().copied() {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            tracing::debug!(path = %path.display(), encoding = name, "decoded");
            return Ok((text.into_owned(), name));
        }
    }
    Err(IngestError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Read a file and decode it through the candidate encodings.
pub fn read_decoded(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    decode_text(path, &bytes).map(|(text, _)| text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_decodes_as_cp932() {
        let (text, encoding) = decode_text(Path::new("x.csv"), b"code,name\n1,a\n").unwrap();
        assert_eq!(encoding, "cp932");
        assert_eq!(text, "code,name\n1,a\n");
    }

    #[test]
    fn shift_jis_bytes_decode() {
        // 顧客番号 in Shift_JIS
        let bytes: &[u8] = &[0x8C, 0xDA, 0x8B, 0x71, 0x94, 0xD4, 0x8D, 0x86];
        let (text, encoding) = decode_text(Path::new("x.csv"), bytes).unwrap();
        assert_eq!(encoding, "cp932");
        assert_eq!(text, "顧客番号");
    }

    #[test]
    fn utf8_bom_short_circuits() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("顧客番号".as_bytes());
        let (text, encoding) = decode_text(Path::new("x.csv"), &bytes).unwrap();
        assert_eq!(encoding, "utf-8-sig");
        assert_eq!(text, "顧客番号");
    }

    #[test]
    fn plain_utf8_falls_through_when_cp932_rejects() {
        // あいうえお in UTF-8: repeated E3 81 xx sequences are not valid
        // Shift_JIS, so the fallback must land on utf-8.
        let bytes = "あいうえお".as_bytes();
        let (text, encoding) = decode_text(Path::new("x.csv"), bytes).unwrap();
        assert_eq!(encoding, "utf-8");
        assert_eq!(text, "あいうえお");
    }
}
