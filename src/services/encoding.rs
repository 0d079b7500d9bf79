use std::fs;
use std::path::Path;

use encoding_rs::UTF_8;

use crate::error::{L10nError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads a UTF-8 text file, dropping a leading byte-order mark if present.
pub fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| L10nError::io(path, e))?;

    if !bytes.starts_with(UTF8_BOM) {
        tracing::debug!(path = %path.display(), "no UTF-8 byte-order mark");
    }

    let (text, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(L10nError::parse(path, "file is not valid UTF-8"));
    }

    Ok(text.into_owned())
}

/// Encodes text the way the game expects its document: BOM, CRLF line endings.
pub fn encode_bom_crlf(text: &str) -> Vec<u8> {
    let normalized = text.replace("\r\n", "\n").replace('\n', "\r\n");

    let mut out = Vec::with_capacity(UTF8_BOM.len() + normalized.len());
    out.extend_from_slice(UTF8_BOM);
    out.extend_from_slice(normalized.as_bytes());
    out
}
