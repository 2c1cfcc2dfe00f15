//! PDF header sniffing.
//!
//! Readers accept a `%PDF-x.y` marker anywhere in the first kilobyte, so a
//! few bytes of leading garbage (common with files produced by mail
//! gateways) do not make a document unreadable.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_WINDOW: usize = 1024;

/// Read the header window of a file and return the declared PDF version.
pub fn sniff_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = Vec::with_capacity(HEADER_WINDOW);
    File::open(path)?
        .take(HEADER_WINDOW as u64)
        .read_to_end(&mut header)?;
    sniff_version(&header)
}

/// Return the declared PDF version (e.g. "1.7") found in `data`.
pub fn sniff_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = window
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;

    match version {
        [major @ b'1'..=b'2', b'.', minor @ b'0'..=b'9'] if !(*major == b'2' && *minor != b'0') => {
            Ok(format!("{}.{}", *major as char, *minor as char))
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Whether `data` carries a readable PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_version(data).is_ok()
}
