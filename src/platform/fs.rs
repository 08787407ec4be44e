// McPlaytime - platform/fs.rs
//
// Opening log files for scanning. Plain logs are read through a buffered
// file handle; `.log.gz` archives are inflated into memory so the backward
// scan can seek freely (gzip streams are forward-only).

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek};
use std::path::Path;

/// A readable, seekable, buffered log stream.
pub trait LogSource: BufRead + Seek {}

impl<T: BufRead + Seek> LogSource for T {}

/// Open a log file, decompressing it transparently when `compressed` is set.
///
/// The returned handle owns the underlying file; dropping it closes the file
/// on every path, including early returns on error.
///
/// # Errors
/// Any open/read error, a corrupt or truncated gzip stream, or an archive that
/// inflates to more than `max_decompressed_bytes` (`InvalidData`).
pub fn open_log(
    path: &Path,
    compressed: bool,
    max_decompressed_bytes: u64,
) -> io::Result<Box<dyn LogSource>> {
    let file = File::open(path)?;

    if !compressed {
        return Ok(Box::new(BufReader::new(file)));
    }

    let mut inflated = Vec::new();
    MultiGzDecoder::new(BufReader::new(file))
        .take(max_decompressed_bytes.saturating_add(1))
        .read_to_end(&mut inflated)?;

    if inflated.len() as u64 > max_decompressed_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("decompressed log exceeds {max_decompressed_bytes} bytes"),
        ));
    }

    tracing::trace!(
        file = %path.display(),
        inflated_bytes = inflated.len(),
        "Decompressed log into memory"
    );
    Ok(Box::new(Cursor::new(inflated)))
}
