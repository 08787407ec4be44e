// McPlaytime - core/backscan.rs
//
// Backward chunked pattern search over a seekable byte stream.
// Core layer: accepts Read + Seek trait objects, never touches the filesystem.
//
// The scan walks from end-of-stream toward offset 0 in fixed-size chunks and
// searches each chunk joined with the chunk read just before it (which lies
// immediately after it in the stream), so a match straddling a chunk boundary
// is still seen. Each step reads only the bytes between the new cursor and the
// old one; nothing is read twice, so a match cannot be reported from a stale
// overlap. Cost is proportional to the distance from EOF to the last match,
// not to file size.

use regex::bytes::{Captures, Regex};
use std::io::{self, Read, Seek, SeekFrom};

/// The last occurrence of a pattern located by [`find_last_match`].
///
/// Offsets are absolute byte positions in the scanned stream. Capture groups
/// are copied out of the scan buffer and decoded lossily, so stray non-UTF-8
/// bytes in a log never cause an error here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackwardMatch {
    start: u64,
    end: u64,
    /// Group 0 is the whole match, as with `regex::Captures`.
    groups: Vec<Option<String>>,
    names: Vec<Option<String>>,
}

impl BackwardMatch {
    fn from_captures(pattern: &Regex, caps: &Captures<'_>, window_offset: u64) -> Option<Self> {
        let whole = caps.get(0)?;
        let groups = caps
            .iter()
            .map(|g| g.map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned()))
            .collect();
        let names = pattern
            .capture_names()
            .map(|n| n.map(str::to_owned))
            .collect();
        Some(Self {
            start: window_offset + whole.start() as u64,
            end: window_offset + whole.end() as u64,
            groups,
            names,
        })
    }

    /// Absolute byte offset where the match starts.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Absolute byte offset one past the end of the match.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// The full matched text.
    pub fn as_str(&self) -> &str {
        self.groups
            .first()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    /// Capture group by index (0 = whole match).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(Option::as_deref)
    }

    /// Capture group by name.
    pub fn name(&self, name: &str) -> Option<&str> {
        let index = self
            .names
            .iter()
            .position(|n| n.as_deref() == Some(name))?;
        self.get(index)
    }
}

/// Find the last occurrence of `pattern` in `stream` by scanning backward
/// from the end in `chunk_size`-byte steps.
///
/// `chunk_size` must be at least the longest possible match length, otherwise
/// a match spanning more than two chunks can be missed. Within the first
/// window that contains any match, the non-overlapping occurrence with the
/// highest start offset is returned.
///
/// The stream position is restored to its entry value on every return path,
/// so callers can treat this as a non-destructive peek.
///
/// # Errors
/// Returns `InvalidInput` for a zero `chunk_size`, or any I/O error raised
/// while seeking or reading.
pub fn find_last_match<S>(
    stream: &mut S,
    pattern: &Regex,
    chunk_size: usize,
) -> io::Result<Option<BackwardMatch>>
where
    S: Read + Seek + ?Sized,
{
    if chunk_size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "backward scan chunk size must be non-zero",
        ));
    }

    let origin = stream.stream_position()?;
    let result = scan_backward(stream, pattern, chunk_size);
    let restored = stream.seek(SeekFrom::Start(origin));

    // A scan error is more informative than a failed restore, so report it first.
    let found = result?;
    restored?;
    Ok(found)
}

fn scan_backward<S>(
    stream: &mut S,
    pattern: &Regex,
    chunk_size: usize,
) -> io::Result<Option<BackwardMatch>>
where
    S: Read + Seek + ?Sized,
{
    let mut cursor = stream.seek(SeekFrom::End(0))?;
    let mut previous: Vec<u8> = Vec::with_capacity(chunk_size);
    let mut window: Vec<u8> = Vec::with_capacity(chunk_size * 2);

    while cursor > 0 {
        let chunk_start = cursor.saturating_sub(chunk_size as u64);
        // Bounded by chunk_size, so the cast cannot truncate.
        let chunk_len = (cursor - chunk_start) as usize;

        stream.seek(SeekFrom::Start(chunk_start))?;
        window.clear();
        window.resize(chunk_len, 0);
        stream.read_exact(&mut window)?;
        window.extend_from_slice(&previous);

        let last = pattern
            .captures_iter(&window)
            .last()
            .and_then(|caps| BackwardMatch::from_captures(pattern, &caps, chunk_start));
        if let Some(found) = last {
            tracing::trace!(
                offset = found.start(),
                text = found.as_str(),
                "Backward scan matched"
            );
            return Ok(Some(found));
        }

        previous.clear();
        previous.extend_from_slice(&window[..chunk_len]);
        cursor = chunk_start;
    }

    Ok(None)
}
