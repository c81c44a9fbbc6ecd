//! Entry source module
//!
//! Lazily yields one [`Entry`] per line of a byte source without ever holding
//! the whole file in memory. Lines that fail to decode with the primary
//! encoding are recovered with an ISO-8859-1 fallback instead of being dropped.

use crate::error::{Result, SieveError};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Default read buffer for streamed input (1MB)
pub const DEFAULT_READ_BUFFER: usize = 1024 * 1024;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A single line of the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    raw: Vec<u8>,
    text: String,
    recovered: bool,
}

impl Entry {
    /// Build an entry from raw line bytes (terminator included, if any)
    pub fn decode(raw: Vec<u8>, decoder: &Decoder) -> Self {
        Self::decode_inner(raw, decoder, false)
    }

    fn decode_inner(raw: Vec<u8>, decoder: &Decoder, strip_bom: bool) -> Self {
        let mut content = strip_terminator(&raw);
        if strip_bom {
            content = content.strip_prefix(&UTF8_BOM[..]).unwrap_or(content);
        }
        let (decoded, recovered) = decoder.decode(content);
        let text = decoded.trim().to_string();
        Self {
            raw,
            text,
            recovered,
        }
    }

    /// Construct an entry directly from text, as if read from a UTF-8 line
    pub fn from_text(text: &str) -> Self {
        Self::decode(format!("{}\n", text).into_bytes(), &Decoder::default())
    }

    /// Bytes exactly as read, including the line terminator
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Decoded, whitespace-trimmed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the primary decoding failed and the fallback was used
    pub fn is_recovered(&self) -> bool {
        self.recovered
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Character length with an ASCII fast path
#[inline]
pub fn char_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Primary-then-fallback line decoder
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    primary: &'static Encoding,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            primary: encoding_rs::UTF_8,
        }
    }
}

impl Decoder {
    /// Create a decoder with a given primary encoding.
    ///
    /// Encodings that are not ASCII-compatible (UTF-16 variants) cannot be
    /// split on `\n` bytes, so they are replaced by UTF-8.
    pub fn new(primary: &'static Encoding) -> Self {
        if !primary.is_ascii_compatible() {
            log::warn!(
                "{} is not line-splittable, decoding as UTF-8 instead",
                primary.name()
            );
            return Self::default();
        }
        Self { primary }
    }

    pub fn primary(&self) -> &'static Encoding {
        self.primary
    }

    /// Decode one line. The flag is true when the fallback was needed.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> (Cow<'a, str>, bool) {
        if self.primary == encoding_rs::UTF_8 {
            if let Ok(s) = std::str::from_utf8(bytes) {
                return (Cow::Borrowed(s), false);
            }
        } else if let Some(s) = self
            .primary
            .decode_without_bom_handling_and_without_replacement(bytes)
        {
            return (s, false);
        }

        (encoding_rs::mem::decode_latin1(bytes), true)
    }
}

/// Detect the primary encoding of a file by sampling its first 64KB
pub fn detect_encoding(path: &Path) -> Result<&'static Encoding> {
    let file = File::open(path).map_err(|e| SieveError::input(path, e))?;
    let mut sample = Vec::with_capacity(64 * 1024);
    file.take(64 * 1024)
        .read_to_end(&mut sample)
        .map_err(|e| SieveError::input(path, e))?;

    if sample.is_empty() {
        return Ok(encoding_rs::UTF_8);
    }

    if let Some((encoding, _)) = Encoding::for_bom(&sample) {
        return Ok(encoding);
    }

    if std::str::from_utf8(&sample).is_ok() {
        return Ok(encoding_rs::UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&sample, sample.len() < 64 * 1024);
    Ok(detector.guess(None, true))
}

/// A forward-only stream of entries with a byte-progress signal
pub trait EntryStream: Iterator<Item = Result<Entry>> {
    /// Cumulative bytes consumed so far
    fn bytes_consumed(&self) -> u64;

    /// Total size of the source, when known
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}

/// Buffered line reader over any `BufRead`
pub struct EntryReader<R: BufRead> {
    reader: R,
    decoder: Decoder,
    path: PathBuf,
    consumed: u64,
    total: Option<u64>,
    at_start: bool,
    done: bool,
}

impl EntryReader<BufReader<File>> {
    /// Open a file for streaming
    pub fn open(path: &Path, decoder: Decoder, buffer_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| SieveError::input(path, e))?;
        let total = file.metadata().map(|m| m.len()).ok();

        let mut reader = Self::new(BufReader::with_capacity(buffer_size, file), decoder);
        reader.path = path.to_path_buf();
        reader.total = total;
        Ok(reader)
    }
}

impl<R: BufRead> EntryReader<R> {
    pub fn new(reader: R, decoder: Decoder) -> Self {
        Self {
            reader,
            decoder,
            path: PathBuf::from("<stream>"),
            consumed: 0,
            total: None,
            at_start: true,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for EntryReader<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = Vec::with_capacity(64);
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) => {
                self.consumed += n as u64;
                let strip_bom = std::mem::replace(&mut self.at_start, false);
                Some(Ok(Entry::decode_inner(line, &self.decoder, strip_bom)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(SieveError::input(&self.path, e)))
            }
        }
    }
}

impl<R: BufRead> EntryStream for EntryReader<R> {
    fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    fn total_bytes(&self) -> Option<u64> {
        self.total
    }
}

/// Memory-mapped entry source for large files
pub struct MmapEntries {
    mmap: Option<memmap2::Mmap>,
    decoder: Decoder,
    position: usize,
}

impl MmapEntries {
    pub fn open(path: &Path, decoder: Decoder) -> Result<Self> {
        let file = File::open(path).map_err(|e| SieveError::input(path, e))?;
        let len = file.metadata().map_err(|e| SieveError::input(path, e))?.len();

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the map is read-only and the file is not modified during the pass.
            Some(unsafe { memmap2::Mmap::map(&file) }.map_err(|e| SieveError::input(path, e))?)
        };

        Ok(Self {
            mmap,
            decoder,
            position: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }
}

impl Iterator for MmapEntries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let mmap = self.mmap.as_ref()?;
        if self.position >= mmap.len() {
            return None;
        }

        let remaining = &mmap[self.position..];
        let line_end = memchr::memchr(b'\n', remaining)
            .map(|i| i + 1)
            .unwrap_or(remaining.len());

        let strip_bom = self.position == 0;
        let raw = remaining[..line_end].to_vec();
        self.position += line_end;

        Some(Ok(Entry::decode_inner(raw, &self.decoder, strip_bom)))
    }
}

impl EntryStream for MmapEntries {
    fn bytes_consumed(&self) -> u64 {
        self.position as u64
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.size() as u64)
    }
}

/// How to open an input file
#[derive(Debug, Clone, Copy)]
pub struct SourceOptions {
    pub use_mmap: bool,
    pub auto_detect_encoding: bool,
    pub buffer_size: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            use_mmap: false,
            auto_detect_encoding: false,
            buffer_size: DEFAULT_READ_BUFFER,
        }
    }
}

/// Open `path` as an entry stream. Fails before any entry is produced if the
/// path is missing or unreadable.
pub fn open_entries(path: &Path, options: SourceOptions) -> Result<Box<dyn EntryStream>> {
    let decoder = if options.auto_detect_encoding {
        let encoding = detect_encoding(path)?;
        log::debug!("Detected encoding {} for {:?}", encoding.name(), path);
        Decoder::new(encoding)
    } else {
        Decoder::default()
    };

    if options.use_mmap {
        Ok(Box::new(MmapEntries::open(path, decoder)?))
    } else {
        Ok(Box::new(EntryReader::open(path, decoder, options.buffer_size)?))
    }
}
