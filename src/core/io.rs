//! I/O helpers for range files
//!
//! Opens plain, gzip or bzip2 input with a buffer sized to the file, memory
//! mapping large uncompressed files, and provides a buffered output sink.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Buffer size for inputs over 10MB (1MB)
const LARGE_BUFFER_SIZE: usize = 1024 * 1024;

/// Plain files at least this large are memory mapped (100MB)
const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// I/O strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Use buffered reading with configurable buffer size
    Buffered(usize),
    /// Use memory mapping for the entire file (plain files only)
    MemoryMapped,
    /// Automatically select based on file size
    #[default]
    Auto,
}

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
///
/// - .gz extension or gzip magic bytes (1f 8b)
/// - .bz2 extension or bzip2 magic bytes (42 5a 68)
/// - Plain text otherwise
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    if bytes_read >= 3 && magic == *b"BZh" {
        return Ok(CompressionFormat::Bzip2);
    }
    Ok(CompressionFormat::Plain)
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    /// Create a new memory-mapped reader
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

/// A reader that picks decompression and buffering for the input file
pub enum SmartReader {
    /// Buffered reader for plain files
    Buffered(BufReader<File>),
    /// Memory-mapped reader for large plain files
    Mapped(MappedReader),
    Gzip(BufReader<GzDecoder<File>>),
    Bzip2(BufReader<BzDecoder<File>>),
}

impl SmartReader {
    /// Open a file with the specified I/O strategy
    pub fn open<P: AsRef<Path>>(path: P, strategy: IoStrategy) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        let buf_size = match strategy {
            IoStrategy::Buffered(size) => size,
            _ if file_size > 10 * 1024 * 1024 => LARGE_BUFFER_SIZE,
            _ => DEFAULT_BUFFER_SIZE,
        };

        match format {
            CompressionFormat::Gzip => Ok(SmartReader::Gzip(BufReader::with_capacity(
                buf_size,
                GzDecoder::new(file),
            ))),
            CompressionFormat::Bzip2 => Ok(SmartReader::Bzip2(BufReader::with_capacity(
                buf_size,
                BzDecoder::new(file),
            ))),
            CompressionFormat::Plain => match strategy {
                IoStrategy::MemoryMapped => Ok(SmartReader::Mapped(MappedReader::new(&file)?)),
                IoStrategy::Auto if file_size >= MMAP_THRESHOLD => {
                    Ok(SmartReader::Mapped(MappedReader::new(&file)?))
                }
                _ => Ok(SmartReader::Buffered(BufReader::with_capacity(buf_size, file))),
            },
        }
    }

    /// Open with default auto strategy
    pub fn open_auto<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open(path, IoStrategy::Auto)
    }

    /// Check if using memory mapping
    pub fn is_mapped(&self) -> bool {
        matches!(self, SmartReader::Mapped(_))
    }

    pub fn compression(&self) -> CompressionFormat {
        match self {
            SmartReader::Buffered(_) | SmartReader::Mapped(_) => CompressionFormat::Plain,
            SmartReader::Gzip(_) => CompressionFormat::Gzip,
            SmartReader::Bzip2(_) => CompressionFormat::Bzip2,
        }
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartReader::Buffered(reader) => reader.read(buf),
            SmartReader::Mapped(reader) => reader.read(buf),
            SmartReader::Gzip(reader) => reader.read(buf),
            SmartReader::Bzip2(reader) => reader.read(buf),
        }
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SmartReader::Buffered(reader) => reader.fill_buf(),
            SmartReader::Mapped(reader) => reader.fill_buf(),
            SmartReader::Gzip(reader) => reader.fill_buf(),
            SmartReader::Bzip2(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SmartReader::Buffered(reader) => reader.consume(amt),
            SmartReader::Mapped(reader) => reader.consume(amt),
            SmartReader::Gzip(reader) => reader.consume(amt),
            SmartReader::Bzip2(reader) => reader.consume(amt),
        }
    }
}

/// Byte line iterator for zero-copy parsing
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes, without its line terminator
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Buffered writer to a file, or to stdout when no path is given
pub fn create_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            File::create(p)?,
        ))),
        None => Ok(Box::new(BufWriter::with_capacity(
            DEFAULT_BUFFER_SIZE,
            io::stdout().lock(),
        ))),
    }
}
