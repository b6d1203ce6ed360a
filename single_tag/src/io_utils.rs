use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const GZ_BUF_SIZE: usize = 1 << 20;

pub fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a (possibly gzipped) file into a BufReader.
pub fn open_with_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path).with_context(|| path.display().to_string())?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::with_capacity(
            GZ_BUF_SIZE,
            MultiGzDecoder::new(f),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(32 * 1024, f)))
    }
}

/// A text output that is optionally gzip-compressed. Call `finish` to flush
/// and, for gzip, write the trailer; errors on drop are lost.
pub enum OutputFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputFile {
    pub fn create(path: &Path, gzip: bool) -> Result<Self> {
        let f = File::create(path).with_context(|| path.display().to_string())?;
        let writer = BufWriter::new(f);
        Ok(if gzip {
            OutputFile::Gzip(GzEncoder::new(writer, Compression::default()))
        } else {
            OutputFile::Plain(writer)
        })
    }

    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputFile::Plain(mut w) => w.flush(),
            OutputFile::Gzip(gz) => gz.finish()?.flush(),
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputFile::Plain(w) => w.write(buf),
            OutputFile::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputFile::Plain(w) => w.flush(),
            OutputFile::Gzip(w) => w.flush(),
        }
    }
}
