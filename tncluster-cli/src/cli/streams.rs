//! Input and output streams for CLI commands.
//!
//! A path of `-` means stdin or stdout. Paths ending in `.gz` are read and
//! written through gzip; anything else is plain text.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Stdout, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, instrument};

use super::commands::CliError;

const STANDARD_STREAM: &str = "-";

/// Returns `true` when `path` names stdin or stdout.
pub(super) fn is_standard_stream(path: &Path) -> bool {
    path.as_os_str() == STANDARD_STREAM
}

/// Returns `true` when `path` ends in `.gz`, ignoring case.
pub(super) fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("gz"))
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Opens `path` for buffered reading.
#[instrument(name = "cli.open_input", err, fields(gzip = is_gzip(path)))]
pub(super) fn open_input(path: &Path) -> Result<Box<dyn BufRead>, CliError> {
    if is_standard_stream(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).map_err(io_error(path))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads the whole of `path` as UTF-8 text.
pub(super) fn read_input(path: &Path) -> Result<String, CliError> {
    let mut text = String::new();
    open_input(path)?
        .read_to_string(&mut text)
        .map_err(io_error(path))?;
    debug!(bytes = text.len(), "input read");
    Ok(text)
}

/// Destination for command payloads.
pub(super) enum OutputSink {
    Stdout(BufWriter<Stdout>),
    File(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Creates (or truncates) the destination named by `path`.
    pub(super) fn create(path: &Path) -> Result<Self, CliError> {
        if is_standard_stream(path) {
            return Ok(Self::Stdout(BufWriter::new(io::stdout())));
        }
        let file = BufWriter::new(File::create(path).map_err(io_error(path))?);
        if is_gzip(path) {
            Ok(Self::Gzip(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(Self::File(file))
        }
    }

    /// Flushes buffered data and writes the gzip trailer when compressing.
    pub(super) fn finish(self) -> io::Result<()> {
        match self {
            Self::Stdout(mut writer) => writer.flush(),
            Self::File(mut writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File(writer) => writer.write(buf),
            Self::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File(writer) => writer.flush(),
            Self::Gzip(writer) => writer.flush(),
        }
    }
}

/// Writes `render`'s output to `path`, finishing the stream afterwards.
pub(super) fn write_output(
    path: &Path,
    render: impl FnOnce(&mut OutputSink) -> io::Result<()>,
) -> Result<(), CliError> {
    let mut sink = OutputSink::create(path)?;
    render(&mut sink).map_err(io_error(path))?;
    sink.finish().map_err(io_error(path))
}

/// Display form of a path argument, naming the standard stream explicitly.
pub(super) fn describe(path: &Path, stream: &'static str) -> String {
    if is_standard_stream(path) {
        stream.to_owned()
    } else {
        path.display().to_string()
    }
}
