//! Fixtures and file helpers shared across CLI tests.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use super::{ClusteringArgs, IoArgs, ModeArg};

/// Two components: {A,B,C,D} joined at 0.5 and {E,F} joined at 1.
pub(super) const DISTANCES: &str = "ID1,ID2,Distance\n\
    B,C,0.5\n\
    A,B,0.25\n\
    E,F,1\n\
    C,D,0.375\n";

pub(super) const TREES: &str = "((A:0.25,B:0.25)0.25:0.25,(C:0.375,D:0.375)0.375:0.125)0.5;\n\
    (E:1,F:1)1;\n";

pub(super) const CLUSTERS: &str = "SequenceName\tClusterNumber\n\
    A\t1\nB\t1\nC\t2\nD\t2\nE\t-1\nF\t-1\n";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn create_gzip_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::fast());
    encoder.write_all(contents.as_bytes())?;
    encoder.finish()?;
    Ok(path)
}

pub(super) fn read_gzip_file(path: &Path) -> io::Result<String> {
    let mut text = String::new();
    MultiGzDecoder::new(File::open(path)?).read_to_string(&mut text)?;
    Ok(text)
}

pub(super) fn io_args(input: PathBuf, output: PathBuf) -> IoArgs {
    IoArgs { input, output }
}

pub(super) fn clustering(verbose: bool) -> ClusteringArgs {
    ClusteringArgs {
        mode: ModeArg::MaxNonSingleton,
        verbose,
    }
}
