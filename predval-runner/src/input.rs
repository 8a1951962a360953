//! Input files: fingerprinted stream readers and the window file.

use blake3::Hasher;
use predval_core::{Stream, Window};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::runner::RunError;

/// BLAKE3 hash and size of everything read through a [`FingerprintReader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub blake3: String,
    pub bytes: u64,
}

/// Hashes bytes as they pass through, so inputs are read exactly once.
pub struct FingerprintReader<R> {
    inner: R,
    hasher: Hasher,
    bytes: u64,
}

impl<R: Read> FingerprintReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            bytes: 0,
        }
    }

    pub fn finish(self) -> Fingerprint {
        Fingerprint {
            blake3: self.hasher.finalize().to_hex().to_string(),
            bytes: self.bytes,
        }
    }
}

impl<R: Read> Read for FingerprintReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }
}

/// Open one input stream for buffered, fingerprinted reading.
pub fn open_stream(
    path: &Path,
    stream: Stream,
) -> Result<BufReader<FingerprintReader<File>>, RunError> {
    let file = File::open(path).map_err(|source| RunError::OpenInput {
        stream,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(FingerprintReader::new(file)))
}

/// Read the window length: a single integer as plain text.
pub fn read_window(path: &Path) -> Result<Window, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::ReadWindow {
        path: path.to_path_buf(),
        source,
    })?;
    text.parse().map_err(|source| RunError::WindowFile {
        path: path.to_path_buf(),
        source,
    })
}
