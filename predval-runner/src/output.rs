//! Output — `start|end|average` lines, written all-or-nothing.
//!
//! Results stream into a temporary file created next to the destination and
//! are renamed over it only after the last line is flushed. Any failure drops
//! the temporary file, so the destination is either fully written or left
//! exactly as it was.

use predval_core::{WindowResult, FIELD_DELIMITER};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::runner::RunError;

/// Counts of what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStats {
    pub windows: u64,
    pub na_windows: u64,
}

/// Pipe-delimited, unquoted writer for [`WindowResult`]s.
pub struct WindowWriter<W: Write> {
    inner: csv::Writer<W>,
    stats: OutputStats,
}

impl<W: Write> WindowWriter<W> {
    pub fn new(writer: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(FIELD_DELIMITER as u8)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(writer);
        Self {
            inner,
            stats: OutputStats::default(),
        }
    }

    pub fn write(&mut self, result: &WindowResult) -> io::Result<()> {
        self.inner.write_record([
            result.window_start.to_string(),
            result.window_end.to_string(),
            result.average_error.to_string(),
        ])?;
        self.stats.windows += 1;
        if !result.average_error.is_available() {
            self.stats.na_windows += 1;
        }
        Ok(())
    }

    /// Flush buffered lines and return what was written.
    pub fn finish(mut self) -> io::Result<OutputStats> {
        self.inner.flush()?;
        Ok(self.stats)
    }
}

/// Write every result to `path`, replacing it atomically on success.
pub fn write_windows<I>(path: &Path, results: I) -> Result<OutputStats, RunError>
where
    I: IntoIterator<Item = WindowResult>,
{
    let output_err = |source: io::Error| RunError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = output_dir(path);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(output_err)?;

    let stats = {
        let mut writer = WindowWriter::new(tmp.as_file_mut());
        for result in results {
            writer.write(&result).map_err(output_err)?;
        }
        writer.finish().map_err(output_err)?
    };
    tmp.as_file().sync_all().map_err(output_err)?;
    tmp.persist(path).map_err(|e| output_err(e.error))?;

    Ok(stats)
}

fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
