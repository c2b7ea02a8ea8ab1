//! Rotating file writers with optional stdout mirroring

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use logroller::{Compression, LogRoller, LogRollerBuilder, Rotation, RotationSize};

use crate::config::Config;

/// Rotation threshold applied when the configuration leaves `maxSize` at 0,
/// matching the wrapped rotation engine's documented default
const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Writer behind a single sink: a size-rotated log file, optionally teeing
/// every record to standard output
///
/// Write errors are swallowed rather than surfaced to the caller.
pub struct SinkWriter {
    file: LogRoller,
    stdout: Option<io::Stdout>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = self.file.write_all(buf);
        let _ = self.file.flush();

        if let Some(stdout) = &mut self.stdout {
            let _ = stdout.write_all(buf);
            let _ = stdout.flush();
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = self.file.flush();
        if let Some(stdout) = &mut self.stdout {
            let _ = stdout.flush();
        }
        Ok(())
    }
}

/// Open the rotating writer for one sink file
///
/// Creates the output directory if needed. Rotation is size-based at the
/// configured threshold; rotated-out backups are capped at `maxBackups`
/// (when nonzero) and gzip-compressed when `compress` is set.
pub fn open_sink_writer(config: &Config, dir: &Path, file_name: &str) -> Result<SinkWriter> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let max_size = if config.max_size == 0 {
        DEFAULT_MAX_SIZE_MB
    } else {
        config.max_size
    };

    let dir_name = dir.display().to_string();
    let mut builder = LogRollerBuilder::new(dir_name.as_str(), file_name)
        .rotation(Rotation::SizeBased(RotationSize::MB(max_size)));
    if config.max_backups > 0 {
        builder = builder.max_keep_files(config.max_backups);
    }
    if config.compress {
        builder = builder.compression(Compression::Gzip);
    }

    let file = builder
        .build()
        .with_context(|| format!("Failed to open log file {}", dir.join(file_name).display()))?;

    let stdout = config.stdout.then(io::stdout);

    Ok(SinkWriter { file, stdout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory_and_file_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let logs_dir = temp_dir.path().join("logs");
        let config = Config::default();

        let mut writer = open_sink_writer(&config, &logs_dir, "test.log").unwrap();
        writer.write_all(b"first record\n").unwrap();

        let content = fs::read_to_string(logs_dir.join("test.log")).unwrap();
        assert_eq!(content, "first record\n");
    }

    #[test]
    fn test_writes_append_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default();

        let mut writer = open_sink_writer(&config, temp_dir.path(), "ordered.log").unwrap();
        writer.write_all(b"one\n").unwrap();
        writer.write_all(b"two\n").unwrap();

        let content = fs::read_to_string(temp_dir.path().join("ordered.log")).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }
}
