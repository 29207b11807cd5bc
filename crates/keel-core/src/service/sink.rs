//! Log sinks - rotating file and console destinations

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::LogRecord;
use crate::service::formatter::Formatter;

/// Default file size cap before rotation (100MB)
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Default number of rotated files to keep
pub const DEFAULT_BACKUP_COUNT: usize = 5;

/// Sink category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    File,
    Console,
}

/// A log destination. Each sink owns the formatter for its lines.
pub trait Sink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Format and persist one record
    fn write(&self, record: &LogRecord) -> io::Result<()>;
}

/// Size-rotating log file: `app.log`, `app.log.1` ... `app.log.N`
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    formatter: Box<dyn Formatter>,
    state: Mutex<FileState>,
}

struct FileState {
    file: File,
    size: u64,
}

impl RotatingFileSink {
    /// Open (append) the log file, creating parent directories
    pub fn open(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
        formatter: Box<dyn Formatter>,
    ) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            formatter,
            state: Mutex::new(FileState { file, size }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `index`-th rotated file
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn should_rotate(&self, state: &FileState, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && state.size > 0
            && state.size + incoming > self.max_bytes
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        debug!("Rotating log file {:?}", self.path);
        state.file.flush()?;

        for index in (1..self.backup_count).rev() {
            let source = self.backup_path(index);
            if source.exists() {
                let target = self.backup_path(index + 1);
                if target.exists() {
                    std::fs::remove_file(&target)?;
                }
                std::fs::rename(&source, &target)?;
            }
        }

        let first = self.backup_path(1);
        if first.exists() {
            std::fs::remove_file(&first)?;
        }
        std::fs::rename(&self.path, &first)?;

        state.file = open_append(&self.path)?;
        state.size = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn write(&self, record: &LogRecord) -> io::Result<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');
        let line_len = line.len() as u64;

        let mut state = self.state.lock();
        if self.should_rotate(&state, line_len) {
            self.rotate(&mut state)?;
        }

        state.file.write_all(line.as_bytes())?;
        state.file.flush()?;
        state.size += line_len;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Console destination (stderr by default)
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: Box<dyn Formatter>,
}

impl ConsoleSink {
    pub fn stderr(formatter: Box<dyn Formatter>) -> Self {
        Self::with_writer(Box::new(io::stderr()), formatter)
    }

    pub fn with_writer(writer: Box<dyn Write + Send>, formatter: Box<dyn Formatter>) -> Self {
        Self {
            writer: Mutex::new(writer),
            formatter,
        }
    }
}

impl Sink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn write(&self, record: &LogRecord) -> io::Result<()> {
        let mut line = self.formatter.format(record);
        line.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}
