//! Flat-file record I/O with whole-file locking
//!
//! Each collection lives in its own comma-delimited file, one record per line
//! and no header. Saves are full snapshots written under an exclusive
//! advisory lock so that concurrent processes serialize instead of
//! interleaving. Loads are not locked.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::LibrisError;

/// Exclusive whole-file lock, released when dropped
///
/// Acquisition blocks until any other holder releases. Release happens in
/// `Drop`, so every exit path (including `?` on a failed write) unlocks.
pub struct FileLockGuard {
    file: File,
    path: PathBuf,
}

impl FileLockGuard {
    /// Block until an exclusive lock on `file` is held
    pub fn acquire(file: File, path: &Path) -> Result<Self, LibrisError> {
        file.lock_exclusive().map_err(|e| {
            LibrisError::Persistence(format!("Failed to lock {}: {}", path.display(), e))
        })?;

        tracing::trace!(path = %path.display(), "acquired exclusive lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// The locked file handle
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release lock");
        } else {
            tracing::trace!(path = %self.path.display(), "released exclusive lock");
        }
    }
}

/// Read every record from `path`, treating a missing file as empty
///
/// Loading stops at the first malformed line; the records before it are kept.
pub fn read_records<T, P>(path: P) -> Result<Vec<T>, LibrisError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| LibrisError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    loaded = records.len(),
                    error = %e,
                    "malformed record, ignoring the rest of the file"
                );
                break;
            }
        }
    }

    Ok(records)
}

/// Replace the contents of `path` with `records`, holding an exclusive lock
///
/// The file is opened without truncation, locked, and only then truncated and
/// rewritten, so a concurrent writer never sees a half-written snapshot.
pub fn write_records_locked<T, P>(path: P, records: &[T]) -> Result<(), LibrisError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LibrisError::Persistence(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| {
            LibrisError::Persistence(format!(
                "Could not open {} for writing: {}",
                path.display(),
                e
            ))
        })?;

    let mut guard = FileLockGuard::acquire(file, path)?;

    let file = guard.file_mut();
    file.set_len(0).map_err(|e| persist_err(path, e))?;
    file.seek(SeekFrom::Start(0)).map_err(|e| persist_err(path, e))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut *file);

        for record in records {
            writer.serialize(record).map_err(|e| persist_err(path, e))?;
        }

        writer.flush().map_err(|e| persist_err(path, e))?;
    }

    file.flush().map_err(|e| persist_err(path, e))?;
    file.sync_all().map_err(|e| persist_err(path, e))?;

    Ok(())
}

fn persist_err(path: &Path, err: impl std::fmt::Display) -> LibrisError {
    LibrisError::Persistence(format!("Failed to write {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        name: String,
        count: i64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "first".into(),
                count: 3,
            },
            Row {
                id: 2,
                name: "second".into(),
                count: 0,
            },
        ]
    }

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Vec<Row> = read_records(temp_dir.path().join("missing.txt")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_write_format_is_plain_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");

        write_records_locked(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1,first,3\n2,second,0\n");
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");

        write_records_locked(&path, &rows()).unwrap();
        let loaded: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(loaded, rows());
    }

    #[test]
    fn test_rewrite_truncates_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");

        write_records_locked(&path, &rows()).unwrap();
        write_records_locked(&path, &rows()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1,first,3\n");
    }

    #[test]
    fn test_malformed_line_stops_loading() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");
        fs::write(&path, "1,first,3\n2,second,not-a-number\n3,third,1\n").unwrap();

        let loaded: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "first");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("rows.txt");

        write_records_locked(&path, &rows()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_lock_released_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");

        write_records_locked(&path, &rows()).unwrap();

        let file = OpenOptions::new().write(true).open(&path).unwrap();
        assert!(file.try_lock_exclusive().is_ok());
    }

    #[test]
    fn test_second_writer_waits_for_lock_holder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.txt");
        let holder_path = path.clone();

        let (locked_tx, locked_rx) = mpsc::channel();
        let holder = thread::spawn(move || {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .open(&holder_path)
                .unwrap();
            let mut guard = FileLockGuard::acquire(file, &holder_path).unwrap();
            locked_tx.send(()).unwrap();

            thread::sleep(Duration::from_millis(300));
            guard.file_mut().write_all(b"9,holder,9\n").unwrap();
            Instant::now()
        });

        locked_rx.recv().unwrap();
        write_records_locked(&path, &rows()).unwrap();
        let finished = Instant::now();

        let released = holder.join().unwrap();
        assert!(finished >= released);

        // The waiting writer's full snapshot wins; nothing interleaved
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1,first,3\n2,second,0\n");
    }
}
