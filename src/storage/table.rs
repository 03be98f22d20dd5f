//! In-memory record table backed by one flat file
//!
//! A table owns the rows of one collection in store order plus the next id to
//! hand out. Mutations go through a [`Staged`] copy: the copy is written to
//! disk first and only installed in memory once the write succeeded, so a
//! failed save leaves memory and disk in agreement.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use super::file_io::{read_records, write_records_locked};
use crate::error::LibrisError;

/// A row type persisted in a record table
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Integer id used for id allocation
    fn raw_id(&self) -> u32;

    /// Check a row read from disk; a failing row ends the load like a
    /// malformed line
    fn validate(&self) -> Result<(), LibrisError> {
        Ok(())
    }
}

#[derive(Debug)]
struct TableData<T> {
    rows: Vec<T>,
    next_id: u32,
}

/// Pending changes to a table, not yet visible to readers
#[derive(Debug, Clone)]
pub struct Staged<T> {
    rows: Vec<T>,
    next_id: u32,
}

impl<T: Record> Staged<T> {
    /// Reserve the next id; ids are never handed out twice
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a row at the end of store order
    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// First row matching `pred`, mutably
    pub fn find_mut<F>(&mut self, pred: F) -> Option<&mut T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.iter_mut().find(|row| pred(&**row))
    }

    /// Remove the first row matching `pred`, keeping the order of the rest
    pub fn remove_first<F>(&mut self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let index = self.rows.iter().position(pred)?;
        Some(self.rows.remove(index))
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}

/// Rows of one collection and the file they persist to
pub struct RecordTable<T> {
    path: PathBuf,
    data: RwLock<TableData<T>>,
}

impl<T: Record> RecordTable<T> {
    /// Create an empty table backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(TableData {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load rows from disk, seeding the id counter from the highest id seen
    ///
    /// Rows from the first invalid one onwards are dropped.
    pub fn load(&self) -> Result<usize, LibrisError> {
        let mut rows: Vec<T> = read_records(&self.path)?;
        let invalid = rows
            .iter()
            .enumerate()
            .find_map(|(index, row)| row.validate().err().map(|e| (index, e)));
        if let Some((index, e)) = invalid {
            tracing::warn!(
                entity = T::ENTITY,
                path = %self.path.display(),
                loaded = index,
                error = %e,
                "invalid record, ignoring the rest of the file"
            );
            rows.truncate(index);
        }
        let next_id = rows.iter().map(T::raw_id).max().map_or(1, |max| max + 1);

        let mut data = self.write_data()?;
        data.rows = rows;
        data.next_id = next_id;

        tracing::debug!(
            entity = T::ENTITY,
            count = data.rows.len(),
            next_id,
            "loaded records"
        );
        Ok(data.rows.len())
    }

    /// Copy the current rows for modification
    pub fn stage(&self) -> Result<Staged<T>, LibrisError> {
        let data = self.read_data()?;
        Ok(Staged {
            rows: data.rows.clone(),
            next_id: data.next_id,
        })
    }

    /// Write staged rows to disk without installing them
    pub fn persist(&self, staged: &Staged<T>) -> Result<(), LibrisError> {
        write_records_locked(&self.path, staged.rows())
    }

    /// Make staged rows the current in-memory state
    pub fn install(&self, staged: Staged<T>) -> Result<(), LibrisError> {
        let mut data = self.write_data()?;
        data.rows = staged.rows;
        data.next_id = staged.next_id;
        Ok(())
    }

    /// Persist then install; memory is untouched if the write fails
    pub fn commit(&self, staged: Staged<T>) -> Result<(), LibrisError> {
        self.persist(&staged)?;
        self.install(staged)?;
        tracing::debug!(entity = T::ENTITY, path = %self.path.display(), "saved records");
        Ok(())
    }

    /// Rewrite the file from the current in-memory rows
    pub fn save(&self) -> Result<(), LibrisError> {
        let data = self.read_data()?;
        write_records_locked(&self.path, &data.rows)
    }

    /// All rows in store order
    pub fn get_all(&self) -> Result<Vec<T>, LibrisError> {
        Ok(self.read_data()?.rows.clone())
    }

    /// First row matching `pred`
    pub fn find<F>(&self, pred: F) -> Result<Option<T>, LibrisError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read_data()?.rows.iter().find(|row| pred(row)).cloned())
    }

    /// Every row matching `pred`, in store order
    pub fn filter<F>(&self, pred: F) -> Result<Vec<T>, LibrisError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self
            .read_data()?
            .rows
            .iter()
            .filter(|row| pred(row))
            .cloned()
            .collect())
    }

    pub fn count(&self) -> Result<usize, LibrisError> {
        Ok(self.read_data()?.rows.len())
    }

    /// The id the next insert will receive
    pub fn next_id(&self) -> Result<u32, LibrisError> {
        Ok(self.read_data()?.next_id)
    }

    fn read_data(&self) -> Result<RwLockReadGuard<'_, TableData<T>>, LibrisError> {
        self.data.read().map_err(|e| {
            LibrisError::Persistence(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write_data(&self) -> Result<RwLockWriteGuard<'_, TableData<T>>, LibrisError> {
        self.data.write().map_err(|e| {
            LibrisError::Persistence(format!("Failed to acquire write lock: {}", e))
        })
    }
}

/// Commit staged changes to two tables as one unit
///
/// If the second write fails, the first file is rewritten from its previous
/// in-memory snapshot and neither table's memory changes.
pub fn commit_pair<A: Record, B: Record>(
    first: &RecordTable<A>,
    first_staged: Staged<A>,
    second: &RecordTable<B>,
    second_staged: Staged<B>,
) -> Result<(), LibrisError> {
    first.persist(&first_staged)?;

    if let Err(e) = second.persist(&second_staged) {
        tracing::error!(
            entity = B::ENTITY,
            error = %e,
            "second write failed, restoring {}",
            A::ENTITY
        );
        if let Err(restore_err) = first.save() {
            tracing::error!(
                entity = A::ENTITY,
                error = %restore_err,
                "failed to restore previous snapshot"
            );
        }
        return Err(e);
    }

    first.install(first_staged)?;
    second.install(second_staged)?;
    Ok(())
}
