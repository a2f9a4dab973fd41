//! Durable store: an append-only CSV journal replayed into memory on open.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::{LedgerStore, MemoryStore, StoreError};
use crate::io::LedgerRow;
use crate::ledger::{AccountEntry, AccountId, EnergyRecord};

/// Ledger store that appends every record to a CSV journal before applying it.
///
/// The journal uses the same column layout as [`crate::io::export`], so an
/// exported ledger can be reopened as a journal.
///
/// Each row is encoded in memory and written to the file in one call. If the
/// write fails the file is cut back to its last committed length, so a
/// rejected record never reaches the journal.
pub struct JournalStore {
    path: PathBuf,
    memory: MemoryStore,
    file: File,
    /// File length after the last successful append.
    committed: u64,
    /// Set when a failed write could not be rolled back yet.
    dirty: bool,
}

impl JournalStore {
    /// Opens the journal at `path`, creating it if missing and replaying any
    /// existing rows.
    ///
    /// A journal whose last row lacks a line terminator gets one before the
    /// first append.
    ///
    /// # Arguments
    ///
    /// * `path` - Journal file location
    ///
    /// # Errors
    ///
    /// * `Io` if the file cannot be read or opened for appending
    /// * `Csv` if a row cannot be decoded
    /// * `Corrupt` if a row is out of sequence or overflows a total
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let memory = if path.exists() {
            replay(&path)?
        } else {
            MemoryStore::new()
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut committed = file.metadata()?.len();
        if committed > 0 && !ends_with_newline(&path)? {
            warn!(path = %path.display(), "journal missing final newline, terminating last row");
            file.write_all(b"\n")?;
            file.flush()?;
            committed += 1;
        }

        info!(
            path = %path.display(),
            accounts = memory.len(),
            "opened energy journal"
        );
        Ok(Self {
            path,
            memory,
            file,
            committed,
            dirty: false,
        })
    }

    /// Location of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one encoded row, restoring the committed length on failure.
    fn write_row(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.dirty {
            self.file.set_len(self.committed)?;
            self.dirty = false;
        }

        let written = self
            .file
            .write_all(bytes)
            .and_then(|()| self.file.flush());
        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(self.committed) {
                error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "failed to roll back partial journal write"
                );
                self.dirty = true;
            }
            return Err(e);
        }

        self.committed += bytes.len() as u64;
        Ok(())
    }
}

/// Rebuilds the in-memory mapping from the journal rows at `path`.
fn replay(path: &Path) -> Result<MemoryStore, StoreError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut memory = MemoryStore::new();

    // Line 1 is the header.
    for (idx, row) in rdr.deserialize::<LedgerRow>().enumerate() {
        let line = idx as u64 + 2;
        let row = row?;
        memory
            .append(&row.account, row.record())
            .map_err(|e| StoreError::Corrupt {
                line,
                reason: format!("account `{}`: {e}", row.account),
            })?;
    }

    Ok(memory)
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Encodes `row` as one CSV line, preceded by the header for an empty file.
fn encode_row(row: &LedgerRow, with_header: bool) -> Result<Vec<u8>, StoreError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());
    wtr.serialize(row)?;
    wtr.into_inner().map_err(|e| StoreError::Io(e.into_error()))
}

impl LedgerStore for JournalStore {
    fn entry(&self, account: &AccountId) -> Option<&AccountEntry> {
        self.memory.entry(account)
    }

    fn append(&mut self, account: &AccountId, record: EnergyRecord) -> Result<(), StoreError> {
        self.memory.check(account, &record)?;
        let bytes = encode_row(&LedgerRow::new(account, &record), self.committed == 0)?;
        self.write_row(&bytes)?;
        self.memory.append(account, record)
    }

    fn accounts(&self) -> Vec<AccountId> {
        self.memory.accounts()
    }
}
