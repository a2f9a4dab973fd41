//! CSV export of the full ledger.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::LedgerRow;
use crate::ledger::EnergyLedger;
use crate::store::LedgerStore;

/// Exports every record of every account to a CSV file at `path`.
///
/// Accounts are written in sorted order, each account's records in insertion
/// order. Identical ledgers produce identical files, and the output can be
/// opened directly as a journal.
///
/// # Arguments
///
/// * `ledger` - Ledger to export
/// * `path` - Output file path
///
/// # Errors
///
/// Returns a `csv::Error` if file creation or writing fails.
pub fn export_csv<S: LedgerStore>(ledger: &EnergyLedger<S>, path: &Path) -> csv::Result<()> {
    let file = File::create(path)?;
    write_csv(ledger, io::BufWriter::new(file))
}

/// Writes the ledger as CSV to any writer.
///
/// # Arguments
///
/// * `ledger` - Ledger to export
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_csv<S: LedgerStore>(ledger: &EnergyLedger<S>, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let snapshots = ledger.snapshots();
    // An empty ledger still gets a header row.
    if snapshots.is_empty() {
        wtr.write_record(super::HEADER.split(','))?;
    }

    for snapshot in &snapshots {
        for record in &snapshot.records {
            wtr.serialize(LedgerRow::new(&snapshot.account, record))?;
        }
    }

    wtr.flush()?;
    Ok(())
}
