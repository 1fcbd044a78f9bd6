//! Adapters between external data formats and the domain types.

pub mod csv_ledger;

pub use csv_ledger::{read_transactions, read_transactions_from_path, CsvImport, RowDiagnostic};
