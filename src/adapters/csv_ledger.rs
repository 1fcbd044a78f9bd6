//! CSV transaction import.
//!
//! Expected columns: symbol, type, shares, price, date, commission,
//! vat, exchange_rate. Dates are `%Y-%m-%d`. A malformed row never
//! aborts the batch; it is skipped and reported as a diagnostic so the
//! caller can surface it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::error::EngineError;
use crate::domain::ledger::{Transaction, TransactionKind};

/// One skipped row and why. `row` is 1-based and counts data rows,
/// excluding the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub row: usize,
    pub message: String,
}

/// Parsed transactions plus per-row diagnostics for rows that were
/// skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    pub transactions: Vec<Transaction>,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Read a transaction ledger from any reader.
pub fn read_transactions<R: Read>(reader: R) -> Result<CsvImport, EngineError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    let mut diagnostics = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                diagnostics.push(RowDiagnostic {
                    row,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };
        match parse_row(&record) {
            Ok(tx) => transactions.push(tx),
            Err(message) => diagnostics.push(RowDiagnostic { row, message }),
        }
    }

    Ok(CsvImport {
        transactions,
        diagnostics,
    })
}

/// Read a transaction ledger from a file on disk.
pub fn read_transactions_from_path(path: &Path) -> Result<CsvImport, EngineError> {
    let file = File::open(path)?;
    read_transactions(file)
}

fn parse_row(record: &StringRecord) -> Result<Transaction, String> {
    let symbol = field(record, 0, "symbol")?;
    if symbol.is_empty() {
        return Err("empty symbol".to_string());
    }

    let kind = match field(record, 1, "type")?.to_ascii_lowercase().as_str() {
        "buy" => TransactionKind::Buy,
        "sell" => TransactionKind::Sell,
        other => return Err(format!("unknown transaction type '{other}'")),
    };

    let shares = numeric(record, 2, "shares")?;
    if shares <= 0.0 {
        return Err(format!("shares must be positive, got {shares}"));
    }
    let price = numeric(record, 3, "price")?;
    if price < 0.0 {
        return Err(format!("price must not be negative, got {price}"));
    }

    let date_str = field(record, 4, "date")?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{date_str}': {e}"))?;

    let commission = numeric(record, 5, "commission")?;
    let vat = numeric(record, 6, "vat")?;
    let exchange_rate = numeric(record, 7, "exchange_rate")?;
    if exchange_rate <= 0.0 {
        return Err(format!("exchange rate must be positive, got {exchange_rate}"));
    }

    Ok(Transaction::new(
        symbol,
        kind,
        shares,
        price,
        date,
        commission,
        vat,
        exchange_rate,
    ))
}

fn field<'a>(record: &'a StringRecord, index: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| format!("missing {name} column"))
}

fn numeric(record: &StringRecord, index: usize, name: &str) -> Result<f64, String> {
    let raw = field(record, index, name)?;
    raw.parse()
        .map_err(|e| format!("invalid {name} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "symbol,type,shares,price,date,commission,vat,exchange_rate\n";

    #[test]
    fn parses_well_formed_rows() {
        let data = format!(
            "{HEADER}ACME,buy,10,100.0,2024-01-02,5.0,1.0,33.0\n\
             ACME,sell,10,110.0,2024-02-02,5.0,1.0,35.0\n"
        );
        let import = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(import.transactions.len(), 2);
        assert!(import.diagnostics.is_empty());

        let first = &import.transactions[0];
        assert_eq!(first.kind, TransactionKind::Buy);
        assert!((first.gross_amount - 1000.0).abs() < 1e-9);
        assert!((first.net_amount - 1006.0).abs() < 1e-9);

        let second = &import.transactions[1];
        assert_eq!(second.kind, TransactionKind::Sell);
        assert!((second.net_amount - 1094.0).abs() < 1e-9);
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let data = format!(
            "{HEADER}ACME,buy,10,100.0,2024-01-02,0,0,1.0\n\
             ACME,hold,10,100.0,2024-01-03,0,0,1.0\n\
             ACME,sell,ten,110.0,2024-01-04,0,0,1.0\n\
             ACME,sell,5,110.0,not-a-date,0,0,1.0\n\
             ACME,sell,5,110.0,2024-01-05,0,0,1.0\n"
        );
        let import = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(import.transactions.len(), 2);
        assert_eq!(import.diagnostics.len(), 3);
        assert_eq!(import.diagnostics[0].row, 2);
        assert!(import.diagnostics[0].message.contains("hold"));
        assert!(import.diagnostics[1].message.contains("shares"));
        assert!(import.diagnostics[2].message.contains("date"));
    }

    #[test]
    fn rejects_nonpositive_shares_and_rate() {
        let data = format!(
            "{HEADER}ACME,buy,0,100.0,2024-01-02,0,0,1.0\n\
             ACME,buy,10,100.0,2024-01-02,0,0,0\n"
        );
        let import = read_transactions(data.as_bytes()).unwrap();
        assert!(import.transactions.is_empty());
        assert_eq!(import.diagnostics.len(), 2);
    }

    #[test]
    fn empty_file_yields_empty_import() {
        let import = read_transactions(HEADER.as_bytes()).unwrap();
        assert!(import.transactions.is_empty());
        assert!(import.diagnostics.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_transactions_from_path(Path::new("/no/such/ledger.csv")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
