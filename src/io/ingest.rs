//! CSV ingest.
//!
//! Turns the sheet export into fixed-arity `RawRow`s. Nothing here decides
//! what a lead is: rows of any shape (titles, blanks, totals) pass through
//! and are left to the classifier.
//!
//! Design goals:
//! - **No header assumption**: the first line is data like any other
//! - **Ragged rows**: short and long records are both fine
//! - **Lossy text**: invalid UTF-8 inside a field becomes `U+FFFD`, never an
//!   error; only a broken reader fails the whole file

use std::io::Read;

use tracing::debug;

use crate::domain::RawRow;
use crate::error::AppError;

/// Parse CSV text into raw rows.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>, AppError> {
    read_rows(text.as_bytes())
}

/// Parse CSV from any reader into raw rows.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|e| AppError::process(format!("CSV line {}: {e}", idx + 1)))?;
        rows.push(RawRow::from_fields(
            record.iter().map(|field| String::from_utf8_lossy(field).into_owned()),
        ));
    }

    debug!(rows = rows.len(), "parsed CSV rows");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_headers_titles_and_ragged_rows() {
        let text = "\
MAIO,,,,,
DIA,NOME,TEL,TRAFEGO,SITUACAO,VALOR
05/07/2024,Ana,119,Facebook,Fechado,\"R$ 1.367,63\"
06/07/2024,Bia
";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].field(0), Some("MAIO"));
        assert_eq!(rows[2].field(5), Some("R$ 1.367,63"));
        assert_eq!(rows[3].field(1), Some("Bia"));
        assert_eq!(rows[3].field(4), None);
    }

    #[test]
    fn blank_lines_produce_no_rows() {
        let rows = parse_rows("\n\n05/07/2024,,,X,OK,1\n\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn invalid_utf8_in_a_field_is_replaced() {
        let bytes: &[u8] = b"05/07/2024,\xff\xfe,,X,OK,1\n";
        let rows = read_rows(bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field(1), Some("\u{FFFD}\u{FFFD}"));
        assert_eq!(rows[0].field(4), Some("OK"));
        assert!(crate::metrics::is_lead_row(&rows[0]));
    }

    #[test]
    fn reader_failure_is_a_process_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }
        let err = read_rows(Broken).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_PROCESS);
    }
}
