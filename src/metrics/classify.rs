//! Row classification.
//!
//! A row is a lead iff its date field, trimmed, is exactly `DD/MM/YYYY`
//! (two digits, slash, two digits, slash, four digits). Header lines, month
//! titles, totals and blank rows all fail the test and are skipped silently.

use crate::domain::{COLUMNS, DayStamp, RawRow};

/// `true` iff the row's date field is a strict `DD/MM/YYYY` stamp.
pub fn is_lead_row(row: &RawRow) -> bool {
    parse_day_stamp(row.field_or_empty(COLUMNS.date)).is_some()
}

/// Parse a strict `DD/MM/YYYY` stamp (after trimming).
///
/// Only the shape is checked; `31/02/2024` and `99/99/9999` are accepted.
pub fn parse_day_stamp(raw: &str) -> Option<DayStamp> {
    let s = raw.trim().as_bytes();
    if s.len() != 10 || s[2] != b'/' || s[5] != b'/' {
        return None;
    }

    let digits = |range: std::ops::Range<usize>| -> Option<u16> {
        s[range].iter().try_fold(0u16, |acc, &b| {
            b.is_ascii_digit().then(|| acc * 10 + u16::from(b - b'0'))
        })
    };

    Some(DayStamp {
        day: digits(0..2)? as u8,
        month: digits(3..5)? as u8,
        year: digits(6..10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str) -> RawRow {
        RawRow::from_fields([date, "", "", "FACEBOOK", "FECHADO", "R$ 1,00"])
    }

    #[test]
    fn accepts_strict_dates() {
        assert!(is_lead_row(&row("05/07/2024")));
        assert!(is_lead_row(&row("  05/07/2024 ")));
        assert_eq!(
            parse_day_stamp("05/07/2024"),
            Some(DayStamp { year: 2024, month: 7, day: 5 })
        );
    }

    #[test]
    fn no_calendar_check() {
        assert_eq!(
            parse_day_stamp("99/99/9999"),
            Some(DayStamp { year: 9999, month: 99, day: 99 })
        );
    }

    #[test]
    fn rejects_everything_else() {
        for bad in [
            "", "MAIO", "DIA", "5/07/2024", "05/7/2024", "05/07/24", "05-07-2024",
            "05/07/2024x", "x05/07/2024", "05/07/20 4", "TOTAL", "０5/07/2024",
        ] {
            assert!(!is_lead_row(&row(bad)), "{bad:?} should not classify");
        }
        assert!(!is_lead_row(&RawRow::default()));
    }
}
