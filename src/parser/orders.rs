//! Order record decoding
//!
//! One record per line, seven comma-separated fields in fixed order:
//! timestamp, order id, customer id, state, description, quantity, cost.
//! Fields are trimmed and split on every comma; quote characters carry no
//! meaning, so a bad line can never run into the next one. Blank lines are
//! ignored.

use crate::orders::OrderRecord;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub const ORDER_FIELD_COUNT: usize = 7;

/// Decode the seven raw fields of one record
pub fn parse_order_fields(line: u64, fields: &StringRecord) -> Result<OrderRecord> {
    if fields.len() != ORDER_FIELD_COUNT {
        return Err(Error::malformed(
            line,
            format!("expected {} fields, found {}", ORDER_FIELD_COUNT, fields.len()),
        ));
    }

    let field = |idx: usize| fields.get(idx).unwrap_or_default();

    Ok(OrderRecord::new(
        number(line, "timestamp", field(0))?,
        field(1),
        field(2),
        field(3),
        field(4),
        number(line, "quantity", field(5))?,
        number(line, "cost", field(6))?,
    ))
}

fn number<T>(line: u64, name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| Error::malformed(line, format!("invalid {} '{}': {}", name, raw, e)))
}

/// Streaming reader yielding one decoded record (or decode error) per line
pub struct OrderReader<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();
        Self { records }
    }
}

impl OrderReader<File> {
    /// Open an order file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::custom(format!("cannot open order file {:?}: {}", path, e)))?;
        Ok(Self::new(file))
    }
}

impl<R: Read> Iterator for OrderReader<R> {
    type Item = Result<OrderRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Some(parse_order_fields(line, &record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> Vec<Result<OrderRecord>> {
        OrderReader::new(input.as_bytes()).collect()
    }

    #[test]
    fn test_parse_line() {
        let records = read("100, O1 , C1, Pending, widgets, 3, 12.5\n");
        assert_eq!(records.len(), 1);

        let record = records.into_iter().next().unwrap().unwrap();
        assert_eq!(
            record,
            OrderRecord::new(100, "O1", "C1", "pending", "widgets", 3, 12.5)
        );
    }

    #[test]
    fn test_quotes_are_literal() {
        let records = read(
            "100,O1,C1,pending,\"bolts\",1,2.0\n\
             100,O2,C1,pending,\"bolts, nuts\",1,2.0\n",
        );
        assert_eq!(records.len(), 2);

        let mut records = records.into_iter();
        let record = records.next().unwrap().unwrap();
        assert_eq!(record.description, "\"bolts\"");

        // A comma inside quotes still separates fields
        assert!(matches!(
            records.next().unwrap(),
            Err(Error::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_stray_quote_does_not_swallow_following_lines() {
        let records = read(
            "100,O1,C1,pending,\"x,1,1.0\n\
             200,O2,C1,pending,x,1,1.0\n\
             300,O3,C1,pending,x,1,1.0\n",
        );
        assert_eq!(records.len(), 3);

        let mut records = records.into_iter();
        let first = records.next().unwrap().unwrap();
        assert_eq!(first.order_id, "O1");
        assert_eq!(first.description, "\"x");

        let ids: Vec<String> = records.map(|r| r.unwrap().order_id).collect();
        assert_eq!(ids, vec!["O2", "O3"]);
    }

    #[test]
    fn test_stray_quote_in_short_line_is_skipped_alone() {
        let records = read(
            "100,O1,C1,\"pending,x,1\n\
             200,O2,C1,pending,x,1,1.0\n",
        );
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[0],
            Err(Error::MalformedRecord { line: 1, .. })
        ));
        assert_eq!(records[1].as_ref().unwrap().order_id, "O2");
    }

    #[test]
    fn test_field_count_mismatch() {
        let records = read("100,O1,C1,pending\n100,O1,C1,pending,x,1,2.0,extra\n");
        assert_eq!(records.len(), 2);
        for record in records {
            assert!(matches!(record, Err(Error::MalformedRecord { .. })));
        }
    }

    #[test]
    fn test_bad_numbers() {
        let records = read(
            "abc,O1,C1,pending,x,1,2.0\n\
             100,O1,C1,pending,x,1.5,2.0\n\
             100,O1,C1,pending,x,1,two\n",
        );

        let lines: Vec<u64> = records
            .into_iter()
            .map(|r| match r {
                Err(Error::MalformedRecord { line, .. }) => line,
                other => panic!("expected malformed record, got {:?}", other),
            })
            .collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_well_formed_but_invalid_values_still_decode() {
        // Range checks belong to the field validator, not the decoder
        let records = read("-5,O1,,pending,,-2,-1.0\n");
        let record = records.into_iter().next().unwrap().unwrap();
        assert_eq!(record.quantity, -2);
        assert_eq!(record.customer_id, "");
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let records = read("100,O1,C1,pending,x,1,1.0\n\n200,O1,C1,shipped,x,1,1.0\n");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(OrderReader::open("/nonexistent/orders.csv").is_err());
    }
}
