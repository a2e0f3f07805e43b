//! Loading bids from the monthly sales CSV export

use std::{io::Read, path::Path};

use csv::{Reader, ReaderBuilder, StringRecord};
use log::{debug, info, warn};

use crate::{
    bid::Bid,
    bid_table::BidTable,
    error::{LoadError, RowError},
    utils::parse_currency,
};

/// Column holding the item title
const TITLE_COLUMN: usize = 0;
/// Column holding the bid id
const ID_COLUMN: usize = 1;
/// Column holding the winning bid as a currency string
const AMOUNT_COLUMN: usize = 4;
/// Column holding the fund name
const FUND_COLUMN: usize = 8;
/// Symbol stripped from the amount column
const CURRENCY_SYMBOL: char = '$';

/// Summary of one CSV load
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rows stored under a new id
    pub inserted: usize,
    /// Rows that replaced a bid with the same id
    pub updated: usize,
    /// Rows that were skipped, in file order
    pub rejected: Vec<RowError>,
}

impl LoadReport {
    /// Returns the number of data rows seen
    #[must_use]
    pub fn rows(&self) -> usize {
        self.inserted.saturating_add(self.updated).saturating_add(self.rejected.len())
    }
}

/// Loads every row of the CSV file at `path` into `table`.
///
/// The first row is treated as a header. Rows that cannot be turned into a bid are logged,
/// collected in the report and skipped.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or its header cannot be read; nothing is
/// inserted in that case.
pub fn load_bids(path: impl AsRef<Path>, table: &mut BidTable) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    info!("loading CSV file {}", path.display());

    let reader = builder()
        .from_path(path)
        .map_err(|source| LoadError::Open { path: path.to_path_buf(), source })?;
    load_records(reader, table)
}

/// Loads CSV data from any reader into `table`, see [`load_bids`]
///
/// # Errors
///
/// Returns [`LoadError::Header`] if the header row cannot be read.
pub fn load_bids_from_reader<R: Read>(
    reader: R,
    table: &mut BidTable,
) -> Result<LoadReport, LoadError> {
    load_records(builder().from_reader(reader), table)
}

/// Reader settings shared by both entry points
fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // short rows are reported per row instead of failing the record
    builder.has_headers(true).flexible(true);
    builder
}

/// Drains `reader` into `table`
fn load_records<R: Read>(
    mut reader: Reader<R>,
    table: &mut BidTable,
) -> Result<LoadReport, LoadError> {
    let header = reader.headers().map_err(|source| LoadError::Header { source })?;
    debug!("CSV header: {}", header.iter().collect::<Vec<_>>().join(" | "));

    let mut report = LoadReport::default();
    for (index, record) in reader.records().enumerate() {
        let row = index.saturating_add(1);
        let outcome = record
            .map_err(|source| RowError::Csv { row, source })
            .and_then(|record| parse_row(row, &record))
            .and_then(|bid| table.insert(bid).map_err(|source| RowError::Key { row, source }));

        match outcome {
            Ok(None) => report.inserted = report.inserted.saturating_add(1),
            Ok(Some(previous)) => {
                debug!("row {row}: replaced bid {}", previous.id());
                report.updated = report.updated.saturating_add(1);
            }
            Err(err) => {
                warn!("skipping {err}");
                report.rejected.push(err);
            }
        }
    }

    info!(
        "loaded {} bids ({} updated, {} rejected)",
        report.inserted,
        report.updated,
        report.rejected.len()
    );
    Ok(report)
}

/// Returns the trimmed contents of `column`
fn cell(record: &StringRecord, row: usize, column: usize) -> Result<&str, RowError> {
    record.get(column).map(str::trim).ok_or(RowError::MissingColumn { row, column })
}

/// Builds a bid from one data row
fn parse_row(row: usize, record: &StringRecord) -> Result<Bid, RowError> {
    let title = cell(record, row, TITLE_COLUMN)?;
    let id = cell(record, row, ID_COLUMN)?;
    let amount_cell = cell(record, row, AMOUNT_COLUMN)?;
    let fund = cell(record, row, FUND_COLUMN)?;

    let amount = parse_currency(amount_cell, CURRENCY_SYMBOL).map_err(|source| {
        RowError::Amount { row, value: amount_cell.to_string(), source }
    })?;

    Ok(Bid::new(id, title, fund, amount))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::TableError;

    const SAMPLE: &str = "\
Title,ArticleID,Department,CloseDate,WinningBid,InventoryID,VehicleID,ReceiptNumber,Fund
Hoover Steam Vac,98223,Enterprise,11/12/16,$27.00,2016-101,,13458,General Fund
\"Chair, oak\",98109,Enterprise,11/13/16,\"$1,040.50\",2016-102,,13459,Enterprise
Broken,abc,Enterprise,11/13/16,$1.00,2016-103,,13460,General Fund
Lamp,98300,Enterprise,11/14/16,$x,2016-104,,13461,General Fund
Short,98400
Hoover Steam Vac,98223,Enterprise,11/15/16,$30.00,2016-105,,13462,General Fund
";

    #[test]
    fn test_load_from_reader() {
        let mut table = BidTable::new();
        let report = load_bids_from_reader(SAMPLE.as_bytes(), &mut table).unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.rows(), 6);
        assert_eq!(table.len(), 2);

        let chair = table.search("98109").unwrap();
        assert_eq!(chair.title(), "Chair, oak");
        assert_eq!(chair.fund(), "Enterprise");
        assert!((chair.amount() - 1040.5).abs() < f64::EPSILON);

        let vac = table.search("98223").unwrap();
        assert!((vac.amount() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejected_rows() {
        let mut table = BidTable::new();
        let report = load_bids_from_reader(SAMPLE.as_bytes(), &mut table).unwrap();

        let rows: Vec<usize> = report.rejected.iter().map(RowError::row).collect();
        assert_eq!(rows, vec![3, 4, 5]);

        let mut rejected = report.rejected.iter();
        assert!(matches!(
            rejected.next(),
            Some(RowError::Key { source: TableError::MalformedKey { .. }, .. })
        ));
        assert!(matches!(rejected.next(), Some(RowError::Amount { value, .. }) if value == "$x"));
        assert!(matches!(
            rejected.next(),
            Some(RowError::MissingColumn { column: AMOUNT_COLUMN, .. })
        ));
        assert!(!table.contains("98300"));
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let mut data = SAMPLE.lines().next().unwrap().as_bytes().to_vec();
        data.extend_from_slice(b"\nBad \xff title,1,Enterprise,11/12/16,$1.00,a,,1,General Fund\n");
        data.extend_from_slice(b"Good,2,Enterprise,11/12/16,$2.00,b,,2,General Fund\n");

        let mut table = BidTable::new();
        let report = load_bids_from_reader(data.as_slice(), &mut table).unwrap();

        assert_eq!(report.inserted, 1);
        assert!(matches!(report.rejected.as_slice(), [RowError::Csv { row: 1, .. }]));
        assert!(table.contains("2"));
        assert!(!table.contains("1"));
    }

    #[test]
    fn test_undecodable_header() {
        let data: &[u8] = b"Title,\xffArticleID,Fund\nGood,2,x\n";
        let mut table = BidTable::new();
        let result = load_bids_from_reader(data, &mut table);
        assert!(matches!(result, Err(LoadError::Header { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_canonical_id_row() {
        let data = format!(
            "{SAMPLE}Zero pad,098223,Enterprise,11/16/16,$5.00,2016-106,,13463,General Fund\n"
        );
        let mut table = BidTable::new();
        let report = load_bids_from_reader(data.as_bytes(), &mut table).unwrap();

        let Some(RowError::Key { row, source }) = report.rejected.last() else {
            panic!("expected a key rejection, got {:?}", report.rejected);
        };
        assert_eq!(*row, 7);
        assert!(matches!(source, TableError::NonCanonicalKey { key: 98_223, .. }));
        assert!((table.search("98223").unwrap().amount() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("bidtable-{}.csv", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();

        let mut table = BidTable::new();
        let report = load_bids(&path, &mut table);
        fs::remove_file(&path).unwrap();

        assert_eq!(report.unwrap().inserted, 2);
        assert!(table.contains("98223"));
    }

    #[test]
    fn test_missing_file() {
        let mut table = BidTable::new();
        let result = load_bids("/nonexistent/bids.csv", &mut table);
        assert!(matches!(result, Err(LoadError::Open { .. })));
        assert!(table.is_empty());
    }
}
