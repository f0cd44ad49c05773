//! CSV ingestion into typed price and fundamentals tables.
//!
//! Files are read with polars, every column as text, and parsed into records
//! here so that a stray `N/A` in a numeric column becomes an absent value
//! instead of a failed read.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use sintra_traits::{Date, FundamentalRecord, PricePoint, Result, StudyError};
use tracing::{debug, info, warn};

use crate::schema::{FundamentalsSchema, PriceSchema};

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &["", "nan", "NaN", "NAN", "NA", "N/A", "null", "None", "-"];

/// Accepted naive date-time formats.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepted date formats.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Read a CSV file with a header row, every column as text.
///
/// # Errors
///
/// Returns [`StudyError::Io`] when the file does not exist and
/// [`StudyError::Polars`] when it cannot be parsed as CSV.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(StudyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )));
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "read csv"
    );
    Ok(frame)
}

/// A column as optional text cells, whatever its dtype.
pub(crate) fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|cell: Option<&str>| cell.map(str::to_string))
        .collect();
    Ok(values)
}

/// A column parsed as numbers; unparseable cells are `None`.
pub(crate) fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(text_column(frame, name)?
        .iter()
        .map(|cell| parse_number(cell.as_deref()))
        .collect())
}

/// Number of cells in a column holding anything but a missing marker.
pub(crate) fn present_count(frame: &DataFrame, name: &str) -> Result<usize> {
    Ok(text_column(frame, name)?
        .iter()
        .flatten()
        .filter(|cell| !MISSING_MARKERS.contains(&cell.trim()))
        .count())
}

/// Optional numeric column: all `None` when the column is absent.
fn optional_numeric(frame: &DataFrame, name: Option<&str>) -> Result<Vec<Option<f64>>> {
    match name {
        Some(name) => numeric_column(frame, name),
        None => Ok(vec![None; frame.height()]),
    }
}

/// Parse a numeric cell. Missing markers and non-finite values are `None`.
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if MISSING_MARKERS.contains(&cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date cell.
///
/// Accepts ISO dates, `YYYY/MM/DD`, naive ISO date-times and date-times with
/// an offset (the local calendar date is kept).
///
/// # Errors
///
/// Returns [`StudyError::InvalidDate`] when the cell matches no format.
pub fn parse_date(cell: &str) -> Result<Date> {
    let cell = cell.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(cell, format) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(cell) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = DateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(datetime.date_naive());
    }

    Err(StudyError::InvalidDate(format!("unrecognized date '{cell}'")))
}

/// Daily price history with raw (unnormalized) tickers.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    points: Vec<PricePoint>,
    raw_rows: usize,
}

impl PriceTable {
    /// Create a table from already parsed points.
    pub fn new(points: Vec<PricePoint>) -> Self {
        let raw_rows = points.len();
        Self { points, raw_rows }
    }

    /// Load a price history CSV.
    ///
    /// # Errors
    ///
    /// See [`read_csv`] and [`PriceTable::from_frame`].
    pub fn from_csv(path: &Path, schema: &PriceSchema) -> Result<Self> {
        let frame = read_csv(path)?;
        let table = Self::from_frame(&frame, schema)?;
        info!(
            path = %path.display(),
            rows = table.raw_rows,
            parsed = table.points.len(),
            "loaded price history"
        );
        Ok(table)
    }

    /// Parse a price frame.
    ///
    /// Rows with an empty date are dropped and counted. A missing or
    /// non-numeric close is kept as `None` so the row still marks its day;
    /// tickers are kept as written in the file.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::MissingColumn`] when a required column cannot be
    /// resolved and [`StudyError::InvalidDate`] for an unparseable date.
    pub fn from_frame(frame: &DataFrame, schema: &PriceSchema) -> Result<Self> {
        let columns = schema.resolve(frame)?;

        let dates = text_column(frame, &columns.date)?;
        let tickers = text_column(frame, &columns.ticker)?;
        let closes = numeric_column(frame, &columns.close)?;
        let opens = optional_numeric(frame, columns.open.as_deref())?;
        let highs = optional_numeric(frame, columns.high.as_deref())?;
        let lows = optional_numeric(frame, columns.low.as_deref())?;
        let volumes = optional_numeric(frame, columns.volume.as_deref())?;

        let mut points = Vec::with_capacity(frame.height());
        for row in 0..frame.height() {
            let date = match dates[row].as_deref().map(str::trim) {
                Some(cell) if !MISSING_MARKERS.contains(&cell) => parse_date(cell).map_err(|_| {
                    StudyError::InvalidDate(format!(
                        "row {row} of column '{}': '{cell}'",
                        columns.date
                    ))
                })?,
                _ => continue,
            };
            points.push(PricePoint {
                ticker: tickers[row].clone().unwrap_or_default(),
                date,
                open: opens[row],
                high: highs[row],
                low: lows[row],
                close: closes[row],
                volume: volumes[row],
            });
        }

        let dropped = frame.height() - points.len();
        if dropped > 0 {
            warn!(dropped, "dropped price rows without a date");
        }
        let missing_closes = points.iter().filter(|p| p.close.is_none()).count();
        if missing_closes > 0 {
            warn!(missing_closes, "price rows without a numeric close");
        }

        Ok(Self {
            points,
            raw_rows: frame.height(),
        })
    }

    /// Parsed price points.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of rows in the source, including dropped ones.
    pub const fn raw_rows(&self) -> usize {
        self.raw_rows
    }

    /// Rows dropped while parsing.
    pub fn dropped_rows(&self) -> usize {
        self.raw_rows - self.points.len()
    }

    /// Number of parsed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point was parsed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fundamentals snapshot with raw (unnormalized) tickers.
#[derive(Debug, Clone, Default)]
pub struct FundamentalsTable {
    records: Vec<FundamentalRecord>,
}

impl FundamentalsTable {
    /// Create a table from already parsed records.
    pub const fn new(records: Vec<FundamentalRecord>) -> Self {
        Self { records }
    }

    /// Load a fundamentals CSV.
    ///
    /// # Errors
    ///
    /// See [`read_csv`] and [`FundamentalsTable::from_frame`].
    pub fn from_csv(path: &Path, schema: &FundamentalsSchema) -> Result<Self> {
        let frame = read_csv(path)?;
        let table = Self::from_frame(&frame, schema)?;
        info!(
            path = %path.display(),
            rows = table.records.len(),
            "loaded fundamentals"
        );
        Ok(table)
    }

    /// Parse a fundamentals frame. Every row is kept; ratios that fail to
    /// parse are absent.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::MissingColumn`] when the ticker or P/E column
    /// cannot be resolved.
    pub fn from_frame(frame: &DataFrame, schema: &FundamentalsSchema) -> Result<Self> {
        let columns = schema.resolve(frame)?;

        let tickers = text_column(frame, &columns.ticker)?;
        let pe = numeric_column(frame, &columns.trailing_pe)?;
        let earnings_growth = optional_numeric(frame, columns.earnings_growth.as_deref())?;
        let revenue_growth = optional_numeric(frame, columns.revenue_growth.as_deref())?;
        let debt_to_equity = optional_numeric(frame, columns.debt_to_equity.as_deref())?;
        let peg_ratio = optional_numeric(frame, columns.peg_ratio.as_deref())?;
        let previous_close = optional_numeric(frame, columns.previous_close.as_deref())?;

        let records = (0..frame.height())
            .map(|row| FundamentalRecord {
                ticker: tickers[row].clone().unwrap_or_default(),
                trailing_pe: pe[row],
                earnings_growth: earnings_growth[row],
                revenue_growth: revenue_growth[row],
                debt_to_equity: debt_to_equity[row],
                peg_ratio: peg_ratio[row],
                previous_close: previous_close[row],
            })
            .collect();

        Ok(Self { records })
    }

    /// Parsed records.
    pub fn records(&self) -> &[FundamentalRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("12.5")), Some(12.5));
        assert_eq!(parse_number(Some(" -3 ")), Some(-3.0));
        assert_eq!(parse_number(Some("N/A")), None);
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-01-02").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_date("2023/01/02").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_date("2023-01-02 00:00:00").unwrap(), date(2023, 1, 2));
        assert_eq!(parse_date("2023-01-02T09:15:00").unwrap(), date(2023, 1, 2));
        assert_eq!(
            parse_date("2023-01-02 00:00:00+05:30").unwrap(),
            date(2023, 1, 2)
        );
        assert_eq!(
            parse_date("2023-01-02T00:00:00+05:30").unwrap(),
            date(2023, 1, 2)
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_price_table_from_frame() {
        let df = df! {
            "Date" => &["2023-01-02", "2023-01-03", "", "2023-01-05"],
            "Stock" => &["SBIN.NS", "SBIN.NS", "SBIN.NS", "TCS.NS"],
            "Close" => &["100", "101.5", "102", "N/A"],
            "Volume" => &["10", "20", "30", "40"],
        }
        .unwrap();

        let table = PriceTable::from_frame(&df, &PriceSchema::default()).unwrap();
        assert_eq!(table.raw_rows(), 4);
        assert_eq!(table.len(), 3);
        assert_eq!(table.dropped_rows(), 1);

        let first = &table.points()[0];
        assert_eq!(first.ticker, "SBIN.NS");
        assert_eq!(first.date, date(2023, 1, 2));
        assert_eq!(first.close, Some(100.0));
        assert_eq!(first.volume, Some(10.0));
        assert!(first.open.is_none());

        let unpriced = &table.points()[2];
        assert_eq!(unpriced.ticker, "TCS.NS");
        assert_eq!(unpriced.close, None);
    }

    #[test]
    fn test_price_table_numeric_columns() {
        let df = df! {
            "date" => &["2024-03-01"],
            "Ticker" => &["INFY"],
            "close" => &[1500.25],
        }
        .unwrap();

        let table = PriceTable::from_frame(&df, &PriceSchema::default()).unwrap();
        assert_eq!(table.points()[0].close, Some(1500.25));
    }

    #[test]
    fn test_price_table_invalid_date() {
        let df = df! {
            "Date" => &["2023-01-02", "not a date"],
            "Stock" => &["A", "A"],
            "Close" => &["1", "2"],
        }
        .unwrap();

        let err = PriceTable::from_frame(&df, &PriceSchema::default()).unwrap_err();
        assert!(matches!(err, StudyError::InvalidDate(ref msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_price_table_missing_column() {
        let df = df! {
            "Timestamp" => &["2023-01-02"],
            "Stock" => &["A"],
            "Close" => &["1"],
        }
        .unwrap();

        let err = PriceTable::from_frame(&df, &PriceSchema::default()).unwrap_err();
        assert!(matches!(err, StudyError::MissingColumn { .. }));
    }

    #[test]
    fn test_fundamentals_from_frame() {
        let df = df! {
            "symbol" => &["SBIN", "TCS", "INFY"],
            "trailingPE" => &["9.5", "N/A", "-4"],
            "earningsQuarterlyGrowth" => &["0.12", "", "0.3"],
        }
        .unwrap();

        let table = FundamentalsTable::from_frame(&df, &FundamentalsSchema::default()).unwrap();
        assert_eq!(table.len(), 3);
        let records = table.records();
        assert_eq!(records[0].trailing_pe, Some(9.5));
        assert_eq!(records[0].earnings_growth, Some(0.12));
        assert_eq!(records[1].trailing_pe, None);
        assert_eq!(records[2].trailing_pe, Some(-4.0));
        assert!(records[0].debt_to_equity.is_none());
    }

    #[test]
    fn test_read_csv_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Stock,Close").unwrap();
        writeln!(file, "2023-01-02,SBIN-EQ,100").unwrap();
        writeln!(file, "2023-12-29,SBIN-EQ,120").unwrap();
        file.flush().unwrap();

        let table = PriceTable::from_csv(file.path(), &PriceSchema::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.points()[1].close, Some(120.0));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv(Path::new("/nonexistent/prices.csv")).unwrap_err();
        assert!(matches!(err, StudyError::Io(_)));
    }
}
