//! CSV persistence for ticker frames.
//!
//! Layout: header `Date,<T1>,<T2>,...`, one row per date in `YYYY-MM-DD`,
//! values written with round-trip precision.

use super::frame::TickerFrame;
use super::provider::DataError;
use super::series::{PriceSeries, ReturnSeries};
use chrono::NaiveDate;
use std::io::{Read, Write};
use std::path::Path;

const DATE_COLUMN: &str = "Date";

pub fn write_frame<W: Write>(writer: W, frame: &TickerFrame) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(frame.n_cols() + 1);
    header.push(DATE_COLUMN.to_string());
    header.extend(frame.tickers().iter().cloned());
    wtr.write_record(&header)?;

    for (date, row) in frame.dates().iter().zip(frame.rows()) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn read_frame<R: Read>(reader: R) -> Result<TickerFrame, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.get(0) != Some(DATE_COLUMN) {
        return Err(DataError::Parse(format!(
            "first column must be '{DATE_COLUMN}', got {:?}",
            headers.get(0)
        )));
    }
    let tickers: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut dates = Vec::new();
    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|e| DataError::Parse(format!("row {line}: bad date '{raw_date}': {e}")))?;

        let row = record
            .iter()
            .skip(1)
            .map(|cell| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|e| DataError::Parse(format!("row {line}: bad value '{cell}': {e}")))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        dates.push(date);
        rows.push(row);
    }

    TickerFrame::new(tickers, dates, rows)
}

impl PriceSeries {
    pub fn write_csv(&self, path: &Path) -> Result<(), DataError> {
        write_frame(std::fs::File::create(path)?, self.frame())
    }

    pub fn read_csv(path: &Path) -> Result<Self, DataError> {
        Ok(Self::new(read_frame(std::fs::File::open(path)?)?))
    }
}

impl ReturnSeries {
    pub fn write_csv(&self, path: &Path) -> Result<(), DataError> {
        write_frame(std::fs::File::create(path)?, self.frame())
    }

    pub fn read_csv(path: &Path) -> Result<Self, DataError> {
        Ok(Self::new(read_frame(std::fs::File::open(path)?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_frame_reads_back_identically() {
        let frame = TickerFrame::new(
            vec!["AAPL".into(), "MSFT".into()],
            vec![
                NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(),
            ],
            vec![vec![0.1 + 0.2, -0.012_345_678_9], vec![1e-9, 3.0]],
        )
        .unwrap();

        let mut buf = Vec::new();
        write_frame(&mut buf, &frame).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Date,AAPL,MSFT\n2022-01-03,"));

        let back = read_frame(buf.as_slice()).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn rejects_missing_date_header() {
        let csv = "When,AAPL\n2022-01-03,1.0\n";
        assert!(matches!(read_frame(csv.as_bytes()), Err(DataError::Parse(_))));
    }

    #[test]
    fn rejects_non_numeric_cell() {
        let csv = "Date,AAPL\n2022-01-03,abc\n";
        assert!(matches!(read_frame(csv.as_bytes()), Err(DataError::Parse(_))));
    }
}
