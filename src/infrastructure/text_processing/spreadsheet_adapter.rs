use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use calamine::{Data, Reader};

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction, file_extension};

use super::blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
use super::text_sanitizer::render_table;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Workbooks (`.xlsx`, `.xls`, `.ods`) and delimited text (`.csv`, `.tsv`).
/// Each worksheet becomes one table chunk in a section named after the sheet.
pub struct SpreadsheetAdapter {
    timeout: Duration,
}

impl SpreadsheetAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn parse_workbook(data: Vec<u8>) -> Result<RawExtraction, ExtractionError> {
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data)).map_err(|e| {
            ExtractionError::malformed(FormatFamily::Spreadsheet, format!("cannot open workbook: {e}"))
        })?;

        let sheet_names = workbook.sheet_names();
        let mut units = Vec::with_capacity(sheet_names.len());

        for sheet_name in &sheet_names {
            let range = match workbook.worksheet_range(sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!(sheet = %sheet_name, error = %e, "Skipping unreadable worksheet");
                    continue;
                }
            };

            let rows: Vec<Vec<String>> = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();

            let text = render_table(&rows);
            if !text.is_empty() {
                units.push(RawContentUnit::table(text).in_section(Some(sheet_name.clone())));
            }
        }

        Ok(RawExtraction::new(units)
            .with_metadata("sheetCount", sheet_names.len())
            .with_metadata("sheetNames", sheet_names))
    }

    fn parse_delimited(data: Vec<u8>, delimiter: u8) -> Result<RawExtraction, ExtractionError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(data.as_slice());

        let mut rows = Vec::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| {
                ExtractionError::malformed(
                    FormatFamily::Spreadsheet,
                    format!("invalid record {}: {e}", index + 1),
                )
            })?;
            rows.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect::<Vec<_>>(),
            );
        }

        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let text = render_table(&rows);
        let units = if text.is_empty() {
            Vec::new()
        } else {
            vec![RawContentUnit::table(text)]
        };

        Ok(RawExtraction::new(units)
            .with_metadata("rowCount", row_count)
            .with_metadata("columnCount", column_count))
    }
}

impl Default for SpreadsheetAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_TIMEOUT)
    }
}

#[async_trait]
impl FormatExtractor for SpreadsheetAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Spreadsheet
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let owned = data.to_vec();
        let extraction = if is_workbook(data) {
            parse_on_blocking_pool(FormatFamily::Spreadsheet, self.timeout, move || {
                Self::parse_workbook(owned)
            })
            .await?
        } else {
            let delimiter = delimiter_for(file_name);
            parse_on_blocking_pool(FormatFamily::Spreadsheet, self.timeout, move || {
                Self::parse_delimited(owned, delimiter)
            })
            .await?
        };

        tracing::info!(units = extraction.units.len(), "Spreadsheet extraction complete");
        Ok(extraction)
    }
}

fn is_workbook(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC) || data.starts_with(CFB_MAGIC)
}

fn delimiter_for(file_name: &str) -> u8 {
    match file_extension(file_name) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        _ => String::new(),
    }
}
