//! Spreadsheet question import.
//!
//! Only the first sheet is read. The first row of that sheet names the
//! columns; every following non-blank row becomes one question. Rows with
//! missing cells or an unknown answer letter are skipped and reported, while
//! structural problems (no sheet, no rows, missing headers) fail the whole
//! import.

use std::fmt;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::models::Question;

pub const QUESTION_NUMBER: &str = "Q#";
pub const QUESTION_TEXT: &str = "Question Text";
pub const OPTION_HEADERS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];
pub const CORRECT_ANSWER: &str = "Correct Answer";

/// Headers the first row must contain, in the order they are reported.
pub const REQUIRED_HEADERS: [&str; 7] = [
    QUESTION_NUMBER,
    QUESTION_TEXT,
    OPTION_HEADERS[0],
    OPTION_HEADERS[1],
    OPTION_HEADERS[2],
    OPTION_HEADERS[3],
    CORRECT_ANSWER,
];

/// Result of a successful import.
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub questions: Vec<Question>,
    pub skipped: Vec<SkippedRow>,
}

/// A data row that was left out of the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Spreadsheet row number as shown in a spreadsheet program (header is row 1).
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFields,
    InvalidAnswer(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingFields => write!(f, "Missing question or one or more options."),
            SkipReason::InvalidAnswer(value) => write!(
                f,
                "Invalid 'Correct Answer' value: '{}'. Expected 'A', 'B', 'C', or 'D'.",
                value
            ),
        }
    }
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipping row {}: {}", self.row, self.reason)
    }
}

/// Parse an `.xlsx`/`.xls`/`.ods` byte buffer into questions.
pub fn parse_spreadsheet(bytes: &[u8]) -> Result<ParsedSheet, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = first_sheet_name(&sheet_names)?;
    let range = workbook.worksheet_range(sheet_name)?;

    debug!(sheet = %sheet_name, sheets = sheet_names.len(), "Reading first sheet");
    parse_range(&range)
}

fn first_sheet_name(names: &[String]) -> Result<&str, ParseError> {
    names
        .first()
        .map(String::as_str)
        .ok_or(ParseError::EmptyWorkbook)
}

/// Parse one sheet whose first row holds the column headers.
pub fn parse_range(range: &Range<Data>) -> Result<ParsedSheet, ParseError> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows().enumerate();

    let headers: Vec<String> = match rows.next() {
        Some((_, header_row)) => header_row
            .iter()
            .map(|cell| cell_text(cell).trim().to_string())
            .collect(),
        None => return Err(ParseError::NoDataRows),
    };

    let records: Vec<(usize, RowRecord)> = rows
        .filter(|(_, cells)| !cells.iter().all(is_blank))
        .map(|(offset, cells)| {
            let row_number = first_row + offset + 1;
            (row_number, RowRecord::new(&headers, cells))
        })
        .collect();

    if records.is_empty() {
        return Err(ParseError::NoDataRows);
    }

    let missing = missing_headers(&headers);
    if !missing.is_empty() {
        return Err(ParseError::MissingHeaders(missing));
    }

    let mut parsed = ParsedSheet::default();
    for (row, record) in records {
        match parse_record(&record) {
            Ok(question) => parsed.questions.push(question),
            Err(reason) => {
                let skipped = SkippedRow { row, reason };
                warn!(row, reason = %skipped.reason, "Skipping spreadsheet row");
                parsed.skipped.push(skipped);
            }
        }
    }

    debug!(
        questions = parsed.questions.len(),
        skipped = parsed.skipped.len(),
        "Spreadsheet parsed"
    );
    Ok(parsed)
}

fn missing_headers(headers: &[String]) -> Vec<String> {
    REQUIRED_HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect()
}

/// One data row viewed through the header row.
struct RowRecord<'a> {
    headers: &'a [String],
    cells: &'a [Data],
}

impl<'a> RowRecord<'a> {
    fn new(headers: &'a [String], cells: &'a [Data]) -> Self {
        Self { headers, cells }
    }

    fn get(&self, header: &str) -> Option<&'a Data> {
        let column = self.headers.iter().position(|h| h == header)?;
        self.cells.get(column)
    }

    /// Cell contents as text, or `None` when the cell is absent or blank.
    fn text(&self, header: &str) -> Option<String> {
        self.get(header)
            .filter(|cell| !is_blank(cell))
            .map(cell_text)
    }
}

fn parse_record(record: &RowRecord) -> Result<Question, SkipReason> {
    let text = record.text(QUESTION_TEXT);
    let [a, b, c, d] = OPTION_HEADERS.map(|header| record.text(header));

    let (Some(text), Some(a), Some(b), Some(c), Some(d)) = (text, a, b, c, d) else {
        return Err(SkipReason::MissingFields);
    };

    let letter = record
        .text(CORRECT_ANSWER)
        .map(|value| value.trim().to_uppercase())
        .unwrap_or_default();
    let Some(correct_answer) = answer_index(&letter) else {
        return Err(SkipReason::InvalidAnswer(letter));
    };

    Question::new(text, [a, b, c, d], correct_answer).map_err(|_| SkipReason::InvalidAnswer(letter))
}

/// Map a normalized answer letter to its option index.
pub fn answer_index(letter: &str) -> Option<usize> {
    match letter {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render any cell as text; numbers and booleans are stringified.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            // Integral values come back as floats from most writers.
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => e.to_string(),
    }
}
