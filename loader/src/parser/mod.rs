//! Delimited file reader with optional encoding and delimiter auto-detection.
//!
//! Loads a CSV file into a [`Table`] of raw cells. Typing of cells happens
//! later, per column, in [`crate::parser::infer`].

pub mod infer;

use std::path::Path;

use crate::error::{DataAccessError, ReadResult};

/// Cell contents treated as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How the field delimiter is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Fixed(u8),
    /// Most frequent of `;`, `,`, tab, `|` in the header line.
    Auto,
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Fixed(b',')
    }
}

/// How the file bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8; invalid bytes are an error.
    #[default]
    Utf8,
    /// Detect with chardet, then decode.
    Auto,
}

/// Reader options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub delimiter: Delimiter,
    pub encoding: Encoding,
}

/// Raw tabular contents of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names, de-duplicated, in file order
    pub headers: Vec<String>,
    /// One entry per data row; `None` marks a missing cell
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|c| c.as_deref()))
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the named encoding.
///
/// UTF-8 is strict. Labels `encoding_rs` does not know fall back to UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReadResult<String> {
    let label = encoding.to_lowercase();
    let codec = match label.as_str() {
        "utf-8" | "utf8" | "ascii" => None,
        "iso-8859-1" | "latin-1" | "latin1" => Some(encoding_rs::WINDOWS_1252),
        other => encoding_rs::Encoding::for_label(other.as_bytes()),
    };

    let text = match codec {
        Some(codec) if codec != encoding_rs::UTF_8 => {
            let (text, _, had_errors) = codec.decode(bytes);
            if had_errors {
                return Err(DataAccessError::Encoding { encoding: label });
            }
            text.into_owned()
        }
        _ => String::from_utf8(bytes.to_vec())
            .map_err(|_| DataAccessError::Encoding { encoding: "utf-8".to_string() })?,
    };

    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [b',', b';', b'\t', b'|'];
    let mut best_sep = b',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read a delimited file from disk.
pub fn read_table<P: AsRef<Path>>(path: P, options: &ReadOptions) -> ReadResult<Table> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DataAccessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes, options)
}

/// Parse delimited bytes according to `options`.
pub fn parse_bytes(bytes: &[u8], options: &ReadOptions) -> ReadResult<Table> {
    let encoding = match options.encoding {
        Encoding::Utf8 => "utf-8".to_string(),
        Encoding::Auto => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding)?;

    let delimiter = match options.delimiter {
        Delimiter::Fixed(d) => d,
        Delimiter::Auto => detect_delimiter(&content),
    };

    parse_table(&content, delimiter)
}

/// Parse CSV text with an explicit delimiter.
///
/// The first record is the header. Blank lines are skipped, short rows are
/// padded with missing cells. When the first data row has exactly one more
/// field than the header, the leading field of every row is a row index and
/// is dropped. Any other row longer than the header is rejected.
pub fn parse_table(content: &str, delimiter: u8) -> ReadResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(DataAccessError::NoColumns);
    }
    let headers = normalize_headers(raw_headers.iter());
    let width = headers.len();

    let mut index_column: Option<bool> = None;
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        let has_index = *index_column.get_or_insert(record.len() == width + 1);
        let (skip, max_fields) = if has_index { (1, width + 1) } else { (0, width) };

        if record.len() > max_fields {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(DataAccessError::TooManyFields {
                line,
                expected: max_fields,
                found: record.len(),
            });
        }

        let mut row: Vec<Option<String>> = record.iter().skip(skip).map(to_cell).collect();
        row.resize(width, None);
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn to_cell(raw: &str) -> Option<String> {
    if NA_VALUES.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Name blank headers `Unnamed: <idx>` and suffix repeats with `.1`, `.2`, ...
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();

    for (idx, name) in raw.enumerate() {
        let base = if name.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        headers.push(candidate);
    }

    headers
}
