//! Minimal comma-separated codec for the selection file.
//!
//! Fields may be quoted with `"`; inside quotes `""` is a literal quote and
//! commas and line breaks are kept. Both `\n` and `\r\n` end a record.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::StoreError;
use crate::record::{SelectionRecord, SelectionTable, ELEMENT_COLUMN};

/// Parse the file text into a table. Blank lines and rows with an empty
/// `element` are skipped; an empty text is an empty table.
pub fn parse_table(path: &Path, text: &str) -> Result<SelectionTable, StoreError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(path, text)?.into_iter();

    let Some((_, header)) = records.next() else {
        return Ok(SelectionTable::default());
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();
    let element_at = header
        .iter()
        .position(|h| h == ELEMENT_COLUMN)
        .ok_or_else(|| StoreError::MissingElementColumn {
            path: path.to_path_buf(),
        })?;

    let mut rows = Vec::new();
    for (line, values) in records {
        if values.len() > header.len() {
            return Err(StoreError::Malformed {
                path: path.to_path_buf(),
                line,
                message: format!(
                    "{} fields, header has {}",
                    values.len(),
                    header.len()
                ),
            });
        }
        let mut element = String::new();
        let mut fields = BTreeMap::new();
        for (i, value) in values.into_iter().enumerate() {
            if i == element_at {
                element = value;
            } else {
                fields.insert(header[i].clone(), value);
            }
        }
        if element.is_empty() {
            continue;
        }
        rows.push(SelectionRecord { element, fields });
    }

    Ok(SelectionTable { header, rows })
}

/// Render a table. Columns follow the header; a record's field missing from
/// the header is appended as a new column. A table without rows is the single
/// header `element`.
pub fn write_table(table: &SelectionTable) -> String {
    if table.rows.is_empty() {
        return format!("{}\n", ELEMENT_COLUMN);
    }
    let mut header = table.header.clone();
    if !header.iter().any(|h| h == ELEMENT_COLUMN) {
        header.insert(0, ELEMENT_COLUMN.to_string());
    }
    for row in &table.rows {
        for key in row.fields.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }

    let mut out = String::new();
    push_record(&mut out, header.iter().map(String::as_str));
    for row in &table.rows {
        push_record(
            &mut out,
            header.iter().map(|column| {
                if column == ELEMENT_COLUMN {
                    row.element.as_str()
                } else {
                    row.fields.get(column).map(String::as_str).unwrap_or("")
                }
            }),
        );
    }
    out
}

fn push_record<'a>(out: &mut String, values: impl Iterator<Item = &'a str>) {
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, value);
    }
    out.push('\n');
}

fn push_field(out: &mut String, value: &str) {
    if value.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

/// Split text into records of fields, each tagged with its 1-based starting
/// line. Records made of a single empty field (blank lines) are dropped.
fn split_records(path: &Path, text: &str) -> Result<Vec<(usize, Vec<String>)>, StoreError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_non_blank(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::Malformed {
            path: path.to_path_buf(),
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_non_blank(&mut records, record_line, fields);
    }
    Ok(records)
}

fn push_non_blank(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    if fields.len() == 1 && fields[0].trim().is_empty() {
        return;
    }
    records.push((line, fields));
}
