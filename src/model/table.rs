use crate::error::{Res, SchemaError};
use anyhow::bail;
use std::collections::HashMap;

/// A raw table of text cells as read from a CSV file or a spreadsheet, before any typing. The
/// first row of the source is taken as the header row.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    header_map: HashMap<String, usize>,
    duplicates: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Given the rows of a sheet, parse the header row and the data rows into a `Table`.
    ///
    /// Think of `sheet_data` as something that looks like `Vec<Vec<String>>`. An empty data set is
    /// an empty table with no headers. Rows where every cell is blank are skipped. Rows shorter
    /// than the header row are padded with empty cells; longer rows are an error. A header that
    /// appears more than once maps to its first column and is remembered as a duplicate.
    pub fn parse<S, R, I>(sheet_data: I) -> Res<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .into_iter()
                .map(|s| s.into().trim().to_string())
                .collect(),
            None => return Ok(Self::default()),
        };

        let mut header_map = HashMap::new();
        let mut duplicates = Vec::new();
        for (ix, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if header_map.contains_key(header) {
                if !duplicates.contains(header) {
                    duplicates.push(header.clone());
                }
            } else {
                header_map.insert(header.clone(), ix);
            }
        }

        let len = headers.len();
        let mut data = Vec::new();
        for (row_ix, row) in rows.enumerate() {
            let mut values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            if values.len() > len {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            values.resize(len, String::new());
            data.push(values);
        }

        Ok(Self {
            headers,
            header_map,
            duplicates,
            rows: data,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header_index(&self, header: &str) -> Option<usize> {
        self.header_map.get(header).cloned()
    }

    /// Finds the column index of every name in `required`, in order. Fails with a `SchemaError`
    /// naming all of the columns that are absent or that appear more than once. Matching is exact
    /// and case-sensitive.
    pub fn require_columns<const N: usize>(
        &self,
        required: [&str; N],
    ) -> std::result::Result<[usize; N], SchemaError> {
        let mut found = [0usize; N];
        let mut missing = Vec::new();
        let mut duplicated = Vec::new();
        for (slot, name) in found.iter_mut().zip(required) {
            match self.header_index(name) {
                Some(ix) => *slot = ix,
                None => missing.push(name.to_string()),
            }
            if self.duplicates.iter().any(|d| d == name) {
                duplicated.push(name.to_string());
            }
        }
        if missing.is_empty() && duplicated.is_empty() {
            Ok(found)
        } else {
            Err(SchemaError::with_duplicated(missing, duplicated))
        }
    }

    /// The headers that are not in `known`, in the order they appear. A repeated extra header is
    /// listed once per column.
    pub fn extra_columns(&self, known: &[&str]) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| !h.is_empty() && !known.contains(&h.as_str()))
            .cloned()
            .collect()
    }
}
