/// Convert a zero-based column index to a spreadsheet column label
///
/// Labels continue past `Z` with multiple letters (`AA`, `AB`, ...), so
/// writes can address any column a read can return.
///
/// # Examples
/// ```
/// use inquiry::column::column_label;
///
/// assert_eq!(column_label(0), "A");
/// assert_eq!(column_label(25), "Z");
/// assert_eq!(column_label(26), "AA");
/// assert_eq!(column_label(51), "AZ");
/// ```
pub fn column_label(index: usize) -> String {
    let mut col = index + 1;
    let mut result = String::new();
    while col > 0 {
        col -= 1;
        result.push(((col % 26) as u8 + b'A') as char);
        col /= 26;
    }
    result.chars().rev().collect()
}

/// Convert a column label back to its zero-based index
///
/// Returns `None` for an empty label or one containing anything other than
/// ASCII letters, or too long to fit a `usize`. Lowercase letters are
/// accepted.
pub fn column_index(label: &str) -> Option<usize> {
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = label.chars().try_fold(0usize, |acc, c| {
        acc.checked_mul(26)?
            .checked_add(c.to_ascii_uppercase() as usize - 'A' as usize + 1)
    })?;
    Some(col - 1)
}

/// Quote a tab name for use in A1 notation
///
/// # Examples
/// ```
/// use inquiry::column::quote_tab;
///
/// assert_eq!(quote_tab("Other Systems"), "'Other Systems'");
/// assert_eq!(quote_tab("Bob's"), "'Bob''s'");
/// ```
pub fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// A rectangle anchored at `A1`: `last_row` rows by `columns` columns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub last_row: u32,
    pub columns: usize,
}

impl CellRange {
    /// Only the header row
    pub fn header(columns: usize) -> Self {
        CellRange {
            last_row: 1,
            columns,
        }
    }

    /// Render as an A1 range on `tab`, e.g. `'ERP'!A1:Z2000`
    pub fn to_a1(&self, tab: &str) -> String {
        format!(
            "{}!A1:{}{}",
            quote_tab(tab),
            column_label(self.columns.saturating_sub(1)),
            self.last_row
        )
    }
}

/// A1 address of a single cell, e.g. `'ERP'!H5`
pub fn cell_a1(tab: &str, column: usize, row: u32) -> String {
    format!("{}!{}{}", quote_tab(tab), column_label(column), row)
}
