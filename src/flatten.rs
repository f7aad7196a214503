use crate::column::{CellRange, column_label};
use crate::error::ApiError;
use crate::markup::strip_tags;
use crate::record::{RESERVED_KEYS, Record, SystemId};
use crate::source::{CellMode, TabularSource};

/// Default number of rows read per tab, header included
pub const DEFAULT_MAX_ROWS: u32 = 2000;

/// Default number of columns read per tab (`A` through `Z`)
pub const DEFAULT_COLUMNS: usize = 26;

/// The part of every tab that is read: rows `1..=max_rows`, `columns` wide
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetWindow {
    pub max_rows: u32,
    pub columns: usize,
}

impl Default for SheetWindow {
    fn default() -> Self {
        SheetWindow {
            max_rows: DEFAULT_MAX_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl SheetWindow {
    pub fn range(&self) -> CellRange {
        CellRange {
            last_row: self.max_rows,
            columns: self.columns,
        }
    }

    pub fn header(&self) -> CellRange {
        CellRange::header(self.columns)
    }
}

/// Turn one tab's rows into records
///
/// The first row holds the headers. Each later row becomes a record keyed by
/// header text; columns with an empty header are ignored and missing cells
/// read as `""`. Rows without any name column are dropped.
///
/// # Examples
/// ```
/// use inquiry::flatten::flatten_tab;
///
/// let rows = vec![
///     vec!["System Name".to_string(), "ERP".to_string()],
///     vec![String::new(), String::new()],
///     vec![String::new(), "Acme".to_string()],
/// ];
/// let records = flatten_tab("ERP", &rows);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].id, "ERP__3");
/// assert_eq!(records[0].display_name(), "Acme");
/// ```
pub fn flatten_tab(tab: &str, rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header_row, data)) = rows.split_first() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|h| {
            let key = strip_tags(h);
            (!key.is_empty() && !RESERVED_KEYS.contains(&key.as_str())).then_some(key)
        })
        .collect();
    if headers.iter().all(Option::is_none) {
        return Vec::new();
    }

    let mut records = Vec::new();
    for (i, row) in data.iter().enumerate() {
        // Data starts on the second spreadsheet row.
        let id = SystemId::new(tab, i as u32 + 2);
        let mut record = Record::new(&id);

        for (col, header) in headers.iter().enumerate() {
            if let Some(key) = header {
                let value = row.get(col).cloned().unwrap_or_default();
                record.set(key.clone(), value);
            }
        }

        if record.name().is_none() {
            continue;
        }
        records.push(record);
    }

    records
}

/// Read every tab and concatenate their records, tab by tab
///
/// Tabs are read one after another. The first failing read aborts the whole
/// listing; records already collected are discarded.
pub async fn list_systems<S: TabularSource>(
    source: &S,
    window: SheetWindow,
    mode: CellMode,
) -> Result<Vec<Record>, ApiError> {
    let tabs = source.list_tabs().await?;

    let mut all = Vec::new();
    for tab in &tabs {
        let rows = source.read_range(tab, window.range(), mode).await?;
        let records = flatten_tab(tab, &rows);
        log::debug!("tab '{}': {} rows, {} systems", tab, rows.len(), records.len());
        all.extend(records);
    }

    Ok(all)
}

/// Overwrite `field` of the system identified by `id` with `value`
///
/// The header row of the target tab is re-read on every call and the column
/// is located by exact header match. The value is written raw.
pub async fn update_field<S: TabularSource>(
    source: &S,
    window: SheetWindow,
    id: &str,
    field: &str,
    value: &str,
) -> Result<(), ApiError> {
    let id: SystemId = id.parse()?;

    let header_rows = source
        .read_range(&id.tab, window.header(), CellMode::Values)
        .await?;
    let column = header_rows
        .first()
        .and_then(|headers| headers.iter().position(|h| h == field))
        .ok_or_else(|| ApiError::ColumnNotFound {
            tab: id.tab.clone(),
            column: field.to_string(),
        })?;

    log::info!(
        "writing '{}' of {} at {}{}",
        field,
        id,
        column_label(column),
        id.row
    );
    source.write_cell(&id.tab, column, id.row, value).await
}
