use serde::Deserialize;
use std::collections::HashSet;
use std::future::{Future, ready};
use std::path::Path;
use std::sync::RwLock;

use crate::column::CellRange;
use crate::error::ApiError;

/// How cell contents are returned by a range read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellMode {
    /// Formatted values only
    #[default]
    Values,
    /// Formatted values with bold/italic/underline runs turned into markup
    Rich,
}

/// A spreadsheet-like store of named tabs
///
/// Reads return rows of strings; trailing empty cells and rows may be
/// omitted by the implementation, interior empty rows are kept so row
/// positions stay aligned with spreadsheet row numbers.
pub trait TabularSource: Send + Sync + 'static {
    /// Names of every tab, in spreadsheet order
    fn list_tabs(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Read the rectangle `range` of `tab`, starting at `A1`
    fn read_range(
        &self,
        tab: &str,
        range: CellRange,
        mode: CellMode,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, ApiError>> + Send;

    /// Overwrite one cell with a raw (unparsed) value
    ///
    /// `column` is zero-based, `row` is the 1-based spreadsheet row.
    fn write_cell(
        &self,
        tab: &str,
        column: usize,
        row: u32,
        value: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Tabs held in memory, used for local runs from a fixture and for tests
///
/// Cells are stored as given, so markup in a fixture is returned unchanged
/// in both [`CellMode`]s.
#[derive(Debug, Default)]
pub struct MemorySource {
    tabs: RwLock<Vec<(String, Vec<Vec<String>>)>>,
    failing: HashSet<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab; the first row is the header row
    pub fn with_tab(self, name: &str, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.push_tab(name.to_string(), rows);
        self
    }

    /// Make every read or write touching `name` fail with a data source error
    pub fn with_failing_tab(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Load tabs from a JSON object mapping tab names to arrays of rows
    ///
    /// # Examples
    /// ```
    /// use inquiry::source::MemorySource;
    ///
    /// let source = MemorySource::from_json(r#"{ "ERP": [["System Name"], ["Acme"]] }"#).unwrap();
    /// assert_eq!(source.cell("ERP", 0, 2).as_deref(), Some("Acme"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        // Keeps the tab order of the file.
        #[derive(Deserialize)]
        struct Fixture(
            #[serde(deserialize_with = "ordered::deserialize")] Vec<(String, Vec<Vec<String>>)>,
        );

        let Fixture(tabs) = serde_json::from_str(json)?;
        Ok(MemorySource {
            tabs: RwLock::new(tabs),
            failing: HashSet::new(),
        })
    }

    /// Load a fixture file, see [`MemorySource::from_json`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Current value of a cell (`column` zero-based, `row` 1-based)
    pub fn cell(&self, tab: &str, column: usize, row: u32) -> Option<String> {
        let tabs = self.tabs.read().ok()?;
        let (_, rows) = tabs.iter().find(|(name, _)| name == tab)?;
        rows.get(row.checked_sub(1)? as usize)?.get(column).cloned()
    }

    fn push_tab(&self, name: String, rows: Vec<Vec<String>>) {
        if let Ok(mut tabs) = self.tabs.write() {
            tabs.push((name, rows));
        }
    }

    fn check(&self, tab: &str) -> Result<(), ApiError> {
        if self.failing.contains(tab) {
            return Err(ApiError::DataSource(format!("tab '{}' is unavailable", tab)));
        }
        Ok(())
    }

    fn read(&self, tab: &str, range: CellRange) -> Result<Vec<Vec<String>>, ApiError> {
        self.check(tab)?;
        let tabs = self.tabs.read().map_err(ApiError::data_source)?;
        let (_, rows) = tabs
            .iter()
            .find(|(name, _)| name == tab)
            .ok_or_else(|| ApiError::DataSource(format!("unable to parse range: {}", tab)))?;

        Ok(rows
            .iter()
            .take(range.last_row as usize)
            .map(|row| row.iter().take(range.columns).cloned().collect())
            .collect())
    }

    fn write(&self, tab: &str, column: usize, row: u32, value: &str) -> Result<(), ApiError> {
        self.check(tab)?;
        if row == 0 {
            return Err(ApiError::DataSource("row numbers start at 1".to_string()));
        }
        let mut tabs = self.tabs.write().map_err(ApiError::data_source)?;
        let (_, rows) = tabs
            .iter_mut()
            .find(|(name, _)| name == tab)
            .ok_or_else(|| ApiError::DataSource(format!("unable to parse range: {}", tab)))?;

        let row = row as usize - 1;
        if rows.len() <= row {
            rows.resize(row + 1, Vec::new());
        }
        let cells = &mut rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
        Ok(())
    }
}

impl TabularSource for MemorySource {
    fn list_tabs(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send {
        let tabs: Result<Vec<String>, ApiError> = self
            .tabs
            .read()
            .map(|tabs| tabs.iter().map(|(name, _)| name.clone()).collect())
            .map_err(ApiError::data_source);
        ready(tabs)
    }

    fn read_range(
        &self,
        tab: &str,
        range: CellRange,
        _mode: CellMode,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, ApiError>> + Send {
        ready(self.read(tab, range))
    }

    fn write_cell(
        &self,
        tab: &str,
        column: usize,
        row: u32,
        value: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        ready(self.write(tab, column, row, value))
    }
}

/// Deserialize a JSON object into its entries, preserving file order
mod ordered {
    use serde::de::{Deserializer, MapAccess, Visitor};
    use std::fmt;

    type Tabs = Vec<(String, Vec<Vec<String>>)>;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tabs, D::Error> {
        struct TabsVisitor;

        impl<'de> Visitor<'de> for TabsVisitor {
            type Value = Tabs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping tab names to rows")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Tabs, A::Error> {
                let mut tabs = Vec::new();
                while let Some(entry) = map.next_entry()? {
                    tabs.push(entry);
                }
                Ok(tabs)
            }
        }

        deserializer.deserialize_map(TabsVisitor)
    }
}
