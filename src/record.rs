use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::markup::plain_text;

/// Separator between the tab name and the row number in a system id
pub const ID_DELIMITER: &str = "__";

/// Columns that may carry a system's name, in priority order
pub const NAME_FIELDS: [&str; 4] = ["System Name", "ERP", "CRM", "Other System"];

/// Shown when none of the name columns has any text
pub const NO_NAME: &str = "(no name)";

/// Column names that are reserved for the synthetic keys of a record
pub const RESERVED_KEYS: [&str; 2] = ["id", "sheet"];

/// One flattened spreadsheet row
///
/// Serialises to a single flat JSON object holding every header/value pair
/// plus the synthetic `id` and `sheet` keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Composite `<tab>__<row>` identifier
    pub id: String,

    /// Name of the tab the row came from
    pub sheet: String,

    /// Header text to cell value (may contain inline markup)
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(id: &SystemId) -> Self {
        Record {
            id: id.to_string(),
            sheet: id.tab.clone(),
            fields: BTreeMap::new(),
        }
    }

    /// Raw value of a field, or `""` when the row has no such column
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Markup-stripped, trimmed value of a field
    pub fn plain(&self, field: &str) -> String {
        plain_text(self.get(field))
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// First non-empty name column, as plain text
    pub fn name(&self) -> Option<String> {
        NAME_FIELDS
            .iter()
            .map(|field| self.plain(field))
            .find(|name| !name.is_empty())
    }

    /// Display name used for listing and search; never empty
    ///
    /// # Examples
    /// ```
    /// use inquiry::record::{Record, SystemId};
    ///
    /// let id: SystemId = "ERP__5".parse().unwrap();
    /// let mut record = Record::new(&id);
    /// record.set("System Name", "");
    /// record.set("ERP", "<em>Acme</em>");
    /// assert_eq!(record.display_name(), "Acme");
    ///
    /// assert_eq!(Record::new(&id).display_name(), "(no name)");
    /// ```
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| NO_NAME.to_string())
    }
}

/// Parsed form of a composite `<tab>__<row>` identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SystemId {
    pub tab: String,
    /// 1-based spreadsheet row number
    pub row: u32,
}

impl SystemId {
    pub fn new(tab: impl Into<String>, row: u32) -> Self {
        SystemId {
            tab: tab.into(),
            row,
        }
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.tab, ID_DELIMITER, self.row)
    }
}

impl FromStr for SystemId {
    type Err = ApiError;

    /// The row number follows the last delimiter, so tab names may contain
    /// the delimiter themselves.
    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::InvalidId(id.to_string());

        let (tab, row) = id.rsplit_once(ID_DELIMITER).ok_or_else(invalid)?;
        if tab.is_empty() {
            return Err(invalid());
        }
        let row: u32 = row.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(SystemId::new(tab, row))
    }
}

/// Fields that the API lets callers overwrite
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditableField {
    /// "Approved Scopes", posted as `{ "scope": ... }`
    Scope,
    /// "Observations", posted as `{ "observations": ... }`
    Observations,
}

impl EditableField {
    /// Header text of the target column
    pub fn column(self) -> &'static str {
        match self {
            EditableField::Scope => "Approved Scopes",
            EditableField::Observations => "Observations",
        }
    }

    /// JSON body key carrying the new value
    pub fn body_key(self) -> &'static str {
        match self {
            EditableField::Scope => "scope",
            EditableField::Observations => "observations",
        }
    }
}
