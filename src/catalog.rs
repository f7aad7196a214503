use crate::record::Record;

/// Case-insensitive substring search over display names
///
/// An empty query matches everything; the input order is kept.
///
/// # Examples
/// ```
/// use inquiry::catalog::search;
/// use inquiry::record::{Record, SystemId};
///
/// let mut acme = Record::new(&SystemId::new("ERP", 2));
/// acme.set("ERP", "Acme");
/// let mut zen = Record::new(&SystemId::new("CRM", 2));
/// zen.set("CRM", "Zendesk");
/// let records = vec![acme, zen];
///
/// assert_eq!(search("ACM", &records).len(), 1);
/// assert_eq!(search("", &records).len(), 2);
/// ```
pub fn search<'a>(query: &str, records: &'a [Record]) -> Vec<&'a Record> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.display_name().to_lowercase().contains(&query))
        .collect()
}

/// The client's copy of the systems list
///
/// Loaded wholesale from a listing and changed only through
/// [`Catalog::apply_confirmed_write`] once the server has acknowledged it.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        Catalog { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<&Record> {
        search(query, &self.records)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Record a value the server has stored; returns `false` for unknown ids
    pub fn apply_confirmed_write(&mut self, id: &str, field: &str, value: &str) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.set(field, value);
                true
            }
            None => false,
        }
    }
}
