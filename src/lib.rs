/*!
# Inquiry Compilation

A browser-based lookup and edit tool for a spreadsheet of software systems,
served by a small proxy in front of Google Sheets.

## Overview

Systems (ERP, CRM and other vendors) are kept in several tabs of one
spreadsheet, each tab with its own header row. The server flattens every tab
into uniform records, lets a browser search them by name and shows every
attribute of a selected system. One field, "Approved Scopes", can be edited
and is written straight back to its cell.

## Architecture

### Row Flattener (server)
- Lists the tabs, reads each one up to a fixed window (2000 rows, `A:Z` by
  default) and zips header text to cell values
- Gives every row the composite id `<tab>__<row>` and drops rows without a
  name in `System Name`, `ERP`, `CRM` or `Other System`
- Writes a single cell for an edit, locating the column by its header

### Rich text (optional)
- Bold, italic and underline runs are turned into `<strong>`, `<em>` and `<u>`

### Detail Renderer (browser)
- Display names, case-insensitive search, and a card per column with
  field-specific presentation (pre-approval mark, research link, link lists,
  YES/NO badges)

## REST API Endpoints

- `GET /api/systems` - All flattened records
- `POST /api/systems/:id/scope` - Overwrite "Approved Scopes"
- `POST /api/systems/:id/observations` - Overwrite "Observations"
- `GET /ui`, `GET /ui/systems/:id` - Server-rendered search and detail pages
- `GET /` - Liveness text

## Modules

- **record**: Record model, composite ids, editable fields
- **markup**: Tag stripping, escaping and rich-text runs
- **column**: Column labels and A1 ranges
- **source**: The tabular data source trait and an in-memory implementation
- **flatten**: Listing and single-field updates
- **catalog**: Client-side list state and search
- **render**: Detail cards
- **config**: Environment configuration
- **google**: Google Sheets client
- **app**, **ui**: Routing, JSON handlers and HTML pages
*/

pub mod catalog;
pub mod column;
pub mod config;
pub mod error;
pub mod flatten;
pub mod markup;
pub mod record;
pub mod render;
pub mod source;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod google;
#[cfg(feature = "web")]
pub mod ui;

/// Re-export the types most callers need
pub use catalog::{Catalog, search};
pub use error::ApiError;
pub use flatten::{SheetWindow, list_systems, update_field};
pub use record::{EditableField, Record, SystemId};
pub use source::{CellMode, MemorySource, TabularSource};
