use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref ALLOWED_TAG_REGEX: Regex =
        Regex::new(r"^</?(strong|em|u|b|i)>$|^<br\s*/?>$").unwrap();
}

/// Remove every `<...>` tag from a cell value and decode the basic entities
///
/// Whitespace is left as it is.
///
/// # Examples
/// ```
/// use inquiry::markup::strip_tags;
///
/// assert_eq!(strip_tags("<strong>Acme</strong> ERP"), "Acme ERP");
/// assert_eq!(strip_tags("<strong>&lt;3</strong> CRM"), "<3 CRM");
/// assert_eq!(strip_tags(""), "");
/// ```
pub fn strip_tags(value: &str) -> String {
    decode_entities(&TAG_REGEX.replace_all(value, ""))
}

/// Undo [`escape_html`]; `&amp;` goes last so `&amp;lt;` decodes to `&lt;`
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Markup-stripped and trimmed text of a cell value
pub fn plain_text(value: &str) -> String {
    strip_tags(value).trim().to_string()
}

/// Escape text for inclusion in HTML content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a markup-bearing cell value while keeping inline formatting tags
///
/// The tags produced by [`runs_to_markup`] (plus `<b>`, `<i>` and `<br>`)
/// pass through untouched; every other tag and all text is escaped. Text
/// that is already entity-escaped is not escaped twice.
pub fn sanitize_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for tag in TAG_REGEX.find_iter(value) {
        out.push_str(&escape_text(&value[last..tag.start()]));
        if ALLOWED_TAG_REGEX.is_match(tag.as_str()) {
            out.push_str(tag.as_str());
        } else {
            out.push_str(&escape_html(tag.as_str()));
        }
        last = tag.end();
    }
    out.push_str(&escape_text(&value[last..]));
    out
}

fn escape_text(text: &str) -> String {
    escape_html(&decode_entities(text))
}

/// Character formatting attached to a run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

/// A formatting run starting at `start_index` (UTF-16 code units)
///
/// The run extends to the start of the next run or to the end of the text.
/// The vendor omits `startIndex` for a run starting at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormatRun {
    #[serde(default)]
    pub start_index: usize,
    #[serde(default)]
    pub format: TextFormat,
}

/// Malformed formatting runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run starts at {offset} but the text is only {len} units long")]
    OutOfRange { offset: usize, len: usize },

    #[error("run at {offset} does not start after the previous run at {previous}")]
    OutOfOrder { previous: usize, offset: usize },
}

/// Convert a cell's text and its formatting runs into inline markup
///
/// Runs must have strictly increasing start offsets that lie within the
/// text. Text before the first run is emitted without formatting. Text is
/// HTML-escaped, so a literal `<` cannot merge with the generated tags.
///
/// # Examples
/// ```
/// use inquiry::markup::{TextFormat, TextFormatRun, runs_to_markup};
///
/// let runs = vec![
///     TextFormatRun {
///         start_index: 0,
///         format: TextFormat { bold: true, ..TextFormat::default() },
///     },
///     TextFormatRun { start_index: 4, format: TextFormat::default() },
/// ];
/// assert_eq!(runs_to_markup("Acme ERP", &runs).unwrap(), "<strong>Acme</strong> ERP");
/// ```
pub fn runs_to_markup(text: &str, runs: &[TextFormatRun]) -> Result<String, RunError> {
    if runs.is_empty() {
        return Ok(text.to_string());
    }

    let units: Vec<u16> = text.encode_utf16().collect();
    let len = units.len();

    let mut previous: Option<usize> = None;
    for run in runs {
        if run.start_index > len {
            return Err(RunError::OutOfRange {
                offset: run.start_index,
                len,
            });
        }
        if let Some(prev) = previous {
            if run.start_index <= prev {
                return Err(RunError::OutOfOrder {
                    previous: prev,
                    offset: run.start_index,
                });
            }
        }
        previous = Some(run.start_index);
    }

    let mut out = String::new();
    out.push_str(&escape_html(&String::from_utf16_lossy(
        &units[..runs[0].start_index],
    )));

    for (i, run) in runs.iter().enumerate() {
        let end = runs.get(i + 1).map_or(len, |next| next.start_index);
        let slice = String::from_utf16_lossy(&units[run.start_index..end]);
        if slice.is_empty() {
            continue;
        }
        out.push_str(&wrap(&escape_html(&slice), &run.format));
    }

    Ok(out)
}

/// Like [`runs_to_markup`], but falls back to the plain text on bad runs
pub fn render_rich_cell(text: &str, runs: &[TextFormatRun]) -> String {
    match runs_to_markup(text, runs) {
        Ok(markup) => markup,
        Err(e) => {
            log::warn!("ignoring malformed formatting runs: {}", e);
            text.to_string()
        }
    }
}

fn wrap(slice: &str, format: &TextFormat) -> String {
    let mut s = slice.to_string();
    if format.underline {
        s = format!("<u>{}</u>", s);
    }
    if format.italic {
        s = format!("<em>{}</em>", s);
    }
    if format.bold {
        s = format!("<strong>{}</strong>", s);
    }
    s
}
