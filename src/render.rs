use lazy_static::lazy_static;
use regex::Regex;

use crate::markup::{escape_html, sanitize_markup};
use crate::record::{EditableField, Record};

lazy_static! {
    static ref LINK_SEPARATOR: Regex = Regex::new(r"[\n,]+").unwrap();
}

/// Columns shown in the detail view, in display order
pub const FIELD_ORDER: [&str; 11] = [
    "System Name",
    "Type of software",
    "Pre-approved?",
    "Pricing",
    "Next Steps",
    "Notes",
    "API Docs",
    "Approved Scopes",
    "Approval Date",
    "Research Doc",
    "Website/Useful links",
];

/// Column used for the research link when "Research Doc" is empty
pub const RESEARCH_FALLBACK_FIELD: &str = "Information";

const AFFIRMATIVE_MARK: &str = "✓";

/// What one detail card shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardBody {
    /// Multi-line input pre-filled with the stripped value
    Editable { field: EditableField, text: String },

    /// Pre-approval state; `text` is title-cased, `None` when empty
    PreApproval {
        affirmative: bool,
        text: Option<String>,
    },

    /// Button opening a research document, `None` when there is no URL
    DocumentLink { url: Option<String> },

    /// One link per entry; empty renders a dash
    LinkList(Vec<String>),

    /// Upper-cased YES/NO shown large and centred
    Badge(String),

    /// Markup-bearing value shown as pre-wrapped block; `None` when empty
    Rich(Option<String>),
}

/// A field title and the body chosen for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub field: String,
    pub body: CardBody,
}

/// Rendered detail view of one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detail {
    pub id: String,
    pub cards: Vec<Card>,
    /// `Sheet: <tab>  |  ID: <id>`, omitted when both are empty
    pub meta: Option<String>,
}

type Strategy = fn(&Record, &str) -> CardBody;

/// Field-specific presentations; anything not listed uses [`default_card`]
const FIELD_STRATEGIES: &[(&str, Strategy)] = &[
    ("Approved Scopes", editable_card),
    ("Pre-approved?", pre_approval_card),
    ("Research Doc", document_link_card),
    ("Website/Useful links", link_list_card),
];

/// Build the detail view of `record` for the given fields
///
/// # Examples
/// ```
/// use inquiry::record::{Record, SystemId};
/// use inquiry::render::{CardBody, FIELD_ORDER, render_detail};
///
/// let mut record = Record::new(&SystemId::new("ERP", 5));
/// record.set("Pre-approved?", "YES");
/// let detail = render_detail(&record, &FIELD_ORDER);
///
/// assert_eq!(detail.cards.len(), FIELD_ORDER.len());
/// assert_eq!(
///     detail.cards[2].body,
///     CardBody::PreApproval { affirmative: true, text: Some("Yes".to_string()) }
/// );
/// ```
pub fn render_detail(record: &Record, field_order: &[&str]) -> Detail {
    let cards = field_order
        .iter()
        .map(|&field| Card {
            field: field.to_string(),
            body: strategy_for(field)(record, field),
        })
        .collect();

    Detail {
        id: record.id.clone(),
        cards,
        meta: meta_line(record),
    }
}

fn strategy_for(field: &str) -> Strategy {
    FIELD_STRATEGIES
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(default_card as Strategy, |(_, strategy)| *strategy)
}

fn editable_card(record: &Record, field: &str) -> CardBody {
    CardBody::Editable {
        field: EditableField::Scope,
        text: record.plain(field),
    }
}

fn pre_approval_card(record: &Record, field: &str) -> CardBody {
    let plain = record.plain(field);
    CardBody::PreApproval {
        affirmative: plain.to_lowercase() == "yes",
        text: (!plain.is_empty()).then(|| title_case(&plain)),
    }
}

fn document_link_card(record: &Record, field: &str) -> CardBody {
    let mut candidate = record.plain(field);
    if candidate.is_empty() {
        candidate = record.plain(RESEARCH_FALLBACK_FIELD);
    }
    CardBody::DocumentLink {
        url: is_web_url(&candidate).then_some(candidate),
    }
}

fn link_list_card(record: &Record, field: &str) -> CardBody {
    CardBody::LinkList(split_links(&record.plain(field)))
}

fn default_card(record: &Record, field: &str) -> CardBody {
    let plain = record.plain(field).to_lowercase();
    if plain == "yes" || plain == "no" {
        return CardBody::Badge(plain.to_uppercase());
    }
    let value = record.get(field).trim();
    CardBody::Rich((!value.is_empty()).then(|| value.to_string()))
}

/// First character upper-cased, the rest lower-cased
pub fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Split a links cell on runs of newlines or commas
///
/// # Examples
/// ```
/// use inquiry::render::split_links;
///
/// assert_eq!(
///     split_links("https://a.example,\n\n https://b.example ,"),
///     vec!["https://a.example", "https://b.example"]
/// );
/// assert!(split_links("").is_empty());
/// ```
pub fn split_links(text: &str) -> Vec<String> {
    LINK_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_web_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

fn meta_line(record: &Record) -> Option<String> {
    if record.sheet.is_empty() && record.id.is_empty() {
        return None;
    }
    let mut line = String::new();
    if !record.sheet.is_empty() {
        line.push_str(&format!("Sheet: {}", record.sheet));
    }
    if !record.id.is_empty() {
        line.push_str(&format!("  |  ID: {}", record.id));
    }
    Some(line)
}

impl Detail {
    /// Render as an HTML fragment; the save form posts to `save_action`
    pub fn to_html(&self, save_action: &str) -> String {
        let mut html = format!(
            "<div class=\"details\" id=\"system-{}\">\n",
            escape_html(&self.id)
        );
        for card in &self.cards {
            html.push_str(&card.to_html(save_action));
        }
        if let Some(meta) = &self.meta {
            html.push_str(&format!("<div class=\"meta\">{}</div>\n", escape_html(meta)));
        }
        html.push_str("</div>\n");
        html
    }
}

impl Card {
    pub fn to_html(&self, save_action: &str) -> String {
        let body = match &self.body {
            CardBody::Editable { field, text } => format!(
                "<form method=\"post\" action=\"{action}\">\
                 <textarea name=\"{key}\" placeholder=\"Add scope notes here...\">{text}</textarea>\
                 <button type=\"submit\">Save scopes</button></form>",
                action = escape_html(save_action),
                key = field.body_key(),
                text = escape_html(text),
            ),
            CardBody::PreApproval { affirmative, text } => {
                let mark = if *affirmative {
                    format!("<span class=\"check\">{}</span>", AFFIRMATIVE_MARK)
                } else {
                    String::new()
                };
                let text = match text {
                    Some(text) => format!("<span>{}</span>", escape_html(text)),
                    None => "<span class=\"empty\">-</span>".to_string(),
                };
                format!("<div class=\"approval\">{}{}</div>", mark, text)
            }
            CardBody::DocumentLink { url: Some(url) } => format!(
                "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Open Research Doc</a>",
                escape_html(url)
            ),
            CardBody::DocumentLink { url: None } => dash(),
            CardBody::LinkList(links) if links.is_empty() => dash(),
            CardBody::LinkList(links) => {
                let items: String = links.iter().map(|link| link_html(link)).collect();
                format!("<div class=\"links\">{}</div>", items)
            }
            CardBody::Badge(text) => format!("<div class=\"badge\">{}</div>", escape_html(text)),
            CardBody::Rich(Some(value)) => {
                format!("<div class=\"rich\">{}</div>", sanitize_markup(value))
            }
            CardBody::Rich(None) => "<div class=\"rich\">-</div>".to_string(),
        };

        format!(
            "<div class=\"card\"><div class=\"title\">{}</div>{}</div>\n",
            escape_html(&self.field),
            body
        )
    }
}

fn dash() -> String {
    "<div class=\"empty\">-</div>".to_string()
}

fn link_html(link: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        escape_html(&link_href(link)),
        escape_html(link)
    )
}

/// Target of a link-list piece; anything without a web scheme is taken as a
/// bare host and gets `https://`
pub fn link_href(link: &str) -> String {
    if is_web_url(link) {
        link.to_string()
    } else {
        format!("https://{}", link)
    }
}
