//! Server-rendered browser front end: search list, detail cards, scope form.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::catalog::Catalog;
use crate::markup::escape_html;
use crate::record::{EditableField, Record};
use crate::render::{FIELD_ORDER, render_detail};
use crate::source::TabularSource;

const SAVED_NOTICE: &str = "Approved scopes saved";
const SAVE_FAILED_NOTICE: &str = "Error saving scopes";

type Page = (StatusCode, Html<String>);

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScopeForm {
    #[serde(default)]
    pub scope: String,
}

/// Outcome banner shown above the list
enum Notice {
    Saved,
    Failed(String),
}

/// `GET /ui?q=`
pub async fn list_page<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<SearchQuery>,
) -> Page {
    match load_catalog(&state).await {
        Ok(catalog) => page(StatusCode::OK, &catalog, &query.q, None, None),
        Err(page) => page,
    }
}

/// `GET /ui/systems/:id`
pub async fn detail_page<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Page {
    let catalog = match load_catalog(&state).await {
        Ok(catalog) => catalog,
        Err(page) => return page,
    };

    match catalog.get(&id) {
        Some(record) => page(StatusCode::OK, &catalog, &query.q, Some(record), None),
        None => not_found(&catalog, &id),
    }
}

/// `POST /ui/systems/:id/scope`
///
/// The catalog only takes the new value once the write has been
/// acknowledged; a failed save re-renders the unchanged record.
pub async fn save_scope<S: TabularSource>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Form(form): Form<ScopeForm>,
) -> Page {
    let mut catalog = match load_catalog(&state).await {
        Ok(catalog) => catalog,
        Err(page) => return page,
    };
    if catalog.get(&id).is_none() {
        return not_found(&catalog, &id);
    }

    let field = EditableField::Scope;
    let (status, notice) = match state.update(&id, field, &form.scope).await {
        Ok(()) => {
            catalog.apply_confirmed_write(&id, field.column(), &form.scope);
            log::info!("saved {} for {}", field.column(), id);
            (StatusCode::OK, Notice::Saved)
        }
        Err(e) => {
            log::error!("Error in POST /ui/systems/{}/scope: {}", id, e);
            (e.status(), Notice::Failed(e.to_string()))
        }
    };

    page(status, &catalog, "", catalog.get(&id), Some(notice))
}

async fn load_catalog<S: TabularSource>(state: &AppState<S>) -> Result<Catalog, Page> {
    match state.list_systems().await {
        Ok(records) => Ok(Catalog::new(records)),
        Err(e) => {
            log::error!("Error loading systems for the UI: {}", e);
            let body = format!(
                "<div class=\"notice error\">Failed to load systems: {}</div>",
                escape_html(&e.to_string())
            );
            Err((e.status(), Html(layout("", &body, ""))))
        }
    }
}

fn not_found(catalog: &Catalog, id: &str) -> Page {
    let notice = format!(
        "<div class=\"notice error\">No system with id {}</div>",
        escape_html(id)
    );
    let list = list_html(&catalog.search(""));
    (
        StatusCode::NOT_FOUND,
        Html(layout("", &format!("{}{}", notice, list), "")),
    )
}

fn page(
    status: StatusCode,
    catalog: &Catalog,
    query: &str,
    selected: Option<&Record>,
    notice: Option<Notice>,
) -> Page {
    let mut list = String::new();
    if let Some(notice) = notice {
        list.push_str(&notice_html(&notice));
    }
    list.push_str(&list_html(&catalog.search(query)));

    let details = selected
        .map(|record| {
            let action = format!(
                "/ui/systems/{}/{}",
                urlencoding::encode(&record.id),
                EditableField::Scope.body_key()
            );
            render_detail(record, &FIELD_ORDER).to_html(&action)
        })
        .unwrap_or_default();

    (status, Html(layout(query, &list, &details)))
}

fn notice_html(notice: &Notice) -> String {
    match notice {
        Notice::Saved => format!("<div class=\"notice\">{}</div>", SAVED_NOTICE),
        Notice::Failed(reason) => format!(
            "<div class=\"notice error\">{}: {}</div>",
            SAVE_FAILED_NOTICE,
            escape_html(reason)
        ),
    }
}

fn list_html(records: &[&Record]) -> String {
    if records.is_empty() {
        return "<div class=\"empty-list\">No systems found</div>".to_string();
    }

    let mut html = String::from("<ul class=\"systems\">\n");
    for record in records {
        html.push_str(&format!(
            "<li><a href=\"/ui/systems/{}\">{}</a></li>\n",
            urlencoding::encode(&record.id),
            escape_html(&record.display_name())
        ));
    }
    html.push_str("</ul>\n");
    html
}

fn layout(query: &str, list: &str, details: &str) -> String {
    include_str!("./static/index.html")
        .replace("{{query}}", &escape_html(query))
        .replace("{{list}}", list)
        .replace("{{details}}", details)
}
