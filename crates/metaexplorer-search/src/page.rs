//! Full page rendering
//!
//! Wraps a [`PageState`] in the page shell: title bar, version navigation,
//! search box and results container. Published pages load the version
//! snapshot and [`client_script`], which searches the snapshot in the browser.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::index::{IndexKey, SearchOptions};
use crate::render::{escape_html, Renderer};
use crate::session::PageState;

const TEMPLATE: &str = include_str!("templates/page.html");
const CLIENT_TEMPLATE: &str = include_str!("templates/main.js");

/// File name of the browser client next to the pages.
pub const CLIENT_SCRIPT_NAME: &str = "main.js";

/// Display format of the refresh time before the browser localizes it.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Stylesheet referenced by every page as `main.css`.
pub const STYLESHEET: &str = include_str!("templates/main.css");

/// File name of the stylesheet next to the pages.
pub const STYLESHEET_NAME: &str = "main.css";

/// Page-level values that do not come from the session.
#[derive(Debug, Clone, Default)]
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Version shown by this page; its link is marked active
    pub version: &'a str,
    /// When the snapshot was last refreshed, if known
    pub last_updated: Option<DateTime<Utc>>,
    /// Location the schema document was read from
    pub source: Option<&'a str>,
}

/// Artifact name of a version's snapshot.
pub fn snapshot_name(version: &str) -> String {
    format!("{}.js", version)
}

/// Render the complete HTML page.
pub fn render_page(context: &PageContext<'_>, page: &PageState) -> String {
    let links: String = page
        .version_links
        .iter()
        .map(|link| {
            let active = if link.version == context.version {
                " active"
            } else {
                ""
            };
            format!(
                "<li class=\"nav-item\"><a class=\"nav-link{}\" href=\"{}\">{}</a></li>\n",
                active,
                escape_html(&link.href),
                escape_html(&link.version)
            )
        })
        .collect();
    let last_updated = context
        .last_updated
        .map(|t| {
            format!(
                "Last Updated <time datetime=\"{}\">{}</time>",
                t.to_rfc3339_opts(SecondsFormat::Secs, true),
                t.format(TIMESTAMP_FORMAT)
            )
        })
        .unwrap_or_default();
    let source = context
        .source
        .map(|s| {
            let s = escape_html(s);
            format!("Schema: <a href=\"{}\">{}</a>", s, s)
        })
        .unwrap_or_default();

    fill(TEMPLATE, |key| match key {
        "title" => Some(escape_html(context.title)),
        "version" => Some(escape_html(context.version)),
        "version_links" => Some(links.trim_end().to_string()),
        "last_updated" => Some(last_updated.clone()),
        "source" => Some(source.clone()),
        "snapshot" => Some(escape_html(&snapshot_name(context.version))),
        "client" => Some(CLIENT_SCRIPT_NAME.to_string()),
        "search_text" => Some(escape_html(&page.search_text)),
        "results" => Some(page.results.trim_end().to_string()),
        _ => None,
    })
}

/// Fuse.js options equivalent to `options`.
pub fn client_options(options: &SearchOptions) -> Value {
    let keys: Vec<Value> = IndexKey::ALL
        .iter()
        .map(|&key| json!({ "name": key.as_str(), "weight": options.weights.get(key) }))
        .collect();
    json!({
        "includeMatches": true,
        "findAllMatches": true,
        "ignoreLocation": true,
        "minMatchCharLength": options.min_match_char_length,
        "threshold": options.threshold,
        "keys": keys,
    })
}

/// Browser client that searches and renders the page's snapshot the same
/// way [`Renderer`] and the search index do.
pub fn client_script(options: &SearchOptions, renderer: &Renderer) -> String {
    let options = client_options(options).to_string();
    let prefix = Value::from(renderer.primitive_prefix()).to_string();
    fill(CLIENT_TEMPLATE, |key| match key {
        "options" => Some(options.clone()),
        "primitive_prefix" => Some(prefix.clone()),
        _ => None,
    })
}

/// Substitute `{{key}}` placeholders in one pass; unknown keys are kept.
fn fill(template: &str, mut value: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let key = &after[..close];
                match value(key) {
                    Some(v) => out.push_str(&v),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
