//! Page records and request payloads.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_storage::{Document, Header, PageNode, format, route};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Record, SiteError};

/// Request body for page creation and updates.
///
/// Every field is optional at the type level; the service decides which are
/// required.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageInput {
    pub route: Option<String>,
    pub template: Option<String>,
    /// Structured header, or a YAML/JSON string holding one.
    pub header: Option<Value>,
    pub content: Option<String>,
}

impl PageInput {
    /// Non-empty route field.
    pub(crate) fn route(&self) -> Result<&str, SiteError> {
        non_empty(self.route.as_deref()).ok_or_else(|| {
            SiteError::Validation("You must provide a `route` field".to_owned())
        })
    }

    pub(crate) fn template(&self) -> Option<&str> {
        non_empty(self.template.as_deref())
    }

    pub(crate) fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    /// Parsed header, `None` when absent or empty.
    pub(crate) fn header(&self) -> Result<Option<Header>, SiteError> {
        let invalid = || SiteError::Validation("Field `header` must be valid structured data".to_owned());

        let header = match &self.header {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Array(items)) if items.is_empty() => return Ok(None),
            Some(Value::String(text)) => format::parse_header(text).map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
        };
        Ok(Some(header).filter(|h| !h.is_empty()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Page as returned by the API. Field order is the output key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord<'a> {
    /// Route with a leading slash (`""` for the root).
    route: String,
    slug: &'a str,
    /// Header `title`, or the slug in title case.
    title: String,
    /// `None` for directory-only nodes.
    template: Option<&'a str>,
    modular: bool,
    visible: bool,
    /// Directory relative to the pages root.
    path: String,
    last_modified: Option<String>,
    header: &'a Header,
    content: &'a str,
    children: Vec<String>,
}

/// Build the JSON record for a node.
pub(crate) fn page_record(
    node: &PageNode,
    document: &Document,
    mtime: f64,
) -> Result<Record, SiteError> {
    let title = document
        .header
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| titlecase_from_slug(node.slug()), str::to_owned);

    let record = PageRecord {
        route: route::to_url(&node.route),
        slug: node.slug(),
        title,
        template: node.template(),
        modular: node.modular,
        visible: node.visible,
        path: node.dir.to_string_lossy().into_owned(),
        last_modified: format_mtime(mtime),
        header: &document.header,
        content: &document.content,
        children: node.children.iter().map(|c| route::to_url(&c.route)).collect(),
    };

    serde_json::to_value(record)
        .and_then(serde_json::from_value)
        .map_err(|e| SiteError::malformed(route::to_url(&node.route), e))
}

/// Render seconds since Unix epoch as RFC 3339.
#[allow(clippy::cast_possible_truncation)]
fn format_mtime(mtime: f64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis((mtime * 1000.0) as i64)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// The root slug (`""`) becomes "Home".
///
/// # Examples
///
/// ```ignore
/// assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
/// assert_eq!(titlecase_from_slug("_hero"), "Hero");
/// ```
pub(crate) fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        result.push_str("Home");
    }
    result
}
