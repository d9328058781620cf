//! Page content file format.
//!
//! A content file is an optional YAML frontmatter block followed by the raw
//! body:
//!
//! ```text
//! ---
//! title: Hello
//! taxonomy:
//!   tag: [news]
//! ---
//! Body text.
//! ```
//!
//! Files without a leading `---` line have an empty header and the whole text
//! as body.

use serde_json::{Map, Value};

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// Page header: string keys to arbitrary structured values, in file order.
pub type Header = Map<String, Value>;

/// Decoded content file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Frontmatter mapping.
    pub header: Header,
    /// Raw body text.
    pub content: String,
}

/// Malformed content file.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Frontmatter opened with `---` but never closed.
    #[error("Frontmatter block is not terminated")]
    Unterminated,
    /// Frontmatter is not valid YAML.
    #[error("Invalid YAML in frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Frontmatter is valid YAML but not a mapping.
    #[error("YAML document must be a mapping")]
    NotAMapping,
}

/// Split a content file into header and body.
///
/// # Errors
///
/// Returns [`FormatError`] if a frontmatter block is present but unterminated,
/// not valid YAML, or not a mapping.
pub fn decode(text: &str) -> Result<Document, FormatError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_opening_delimiter(text) else {
        return Ok(Document {
            header: Header::new(),
            content: text.to_owned(),
        });
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Ok(Document {
                header: parse_header(&rest[..offset])?,
                content: rest[offset + line.len()..].to_owned(),
            });
        }
        offset += line.len();
    }

    Err(FormatError::Unterminated)
}

/// Join header and body into a content file.
///
/// An empty header produces the body alone, unless the body itself would
/// read back as frontmatter; it then gets an empty `---` block. Header keys
/// keep their order.
///
/// # Errors
///
/// Returns [`FormatError::Yaml`] if the header cannot be serialized.
pub fn encode(document: &Document) -> Result<String, FormatError> {
    if document.header.is_empty() {
        let content = &document.content;
        if content.starts_with('\u{feff}') || strip_opening_delimiter(content).is_some() {
            return Ok(format!("{DELIMITER}\n{DELIMITER}\n{content}"));
        }
        return Ok(content.clone());
    }

    let yaml = serde_yaml::to_string(&document.header)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", document.content))
}

/// Parse YAML text into a header mapping.
///
/// Empty or null YAML yields an empty header.
///
/// # Errors
///
/// Returns [`FormatError`] if the YAML is invalid or not a mapping.
pub fn parse_header(yaml: &str) -> Result<Header, FormatError> {
    if yaml.trim().is_empty() {
        return Ok(Header::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Header::new()),
        _ => Err(FormatError::NotAMapping),
    }
}

fn strip_opening_delimiter(text: &str) -> Option<&str> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    (first.trim_end_matches('\r') == DELIMITER).then_some(rest)
}
