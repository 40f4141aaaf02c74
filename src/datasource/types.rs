//! Datasource entries and the three payload shapes they can hold.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// A CSV row: column name to cell text, in header order.
pub type TextRecord = IndexMap<String, String>;

/// A JSON object record with arbitrary field values.
pub type JsonRecord = Map<String, Value>;

/// On-disk format, decided by file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Map a file extension (case-insensitive, without the dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Format of a path, or `None` when the extension is missing or unrecognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => f.write_str("csv"),
            Format::Json => f.write_str("json"),
        }
    }
}

/// Structural category of a decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    RecordList,
    TaggedRecordList,
    Object,
}

/// Decoded file contents.
///
/// Serialises to the same JSON the file would produce when read directly:
/// a list of objects or a single object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// CSV rows; every value is text.
    RecordList(Vec<TextRecord>),
    /// Top-level JSON array of objects.
    TaggedRecordList(Vec<JsonRecord>),
    /// Top-level JSON object, possibly holding record lists in its fields.
    Object(JsonRecord),
}

impl Payload {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Payload::RecordList(_) => ShapeKind::RecordList,
            Payload::TaggedRecordList(_) => ShapeKind::TaggedRecordList,
            Payload::Object(_) => ShapeKind::Object,
        }
    }

    /// Number of top-level items: rows for lists, fields for objects.
    pub fn len(&self) -> usize {
        match self {
            Payload::RecordList(rows) => rows.len(),
            Payload::TaggedRecordList(rows) => rows.len(),
            Payload::Object(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single record borrowed out of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordRef<'a> {
    Text(&'a TextRecord),
    Json(&'a JsonRecord),
}

impl RecordRef<'_> {
    pub fn into_owned(self) -> Record {
        match self {
            RecordRef::Text(r) => Record::Text(r.clone()),
            RecordRef::Json(r) => Record::Json(r.clone()),
        }
    }
}

/// An owned copy of a single record, detached from the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Text(TextRecord),
    Json(JsonRecord),
}

impl Record {
    /// Field value rendered as text, if present.
    pub fn field(&self, name: &str) -> Option<String> {
        match self {
            Record::Text(r) => r.get(name).cloned(),
            Record::Json(r) => r.get(name).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

/// One loaded file: identity, format, derived public name and payload.
///
/// Never mutated after load; a reload builds a new entry and swaps it in.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasource {
    identity: PathBuf,
    format: Format,
    public_name: String,
    payload: Payload,
}

impl Datasource {
    pub fn new(identity: PathBuf, format: Format, payload: Payload) -> Self {
        let public_name = public_name(&identity);
        Self {
            identity,
            format,
            public_name,
            payload,
        }
    }

    pub fn identity(&self) -> &Path {
        &self.identity
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn public_name(&self) -> &str {
        &self.public_name
    }

    pub fn shape(&self) -> ShapeKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Derive the endpoint name for a file.
///
/// Base name with the extension stripped, lower-cased, with spaces and
/// underscores turned into hyphens.
pub fn public_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    stem.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}
