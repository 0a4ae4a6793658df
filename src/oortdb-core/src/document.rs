use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Characters allowed in a document key.
fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '-' | ':' | '.' | '@' | '(' | ')' | '+' | ',' | '=' | ';' | '$' | '!' | '*'
                | '\'' | '%'
        )
}

/// Checks whether a value is a valid document key.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

/// Checks whether a value is a valid document id in `collection/key` form.
pub fn is_valid_id(id: &str) -> bool {
    DocumentId::parse(id).is_ok()
}

/// Checks whether a value is a valid document revision.
pub fn is_valid_rev(rev: &str) -> bool {
    !rev.is_empty()
}

/// A parsed document id: the `collection/key` pair addressing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId {
    collection: String,
    key: String,
}

impl DocumentId {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let key = key.into();

        if collection.is_empty() {
            return Err(Error::InvalidFormat {
                what: "collection name",
                value: collection,
            });
        }
        if !is_valid_key(&key) {
            return Err(Error::InvalidFormat {
                what: "key",
                value: key,
            });
        }

        Ok(Self { collection, key })
    }

    /// Parses the `collection/key` wire form.
    pub fn parse(id: &str) -> Result<Self> {
        match id.split_once('/') {
            Some((collection, key)) if !collection.is_empty() && is_valid_key(key) => {
                Ok(Self {
                    collection: collection.to_string(),
                    key: key.to_string(),
                })
            }
            _ => Err(Error::InvalidFormat {
                what: "id",
                value: id.to_string(),
            }),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Document is a schemaless JSON object with typed access to the system
/// fields `_id`, `_key`, `_rev`, `_from` and `_to`.
///
/// Reads return `Ok(None)` when the field is missing and a recoverable
/// error when it is present but malformed; writes validate before storing.
/// Everything else about the payload is reachable through `Deref` to the
/// underlying map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Result<Option<&str>> {
        self.system_field("_id", is_valid_id)
    }

    pub fn has_id(&self) -> bool {
        matches!(self.id(), Ok(Some(_)))
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> Result<()> {
        self.set_system_field("_id", id.into(), is_valid_id)
    }

    pub fn key(&self) -> Result<Option<&str>> {
        self.system_field("_key", is_valid_key)
    }

    pub fn has_key(&self) -> bool {
        matches!(self.key(), Ok(Some(_)))
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> Result<()> {
        self.set_system_field("_key", key.into(), is_valid_key)
    }

    pub fn rev(&self) -> Result<Option<&str>> {
        self.system_field("_rev", is_valid_rev)
    }

    pub fn set_rev(&mut self, rev: impl Into<String>) -> Result<()> {
        self.set_system_field("_rev", rev.into(), is_valid_rev)
    }

    /// Source vertex of an edge document; holds a document id.
    pub fn from_ref(&self) -> Result<Option<&str>> {
        self.system_field("_from", is_valid_id)
    }

    pub fn set_from(&mut self, id: impl Into<String>) -> Result<()> {
        self.set_system_field("_from", id.into(), is_valid_id)
    }

    /// Target vertex of an edge document; holds a document id.
    pub fn to_ref(&self) -> Result<Option<&str>> {
        self.system_field("_to", is_valid_id)
    }

    pub fn set_to(&mut self, id: impl Into<String>) -> Result<()> {
        self.set_system_field("_to", id.into(), is_valid_id)
    }

    fn system_field(&self, field: &'static str, valid: fn(&str) -> bool) -> Result<Option<&str>> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::String(text)) if valid(text) => Ok(Some(text.as_str())),
            Some(Value::String(text)) => Err(Error::InvalidFormat {
                what: field,
                value: text.clone(),
            }),
            Some(other) => Err(Error::InvalidFormat {
                what: field,
                value: other.to_string(),
            }),
        }
    }

    fn set_system_field(
        &mut self,
        field: &'static str,
        value: String,
        valid: fn(&str) -> bool,
    ) -> Result<()> {
        if !valid(&value) {
            return Err(Error::InvalidFormat {
                what: field,
                value,
            });
        }
        self.fields.insert(field.to_string(), Value::String(value));
        Ok(())
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Deref for Document {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_charset() {
        assert!(is_valid_key("simple"));
        assert!(is_valid_key("k-e_y:.@()+,=;$!*'%42"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key("col/key"));
        assert!(!is_valid_key("naïve"));
    }

    #[test]
    fn test_id_requires_both_halves() {
        assert!(is_valid_id("articles/first"));
        assert!(!is_valid_id("articles"));
        assert!(!is_valid_id("/first"));
        assert!(!is_valid_id("articles/"));
        assert!(!is_valid_id("articles/a/b"));
    }

    #[test]
    fn test_document_id_parses_and_formats() {
        let id = DocumentId::parse("articles/first").unwrap();
        assert_eq!(id.collection(), "articles");
        assert_eq!(id.key(), "first");
        assert_eq!(id.to_string(), "articles/first");

        let built = DocumentId::new("articles", "first").unwrap();
        assert_eq!(built, id);
        assert!(DocumentId::new("", "first").is_err());
        assert!("articles/bad key".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_missing_system_fields_read_as_none() {
        let document = Document::new();

        assert_eq!(document.id().unwrap(), None);
        assert_eq!(document.key().unwrap(), None);
        assert_eq!(document.rev().unwrap(), None);
        assert!(!document.has_id());
        assert!(!document.has_key());
    }

    #[test]
    fn test_malformed_system_fields_read_as_recoverable_errors() {
        let mut document = Document::new();
        document.insert("_id".to_string(), json!("missing-slash"));
        document.insert("_key".to_string(), json!(17));

        assert!(matches!(document.id(), Err(Error::InvalidFormat { what: "_id", .. })));
        assert!(matches!(document.key(), Err(Error::InvalidFormat { what: "_key", .. })));
        assert!(!document.has_id());
    }

    #[test]
    fn test_writes_validate_before_storing() {
        let mut document = Document::new();

        document.set_id("articles/first").unwrap();
        document.set_key("first").unwrap();
        document.set_rev("12345").unwrap();
        document.set_from("articles/first").unwrap();
        document.set_to("articles/second").unwrap();

        assert_eq!(document.id().unwrap(), Some("articles/first"));
        assert_eq!(document.from_ref().unwrap(), Some("articles/first"));
        assert_eq!(document.to_ref().unwrap(), Some("articles/second"));

        assert!(document.set_id("no-slash").is_err());
        assert!(document.set_key("bad key").is_err());
        assert!(document.set_rev("").is_err());
        // the failed writes left the previous values in place
        assert_eq!(document.id().unwrap(), Some("articles/first"));
        assert_eq!(document.key().unwrap(), Some("first"));
    }

    #[test]
    fn test_document_serializes_transparently() {
        let mut document = Document::new();
        document.set_key("first").unwrap();
        document.insert("title".to_string(), json!("Oort cloud"));

        let text = serde_json::to_string(&document).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();

        assert_eq!(back, document);
        assert_eq!(back.get("title"), Some(&json!("Oort cloud")));
    }
}
