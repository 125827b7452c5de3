//! Provider-agnostic metadata records.
//!
//! This is the JSON shape Audiobookshelf expects from a custom metadata
//! provider. Optional fields are omitted when empty, never serialized as null.

use serde::{Deserialize, Serialize};

/// One normalized book/work match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    pub title: String,

    pub author: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub narrator: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    /// Four-digit release year.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub published_year: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Absolute cover image URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cover: String,

    /// External identifier slot; DLsite works carry their RJ code here.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub isbn: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asin: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,

    #[serde(default)]
    pub explicit: bool,
}

/// Top-level search response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub matches: Vec<BookMetadata>,
}

impl MetadataResponse {
    pub fn new(matches: Vec<BookMetadata>) -> Self {
        Self { matches }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let record = BookMetadata { title: "Title".into(), author: "Circle".into(), ..Default::default() };
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["title"], "Title");
        assert_eq!(obj["author"], "Circle");
        assert_eq!(obj["explicit"], false);
        assert!(!obj.contains_key("narrator"));
        assert!(!obj.contains_key("genres"));
    }

    #[test]
    fn test_camel_case_field_names() {
        let record = BookMetadata {
            title: "T".into(),
            author: "A".into(),
            published_year: "2023".into(),
            tags: vec!["ASMR".into()],
            explicit: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""publishedYear":"2023""#));
        assert!(json.contains(r#""tags":["ASMR"]"#));
        assert!(json.contains(r#""explicit":true"#));
    }

    #[test]
    fn test_response_shape() {
        let response = MetadataResponse::default();
        assert!(response.is_empty());
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"matches":[]}"#);
    }
}
