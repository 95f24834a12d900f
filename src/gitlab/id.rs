//! Project and group identifiers
//!
//! GitLab accepts either a numeric ID or the full path (`group/sub/project`)
//! wherever `:id` appears in an endpoint. Paths must be percent-encoded as a
//! single segment.

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::links::parse_project_url;

/// A project or group reference: numeric ID or namespace path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteId {
    Numeric(u64),
    Path(String),
}

impl RemoteId {
    /// The value to splice into an API path
    pub fn segment(&self) -> String {
        match self {
            RemoteId::Numeric(id) => id.to_string(),
            RemoteId::Path(path) => encode_segment(path),
        }
    }
}

/// Percent-encode one path segment; `/` included.
pub fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

impl FromStr for RemoteId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("project/group identifier must not be empty".to_string());
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = trimmed.parse()
        {
            return Ok(RemoteId::Numeric(id));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return parse_project_url(trimmed)
                .map(RemoteId::Path)
                .ok_or_else(|| format!("could not find a project path in URL: {}", trimmed));
        }

        Ok(RemoteId::Path(trimmed.trim_matches('/').to_string()))
    }
}

impl From<u64> for RemoteId {
    fn from(id: u64) -> Self {
        RemoteId::Numeric(id)
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Numeric(id) => write!(f, "{}", id),
            RemoteId::Path(path) => f.write_str(path),
        }
    }
}

impl Serialize for RemoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RemoteId::Numeric(id) => serializer.serialize_u64(*id),
            RemoteId::Path(path) => serializer.serialize_str(path),
        }
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(RemoteId::Numeric(id)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl JsonSchema for RemoteId {
    fn schema_name() -> Cow<'static, str> {
        "RemoteId".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "Numeric ID or full path (e.g. \"group/project\"); a web URL is also accepted",
            "oneOf": [
                { "type": "integer", "minimum": 0 },
                { "type": "string", "minLength": 1 }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_forms() {
        let from_number: RemoteId = serde_json::from_value(json!(42)).unwrap();
        let from_string: RemoteId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_number, RemoteId::Numeric(42));
        assert_eq!(from_string, RemoteId::Numeric(42));
        assert_eq!(from_number.segment(), "42");
    }

    #[test]
    fn test_path_encoded_as_one_segment() {
        let id: RemoteId = serde_json::from_value(json!("group/sub group/api")).unwrap();
        assert_eq!(id.segment(), "group%2Fsub%20group%2Fapi");
        assert_eq!(id.to_string(), "group/sub group/api");
    }

    #[test]
    fn test_web_url_reduced_to_path() {
        let id: RemoteId = "https://gitlab.com/acme/api/-/merge_requests/3".parse().unwrap();
        assert_eq!(id, RemoteId::Path("acme/api".to_string()));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(serde_json::from_value::<RemoteId>(json!("  ")).is_err());
        assert!(serde_json::from_value::<RemoteId>(json!(true)).is_err());
    }

    #[test]
    fn test_serialize_round_trips_shape() {
        assert_eq!(serde_json::to_value(RemoteId::Numeric(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(RemoteId::Path("a/b".into())).unwrap(),
            json!("a/b")
        );
    }
}
