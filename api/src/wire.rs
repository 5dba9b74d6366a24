/// Wire helpers for the pitchside REST API: identifier decoding, reference
/// shapes, and request/response bodies that don't map 1:1 to domain types.
use crate::Stadium;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifiers arrive as strings from document stores and as integers from
/// auto-increment backends.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(RawId::into_string).filter(|s| !s.is_empty()))
}

/// A match's stadium as the API sends it: populated record or bare id.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StadiumRef {
    Populated(Box<Stadium>),
    Id(RawId),
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BookRequest<'a> {
    pub time: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest<'a> {
    pub player_name: &'a str,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub title: String,
    pub stadium_id: String,
    pub date: String,
    pub time: String,
    pub fee: u32,
    pub max_players: u32,
    pub players: Vec<String>,
    pub rules: Vec<String>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// `POST /stadiums/{id}/book` answers with the updated stadium, either bare
/// or wrapped as `{ "stadium": ..., "message": ... }`.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum BookResponse {
    Wrapped {
        stadium: Box<Stadium>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(Box<Stadium>),
}

impl BookResponse {
    pub fn message(&self) -> Option<&str> {
        match self {
            BookResponse::Wrapped { message, .. } => message.as_deref(),
            BookResponse::Bare(_) => None,
        }
    }

    pub fn into_stadium(self) -> Stadium {
        match self {
            BookResponse::Wrapped { stadium, .. } | BookResponse::Bare(stadium) => *stadium,
        }
    }
}

/// Server-supplied failure body. Backends disagree on the field name.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_decode() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "optional_id")]
            id: Option<String>,
        }
        let n: Probe = serde_json::from_str(r#"{"id":42}"#).unwrap();
        let t: Probe = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        let missing: Probe = serde_json::from_str("{}").unwrap();
        let null: Probe = serde_json::from_str(r#"{"id":null}"#).unwrap();
        assert_eq!(n.id.as_deref(), Some("42"));
        assert_eq!(t.id.as_deref(), Some("abc"));
        assert!(missing.id.is_none());
        assert!(null.id.is_none());
    }

    #[test]
    fn book_response_accepts_both_shapes() {
        let wrapped: BookResponse =
            serde_json::from_str(r#"{"stadium":{"id":1,"name":"North"},"message":"ok"}"#).unwrap();
        let bare: BookResponse = serde_json::from_str(r#"{"id":1,"name":"North"}"#).unwrap();
        assert_eq!(wrapped.into_stadium().name, "North");
        assert_eq!(bare.into_stadium().name, "North");
    }

    #[test]
    fn error_body_prefers_error_field() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Match is full","message":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Match is full"));
        let blank: ErrorBody = serde_json::from_str(r#"{"message":"  "}"#).unwrap();
        assert!(blank.into_message().is_none());
    }

    #[test]
    fn join_request_uses_camel_case() {
        let body = serde_json::to_value(JoinRequest { player_name: "Ana" }).unwrap();
        assert_eq!(body, serde_json::json!({ "playerName": "Ana" }));
    }
}
