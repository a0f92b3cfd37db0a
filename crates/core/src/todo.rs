//! The todo entity and its JSON wire mapping.
//!
//! Request bodies decode into [`TodoFields`] with a fixed set of recognised
//! keys; anything else in the body is ignored. Responses encode [`Todo`] as
//! `{"id","title","completed","createdAt"}` and lists as `{"data":[...]}`.

use chrono::{SecondsFormat, SubsecRound};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::id::TodoId;
use crate::types::Timestamp;

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt", serialize_with = "serialize_millis")]
    pub created_at: Timestamp,
}

impl Todo {
    /// Build a new todo with a freshly minted id and the current time.
    ///
    /// The timestamp is truncated to milliseconds, the precision the
    /// document store keeps, so the created value matches what is read back.
    pub fn new(fields: TodoFields) -> Self {
        Self {
            id: TodoId::generate(),
            title: fields.title,
            completed: fields.completed,
            created_at: chrono::Utc::now().trunc_subsecs(3),
        }
    }
}

fn serialize_millis<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// The client-settable fields of a todo, as decoded from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub completed: bool,
}

impl TodoFields {
    /// Creation requires a non-empty title.
    pub fn validate_for_create(&self) -> Result<(), CoreError> {
        if self.title.is_empty() {
            return Err(CoreError::Validation("Title is required".into()));
        }
        Ok(())
    }
}

/// Decode a request body that must be a JSON object or `null`.
///
/// `null`, missing keys and `null` values fall back to defaults. When a key
/// repeats, the last value wins. Any other top-level value is rejected.
fn decode_fields(body: &[u8]) -> Result<TodoFields, CoreError> {
    let Some(mut object) = serde_json::from_slice::<Option<Map<String, Value>>>(body)? else {
        return Ok(TodoFields::default());
    };

    Ok(TodoFields {
        title: take_field(&mut object, "title")?,
        completed: take_field(&mut object, "completed")?,
    })
}

fn take_field<T>(object: &mut Map<String, Value>, key: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    let value = object
        .remove(key)
        .map(serde_json::from_value::<Option<T>>)
        .transpose()?;
    Ok(value.flatten().unwrap_or_default())
}

/// Decode a create request body. Fails with [`CoreError::MalformedBody`] on invalid JSON.
pub fn decode_create_request(body: &[u8]) -> Result<TodoFields, CoreError> {
    decode_fields(body)
}

/// Decode an update request body. Same rules as [`decode_create_request`].
pub fn decode_update_request(body: &[u8]) -> Result<TodoFields, CoreError> {
    decode_fields(body)
}

/// `{"data": [...]}` envelope for list responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub data: Vec<Todo>,
}

pub fn encode(todo: &Todo) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(todo)
}

#[derive(Serialize)]
struct TodoListRef<'a> {
    data: &'a [Todo],
}

/// Encode todos in the order given.
pub fn encode_list(todos: &[Todo]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&TodoListRef { data: todos })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn sample() -> Todo {
        Todo {
            id: TodoId::parse("65f1a2b3c4d5e6f708192a3b").unwrap(),
            title: "Buy groceries".into(),
            completed: false,
            created_at: chrono::Utc
                .with_ymd_and_hms(2026, 10, 17, 8, 30, 0)
                .unwrap()
                + chrono::Duration::milliseconds(123),
        }
    }

    #[test]
    fn create_request_defaults_completed() {
        let fields = decode_create_request(br#"{"title":"Buy groceries"}"#).unwrap();
        assert_eq!(fields.title, "Buy groceries");
        assert!(!fields.completed);
    }

    #[test]
    fn create_request_ignores_unknown_and_server_fields() {
        let fields = decode_create_request(
            br#"{"title":"x","completed":true,"id":"zzz","createdAt":"yesterday","extra":[1]}"#,
        )
        .unwrap();
        assert_eq!(
            fields,
            TodoFields {
                title: "x".into(),
                completed: true
            }
        );
    }

    #[test]
    fn missing_or_null_title_decodes_empty() {
        assert_eq!(decode_create_request(b"{}").unwrap().title, "");
        assert_eq!(
            decode_update_request(br#"{"title":null,"completed":null}"#).unwrap(),
            TodoFields::default()
        );
    }

    #[test]
    fn invalid_json_is_malformed_body() {
        assert_matches!(
            decode_create_request(b"{not json"),
            Err(CoreError::MalformedBody(_))
        );
        assert_matches!(decode_update_request(b""), Err(CoreError::MalformedBody(_)));
        assert_matches!(
            decode_create_request(br#"{"title":42}"#),
            Err(CoreError::MalformedBody(_))
        );
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        let bodies: [&[u8]; 4] = [br#"["Buy milk", true]"#, b"\"Buy milk\"", b"42", b"true"];
        for body in bodies {
            assert_matches!(
                decode_create_request(body),
                Err(CoreError::MalformedBody(_))
            );
        }
    }

    #[test]
    fn null_body_decodes_to_defaults() {
        assert_eq!(decode_create_request(b"null").unwrap(), TodoFields::default());
        assert_eq!(decode_update_request(b" null ").unwrap(), TodoFields::default());
        assert_matches!(
            decode_create_request(b"null").unwrap().validate_for_create(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let fields =
            decode_create_request(br#"{"title":"a","completed":true,"title":"b","completed":false}"#)
                .unwrap();
        assert_eq!(
            fields,
            TodoFields {
                title: "b".into(),
                completed: false
            }
        );
    }

    #[test]
    fn empty_title_fails_create_validation() {
        let err = TodoFields::default().validate_for_create().unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg == "Title is required");
    }

    #[test]
    fn encode_uses_wire_keys_and_millisecond_utc() {
        let json: serde_json::Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "65f1a2b3c4d5e6f708192a3b",
                "title": "Buy groceries",
                "completed": false,
                "createdAt": "2026-10-17T08:30:00.123Z",
            })
        );
    }

    #[test]
    fn encoded_list_decodes_to_same_todos() {
        let first = sample();
        let second = Todo::new(TodoFields {
            title: "Buy milk".into(),
            completed: true,
        });

        let bytes = encode_list(&[first.clone(), second.clone()]).unwrap();
        let list: TodoList = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(list.data, vec![first, second]);
    }

    #[test]
    fn empty_list_encodes_empty_array() {
        assert_eq!(encode_list(&[]).unwrap(), br#"{"data":[]}"#);
    }

    #[test]
    fn new_assigns_fresh_id_and_time() {
        let before = chrono::Utc::now();
        let todo = Todo::new(TodoFields {
            title: "t".into(),
            completed: false,
        });
        assert!(todo.created_at <= chrono::Utc::now());
        assert!(todo.created_at >= before.trunc_subsecs(3));
        assert_eq!(todo.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
