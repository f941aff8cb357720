//! Todo record and the request payloads that create or modify it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a todo.
///
/// Serialized as a bare JSON number. Path segments are parsed with
/// [`FromStr`], so `/todos/abc` yields a parse error instead of a coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl TodoId {
    /// The id following this one, or `None` once the id space is used up.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// A single todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, immutable after creation.
    pub id: TodoId,
    /// Free-form content.
    pub text: String,
    /// Completion flag.
    pub done: bool,
}

impl Todo {
    /// Create a new, not yet completed todo.
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }

    /// Merge the fields present in `patch` into this record.
    ///
    /// The id is never touched.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
    }

    /// Flip the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// Body of `POST /todos`.
///
/// Clients send the content either as `text` or as `title`. Both are kept so
/// validation errors can name the field the client actually used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl NewTodo {
    /// Payload carrying `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            title: None,
        }
    }

    /// Payload carrying `title`.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            text: None,
            title: Some(title.into()),
        }
    }

    /// Name of the field holding the content, as sent by the client.
    ///
    /// `text` wins when both are present; a payload with neither reports
    /// `text`.
    pub fn field_name(&self) -> &'static str {
        if self.text.is_none() && self.title.is_some() {
            "title"
        } else {
            "text"
        }
    }

    /// The submitted content, if any.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().or(self.title.as_deref())
    }
}

/// Body of `PUT /todos/{id}`: every field is optional.
///
/// Unknown fields, including `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    #[serde(default, alias = "title")]
    pub text: Option<String>,
    #[serde(default, alias = "completed")]
    pub done: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_todo_serializes_flat_shape() {
        let todo = Todo::new(TodoId(7), "Finish task");
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value, json!({"id": 7, "text": "Finish task", "done": false}));
    }

    #[test]
    fn test_todo_id_rejects_non_numeric() {
        assert_eq!("42".parse::<TodoId>().unwrap(), TodoId(42));
        assert!("abc".parse::<TodoId>().is_err());
        assert!("-1".parse::<TodoId>().is_err());
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn test_todo_id_next_stops_at_max() {
        assert_eq!(TodoId(1).next(), Some(TodoId(2)));
        assert_eq!(TodoId(u64::MAX).next(), None);
    }

    #[test]
    fn test_new_todo_field_name_follows_client() {
        let by_title: NewTodo = serde_json::from_value(json!({"title": ""})).unwrap();
        assert_eq!(by_title.field_name(), "title");
        assert_eq!(by_title.content(), Some(""));

        let by_text: NewTodo = serde_json::from_value(json!({"text": "a"})).unwrap();
        assert_eq!(by_text.field_name(), "text");

        let empty: NewTodo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.field_name(), "text");
        assert_eq!(empty.content(), None);
    }

    #[test]
    fn test_patch_accepts_aliases_and_ignores_id() {
        let patch: TodoPatch =
            serde_json::from_value(json!({"id": 99, "title": "renamed", "completed": true}))
                .unwrap();
        assert_eq!(patch.text.as_deref(), Some("renamed"));
        assert_eq!(patch.done, Some(true));

        let mut todo = Todo::new(TodoId(1), "old");
        todo.apply(patch);
        assert_eq!(todo.id, TodoId(1));
        assert_eq!(todo.text, "renamed");
        assert!(todo.done);
    }

    #[test]
    fn test_empty_patch_leaves_record_unchanged() {
        let mut todo = Todo::new(TodoId(3), "keep");
        let before = todo.clone();
        todo.apply(TodoPatch::default());
        assert_eq!(todo, before);
    }

    #[test]
    fn test_toggle_flips_twice() {
        let mut todo = Todo::new(TodoId(1), "x");
        todo.toggle();
        assert!(todo.done);
        todo.toggle();
        assert!(!todo.done);
    }
}
