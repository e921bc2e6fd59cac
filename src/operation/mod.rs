//! User-authored operations and the log that orders them
//!
//! - [`Operation`]: one intent (insert, pop, traverse, ...) with its raw fields
//! - [`OperationKind`]: the tagged operation type, parsed from its wire name
//! - [`OperationDraft`]: the raw tuple an input surface appends
//! - [`log`]: the ordered, id-keyed [`log::OperationLog`]
//! - [`codegen`]: line-oriented pseudo-code for a log
//!
//! # Field handling
//!
//! Every field except the type is an optional string, exactly as the input
//! surface delivers it.  Nothing is validated on append or edit; the engines
//! ask for the fields they need through [`Operation::required_value`] and
//! friends, and a missing or malformed field turns the operation into a
//! zero-step no-op.

pub mod codegen;
pub mod log;

use crate::error::ValidationError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub use log::OperationLog;

/// Stable identifier assigned by the [`OperationLog`] on append
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operation type, keyed by its wire name (`insert`, `traverse_inorder`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationKind {
    // Binary search tree
    Insert,
    Delete,
    Search,
    TraverseInorder,
    TraversePreorder,
    TraversePostorder,
    TraverseLevelorder,
    FindMin,
    FindMax,

    // Linked lists
    InsertBeginning,
    InsertEnd,
    InsertPosition,
    InsertBeforePosition,
    DeleteBeginning,
    DeleteEnd,
    DeletePosition,
    DeleteBeforePosition,
    DeleteValue,
    SearchValue,
    SearchPosition,
    UpdateValue,
    UpdatePosition,
    Traverse,
    TraverseBackward,

    // Stack and queue
    Push,
    Pop,
    Peek,
    Enqueue,
    Dequeue,
    Front,
    Rear,

    // Shared
    Size,
    IsEmpty,
    Clear,

    /// A type name no engine knows; kept verbatim so the log round-trips
    Unknown(String),
}

impl OperationKind {
    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
            OperationKind::Search => "search",
            OperationKind::TraverseInorder => "traverse_inorder",
            OperationKind::TraversePreorder => "traverse_preorder",
            OperationKind::TraversePostorder => "traverse_postorder",
            OperationKind::TraverseLevelorder => "traverse_levelorder",
            OperationKind::FindMin => "find_min",
            OperationKind::FindMax => "find_max",
            OperationKind::InsertBeginning => "insert_beginning",
            OperationKind::InsertEnd => "insert_end",
            OperationKind::InsertPosition => "insert_position",
            OperationKind::InsertBeforePosition => "insert_before_position",
            OperationKind::DeleteBeginning => "delete_beginning",
            OperationKind::DeleteEnd => "delete_end",
            OperationKind::DeletePosition => "delete_position",
            OperationKind::DeleteBeforePosition => "delete_before_position",
            OperationKind::DeleteValue => "delete_value",
            OperationKind::SearchValue => "search_value",
            OperationKind::SearchPosition => "search_position",
            OperationKind::UpdateValue => "update_value",
            OperationKind::UpdatePosition => "update_position",
            OperationKind::Traverse => "traverse",
            OperationKind::TraverseBackward => "traverse_backward",
            OperationKind::Push => "push",
            OperationKind::Pop => "pop",
            OperationKind::Peek => "peek",
            OperationKind::Enqueue => "enqueue",
            OperationKind::Dequeue => "dequeue",
            OperationKind::Front => "front",
            OperationKind::Rear => "rear",
            OperationKind::Size => "size",
            OperationKind::IsEmpty => "is_empty",
            OperationKind::Clear => "clear",
            OperationKind::Unknown(name) => name,
        }
    }

    /// Whether the operation reads the `value` field
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            OperationKind::Insert
                | OperationKind::Delete
                | OperationKind::Search
                | OperationKind::InsertBeginning
                | OperationKind::InsertEnd
                | OperationKind::InsertPosition
                | OperationKind::InsertBeforePosition
                | OperationKind::DeleteValue
                | OperationKind::SearchValue
                | OperationKind::UpdateValue
                | OperationKind::Push
                | OperationKind::Enqueue
        )
    }

    /// Whether the operation reads the `position` field
    pub fn requires_position(&self) -> bool {
        matches!(
            self,
            OperationKind::InsertPosition
                | OperationKind::InsertBeforePosition
                | OperationKind::DeletePosition
                | OperationKind::DeleteBeforePosition
                | OperationKind::SearchPosition
                | OperationKind::UpdatePosition
        )
    }

    /// Whether the operation reads the `newValue` field
    pub fn requires_new_value(&self) -> bool {
        matches!(
            self,
            OperationKind::UpdateValue | OperationKind::UpdatePosition
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OperationKind {
    fn from(name: &str) -> Self {
        match name.trim() {
            "insert" => OperationKind::Insert,
            "delete" => OperationKind::Delete,
            "search" => OperationKind::Search,
            "traverse_inorder" | "inorder" => OperationKind::TraverseInorder,
            "traverse_preorder" | "preorder" => OperationKind::TraversePreorder,
            "traverse_postorder" | "postorder" => OperationKind::TraversePostorder,
            "traverse_levelorder" | "levelorder" => OperationKind::TraverseLevelorder,
            "find_min" => OperationKind::FindMin,
            "find_max" => OperationKind::FindMax,
            "insert_beginning" => OperationKind::InsertBeginning,
            "insert_end" => OperationKind::InsertEnd,
            "insert_position" => OperationKind::InsertPosition,
            "insert_before_position" => OperationKind::InsertBeforePosition,
            "delete_beginning" => OperationKind::DeleteBeginning,
            "delete_end" => OperationKind::DeleteEnd,
            "delete_position" => OperationKind::DeletePosition,
            "delete_before_position" => OperationKind::DeleteBeforePosition,
            "delete_value" => OperationKind::DeleteValue,
            "search_value" => OperationKind::SearchValue,
            "search_position" => OperationKind::SearchPosition,
            "update_value" => OperationKind::UpdateValue,
            "update_position" => OperationKind::UpdatePosition,
            "traverse" | "traverse_forward" => OperationKind::Traverse,
            "traverse_backward" => OperationKind::TraverseBackward,
            "push" => OperationKind::Push,
            "pop" => OperationKind::Pop,
            "peek" => OperationKind::Peek,
            "enqueue" => OperationKind::Enqueue,
            "dequeue" => OperationKind::Dequeue,
            "front" => OperationKind::Front,
            "rear" => OperationKind::Rear,
            "size" => OperationKind::Size,
            "is_empty" | "isEmpty" => OperationKind::IsEmpty,
            "clear" => OperationKind::Clear,
            other => OperationKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for OperationKind {
    fn from(name: String) -> Self {
        OperationKind::from(name.as_str())
    }
}

impl From<OperationKind> for String {
    fn from(kind: OperationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for OperationKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OperationKind::from(s))
    }
}

/// An operation as stored in the log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: OperationId,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Operation {
    pub(crate) fn from_draft(id: OperationId, draft: OperationDraft) -> Self {
        Operation {
            id,
            kind: draft.kind,
            name: draft.name,
            value: draft.value,
            position: draft.position,
            new_value: draft.new_value,
            color: draft.color,
            category: draft.category,
        }
    }

    /// The trimmed `value` field, or `MissingValue` if unset or blank
    pub fn required_value(&self) -> Result<&str, ValidationError> {
        non_blank(self.value.as_deref()).ok_or(ValidationError::MissingValue)
    }

    /// The trimmed `newValue` field, or `MissingNewValue` if unset or blank
    pub fn required_new_value(&self) -> Result<&str, ValidationError> {
        non_blank(self.new_value.as_deref()).ok_or(ValidationError::MissingNewValue)
    }

    /// The `position` field parsed as a signed index.
    ///
    /// Negative positions are returned as-is; clamping is the engine's job.
    pub fn required_position(&self) -> Result<i64, ValidationError> {
        let raw = non_blank(self.position.as_deref()).ok_or(ValidationError::MissingPosition)?;
        raw.parse::<i64>()
            .map_err(|_| ValidationError::InvalidPosition {
                position: raw.to_string(),
            })
    }

    /// Whether every field the kind requires is present (not whether it parses)
    pub fn has_required_fields(&self) -> bool {
        (!self.kind.requires_value() || non_blank(self.value.as_deref()).is_some())
            && (!self.kind.requires_position() || non_blank(self.position.as_deref()).is_some())
            && (!self.kind.requires_new_value()
                || non_blank(self.new_value.as_deref()).is_some())
    }
}

fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Raw `{type, name, value, position, newValue, color, category}` tuple
/// delivered by an input surface and appended verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDraft {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub new_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl OperationDraft {
    pub fn new(kind: impl Into<OperationKind>) -> Self {
        OperationDraft {
            kind: kind.into(),
            name: None,
            value: None,
            position: None,
            new_value: None,
            color: None,
            category: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn position(mut self, position: impl ToString) -> Self {
        self.position = Some(position.to_string());
        self
    }

    pub fn new_value(mut self, new_value: impl Into<String>) -> Self {
        self.new_value = Some(new_value.into());
        self
    }
}

/// Accept strings, numbers and booleans for text fields; scripts written by
/// hand often say `"position": 2` rather than `"position": "2"`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Editable fields addressed by field-edit events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationField {
    Value,
    Position,
    NewValue,
}

impl FromStr for OperationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(OperationField::Value),
            "position" => Ok(OperationField::Position),
            "newValue" | "new_value" => Ok(OperationField::NewValue),
            other => Err(format!("Unknown operation field: {}", other)),
        }
    }
}

/// Partial update for [`OperationLog::update`].
///
/// `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationPatch {
    pub value: Option<Option<String>>,
    pub position: Option<Option<String>>,
    pub new_value: Option<Option<String>>,
}

impl OperationPatch {
    pub fn field(field: OperationField, value: Option<String>) -> Self {
        let mut patch = OperationPatch::default();
        match field {
            OperationField::Value => patch.value = Some(value),
            OperationField::Position => patch.position = Some(value),
            OperationField::NewValue => patch.new_value = Some(value),
        }
        patch
    }

    pub(crate) fn apply_to(self, op: &mut Operation) {
        if let Some(value) = self.value {
            op.value = value;
        }
        if let Some(position) = self.position {
            op.position = position;
        }
        if let Some(new_value) = self.new_value {
            op.new_value = new_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names_round_trip() {
        for name in ["insert", "traverse_inorder", "delete_before_position", "is_empty"] {
            assert_eq!(OperationKind::from(name).as_str(), name);
        }
        assert_eq!(
            OperationKind::from("rotate_left"),
            OperationKind::Unknown("rotate_left".to_string())
        );
    }

    #[test]
    fn test_draft_accepts_numeric_fields() {
        let draft: OperationDraft =
            serde_json::from_str(r#"{"type": "insert_position", "value": 7, "position": 2}"#)
                .expect("draft should parse");
        assert_eq!(draft.kind, OperationKind::InsertPosition);
        assert_eq!(draft.value.as_deref(), Some("7"));
        assert_eq!(draft.position.as_deref(), Some("2"));
        assert_eq!(draft.new_value, None);
    }

    #[test]
    fn test_required_fields() {
        let op = Operation::from_draft(
            OperationId(1),
            OperationDraft::new("insert_position").value("  ").position("x"),
        );
        assert_eq!(op.required_value(), Err(ValidationError::MissingValue));
        assert_eq!(
            op.required_position(),
            Err(ValidationError::InvalidPosition {
                position: "x".to_string()
            })
        );
        assert!(!op.has_required_fields());

        let op = Operation::from_draft(
            OperationId(2),
            OperationDraft::new("insert_position").value("4").position("-3"),
        );
        assert_eq!(op.required_position(), Ok(-3));
        assert!(op.has_required_fields());
    }
}
