//! Operation scripts
//!
//! A script names the structure and lists raw operation tuples:
//!
//! ```json
//! {
//!   "structure": "bst",
//!   "operations": [
//!     { "type": "insert", "value": "5" },
//!     { "type": "traverse_inorder" }
//!   ]
//! }
//! ```
//!
//! Tuples are appended verbatim, so ids follow file order starting at 1.

use crate::engine::StructureKind;
use crate::error::ScriptError;
use crate::operation::{OperationDraft, OperationLog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub structure: StructureKind,
    #[serde(default)]
    pub operations: Vec<OperationDraft>,
}

impl Script {
    pub fn from_json(text: &str, path: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(text).map_err(|source| ScriptError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&text, &display)
    }

    pub fn into_log(self) -> (StructureKind, OperationLog) {
        let mut log = OperationLog::new();
        for draft in self.operations {
            log.append(draft);
        }
        (self.structure, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OperationId, OperationKind};

    #[test]
    fn test_load_assigns_ids_in_file_order() {
        let script = Script::from_json(
            r#"{
                "structure": "doubly_linked_list",
                "operations": [
                    {"type": "insert_end", "value": "a", "color": "blue"},
                    {"type": "insert_position", "value": "b", "position": 0},
                    {"type": "shuffle"}
                ]
            }"#,
            "inline",
        )
        .expect("script should parse");

        let (kind, log) = script.into_log();
        assert_eq!(kind, StructureKind::DoublyLinkedList);
        let ids: Vec<_> = log.iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![OperationId(1), OperationId(2), OperationId(3)]);
        assert_eq!(log.operations()[1].position.as_deref(), Some("0"));
        assert_eq!(
            log.operations()[2].kind,
            OperationKind::Unknown("shuffle".to_string())
        );
    }

    #[test]
    fn test_bad_structure_is_a_json_error() {
        let err = Script::from_json(r#"{"structure": "heap"}"#, "bad.json")
            .expect_err("unknown structure should fail");
        assert!(matches!(err, ScriptError::Json { ref path, .. } if path == "bad.json"));
    }
}
