//! Statistics derived from a snapshot
//!
//! Recomputed from scratch for every frame, so a stats panel is correct in
//! the middle of an operation as well as between operations.

use crate::engine::Snapshot;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub size: usize,
    pub height: usize,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub is_empty: bool,
}

/// Stats for lists, stacks and queues.
///
/// `head_value` is the first element and `tail_value` the last: for a stack
/// the tail is the top, for a queue the head is the front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearStats {
    pub length: usize,
    pub head_value: Option<String>,
    pub tail_value: Option<String>,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Stats {
    Tree(TreeStats),
    Linear(LinearStats),
}

impl Stats {
    pub fn is_empty(&self) -> bool {
        match self {
            Stats::Tree(stats) => stats.is_empty,
            Stats::Linear(stats) => stats.is_empty,
        }
    }

    /// Label/value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "null".to_string());
        match self {
            Stats::Tree(stats) => vec![
                ("size", stats.size.to_string()),
                ("height", stats.height.to_string()),
                ("min", show(&stats.min_value)),
                ("max", show(&stats.max_value)),
                ("empty", stats.is_empty.to_string()),
            ],
            Stats::Linear(stats) => vec![
                ("length", stats.length.to_string()),
                ("head", show(&stats.head_value)),
                ("tail", show(&stats.tail_value)),
                ("empty", stats.is_empty.to_string()),
            ],
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{:<7} {}", label, value)?;
        }
        Ok(())
    }
}

/// Derive stats for `snapshot`
pub fn derive(snapshot: &Snapshot) -> Stats {
    match snapshot {
        Snapshot::Bst(tree) => Stats::Tree(TreeStats {
            size: tree.size(),
            height: tree.height(),
            min_value: tree.min_node().map(|node| node.value.clone()),
            max_value: tree.max_node().map(|node| node.value.clone()),
            is_empty: tree.is_empty(),
        }),
        Snapshot::SinglyLinkedList(values)
        | Snapshot::DoublyLinkedList(values)
        | Snapshot::Stack(values)
        | Snapshot::Queue(values) => Stats::Linear(LinearStats {
            length: values.len(),
            head_value: values.first().cloned(),
            tail_value: values.last().cloned(),
            is_empty: values.is_empty(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::engine::{self, StructureKind};
    use crate::operation::{OperationDraft, OperationLog};

    #[test]
    fn test_empty_snapshots() {
        let tree = derive(&Snapshot::empty(StructureKind::Bst));
        assert_eq!(
            tree,
            Stats::Tree(TreeStats {
                size: 0,
                height: 0,
                min_value: None,
                max_value: None,
                is_empty: true,
            })
        );
        let queue = derive(&Snapshot::empty(StructureKind::Queue));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tree_stats() {
        let mut log = OperationLog::new();
        for value in ["5", "3", "8", "1"] {
            log.append(OperationDraft::new("insert").value(value));
        }
        let timing = TimingConfig::default();
        let mut snapshot = Snapshot::empty(StructureKind::Bst);
        for op in log.iter() {
            snapshot = engine::apply(op, &snapshot, &timing)
                .expect("engine should not fail")
                .snapshot;
        }
        match derive(&snapshot) {
            Stats::Tree(stats) => {
                assert_eq!(stats.size, 4);
                assert_eq!(stats.height, 3);
                assert_eq!(stats.min_value.as_deref(), Some("1"));
                assert_eq!(stats.max_value.as_deref(), Some("8"));
            }
            other => panic!("expected tree stats, got {:?}", other),
        }
    }

    #[test]
    fn test_linear_head_and_tail() {
        let snapshot = Snapshot::Stack(vec!["1".to_string(), "3".to_string()]);
        let stats = derive(&snapshot);
        assert_eq!(
            stats.rows(),
            vec![
                ("length", "2".to_string()),
                ("head", "1".to_string()),
                ("tail", "3".to_string()),
                ("empty", "false".to_string()),
            ]
        );
    }
}
