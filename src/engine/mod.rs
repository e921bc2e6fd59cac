//! Mutation engines
//!
//! One pure module per structure kind:
//! - [`bst`]: binary search tree over an index arena
//! - [`linked_list`]: singly and doubly linked list
//! - [`stack`]: LIFO stack
//! - [`queue`]: FIFO queue
//!
//! # Execution Model
//!
//! [`apply`] takes one operation and a snapshot and returns the resulting
//! snapshot together with the ordered micro-steps of the operation.  Every step
//! carries the snapshot visible while it is shown, so a renderer can scrub
//! inside an operation without re-running it.  Snapshots are plain values:
//! a later mutation never alters a frame that was already emitted.
//!
//! Malformed input (missing field, non-numeric tree value) yields zero steps,
//! an unchanged snapshot and a [`ValidationError`] describing why.  An
//! [`EngineError`] is reserved for operations the structure cannot run at all.

/// Early-return a rejection from an engine body
macro_rules! require {
    ($field:expr) => {
        match $field {
            Ok(value) => value,
            Err(reason) => return Ok($crate::engine::Outcome::Rejected(reason)),
        }
    };
}

pub mod bst;
pub mod linked_list;
pub mod queue;
pub mod stack;

use crate::config::TimingConfig;
use crate::error::{EngineError, ValidationError};
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use bst::BstTree;

/// The structure a log is simulated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Bst,
    SinglyLinkedList,
    DoublyLinkedList,
    Stack,
    Queue,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StructureKind::Bst => "binary search tree",
            StructureKind::SinglyLinkedList => "singly linked list",
            StructureKind::DoublyLinkedList => "doubly linked list",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
        })
    }
}

/// State of the simulated structure
///
/// Linear structures are ordered values: a stack's top is the last element,
/// a queue's front is the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum Snapshot {
    Bst(BstTree),
    SinglyLinkedList(Vec<String>),
    DoublyLinkedList(Vec<String>),
    Stack(Vec<String>),
    Queue(Vec<String>),
}

impl Snapshot {
    pub fn empty(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Bst => Snapshot::Bst(BstTree::new()),
            StructureKind::SinglyLinkedList => Snapshot::SinglyLinkedList(Vec::new()),
            StructureKind::DoublyLinkedList => Snapshot::DoublyLinkedList(Vec::new()),
            StructureKind::Stack => Snapshot::Stack(Vec::new()),
            StructureKind::Queue => Snapshot::Queue(Vec::new()),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Snapshot::Bst(_) => StructureKind::Bst,
            Snapshot::SinglyLinkedList(_) => StructureKind::SinglyLinkedList,
            Snapshot::DoublyLinkedList(_) => StructureKind::DoublyLinkedList,
            Snapshot::Stack(_) => StructureKind::Stack,
            Snapshot::Queue(_) => StructureKind::Queue,
        }
    }

    pub fn as_tree(&self) -> Option<&BstTree> {
        match self {
            Snapshot::Bst(tree) => Some(tree),
            _ => None,
        }
    }

    /// Ordered values of a linear structure
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Snapshot::Bst(_) => None,
            Snapshot::SinglyLinkedList(values)
            | Snapshot::DoublyLinkedList(values)
            | Snapshot::Stack(values)
            | Snapshot::Queue(values) => Some(values),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Snapshot::Bst(tree) => tree.is_empty(),
            _ => self.values().map_or(true, |values| values.is_empty()),
        }
    }
}

/// Category of a step; selects its duration from [`TimingConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Compare,
    Mutate,
    Visit,
    Info,
    NotFound,
}

/// One animation-sized unit of progress within an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub description: String,
    pub code_line: String,
    pub duration_ms: u64,
    pub kind: StepKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_node: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl Step {
    pub fn new(kind: StepKind, description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            code_line: code_line.into(),
            duration_ms: 0,
            kind,
            affected_node: None,
            path: Vec::new(),
        }
    }

    pub fn compare(description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Self::new(StepKind::Compare, description, code_line)
    }

    pub fn mutate(description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Self::new(StepKind::Mutate, description, code_line)
    }

    pub fn visit(description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Self::new(StepKind::Visit, description, code_line)
    }

    pub fn info(description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Self::new(StepKind::Info, description, code_line)
    }

    pub fn not_found(description: impl Into<String>, code_line: impl Into<String>) -> Self {
        Self::new(StepKind::NotFound, description, code_line)
    }

    pub fn affecting(mut self, node: impl Into<String>) -> Self {
        self.affected_node = Some(node.into());
        self
    }

    pub fn with_path(mut self, path: &[String]) -> Self {
        self.path = path.to_vec();
        self
    }
}

/// Collects steps and their frames while an engine runs
pub struct StepSink<'a> {
    timing: &'a TimingConfig,
    steps: Vec<Step>,
    frames: Vec<Snapshot>,
}

impl<'a> StepSink<'a> {
    pub fn new(timing: &'a TimingConfig) -> Self {
        StepSink {
            timing,
            steps: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Record `step`, shown over `frame`
    pub fn emit(&mut self, mut step: Step, frame: Snapshot) {
        step.duration_ms = self.timing.duration_ms(step.kind);
        self.steps.push(step);
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// What an engine produced for one operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Applied(T),
    Rejected(ValidationError),
}

/// Result of applying one operation to a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub snapshot: Snapshot,
    pub steps: Vec<Step>,
    /// `frames[i]` is the structure as it looks during `steps[i]`
    pub frames: Vec<Snapshot>,
    pub rejection: Option<ValidationError>,
}

/// Apply one operation to `snapshot`.
///
/// The input snapshot is never modified.  A rejected operation returns the
/// input unchanged with no steps.
pub fn apply(
    op: &Operation,
    snapshot: &Snapshot,
    timing: &TimingConfig,
) -> Result<Applied, EngineError> {
    let mut sink = StepSink::new(timing);
    let outcome = match snapshot {
        Snapshot::Bst(tree) => bst::apply(op, tree, &mut sink)?.map(Snapshot::Bst),
        Snapshot::SinglyLinkedList(values) => {
            linked_list::apply(op, values, false, &mut sink)?.map(Snapshot::SinglyLinkedList)
        }
        Snapshot::DoublyLinkedList(values) => {
            linked_list::apply(op, values, true, &mut sink)?.map(Snapshot::DoublyLinkedList)
        }
        Snapshot::Stack(values) => stack::apply(op, values, &mut sink)?.map(Snapshot::Stack),
        Snapshot::Queue(values) => queue::apply(op, values, &mut sink)?.map(Snapshot::Queue),
    };

    let StepSink { steps, frames, .. } = sink;
    Ok(match outcome {
        Outcome::Applied(snapshot) => Applied {
            snapshot,
            steps,
            frames,
            rejection: None,
        },
        Outcome::Rejected(reason) => Applied {
            snapshot: snapshot.clone(),
            steps: Vec::new(),
            frames: Vec::new(),
            rejection: Some(reason),
        },
    })
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Rejected(reason) => Outcome::Rejected(reason),
        }
    }
}

/// Clamp a user position into `[0, upper]`
pub(crate) fn clamp_position(position: i64, upper: usize) -> usize {
    if position <= 0 {
        0
    } else {
        (position as u64).min(upper as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OperationDraft, OperationLog};

    #[test]
    fn test_rejected_operation_leaves_snapshot() {
        let mut log = OperationLog::new();
        log.append(OperationDraft::new("insert").value("abc"));
        let snapshot = Snapshot::empty(StructureKind::Bst);
        let applied = apply(&log.operations()[0], &snapshot, &TimingConfig::default())
            .expect("engine should not fail");
        assert!(applied.steps.is_empty());
        assert_eq!(applied.snapshot, snapshot);
        assert_eq!(
            applied.rejection,
            Some(ValidationError::NonNumericValue {
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_frames_match_steps() {
        let mut log = OperationLog::new();
        log.append(OperationDraft::new("push").value("1"));
        let applied = apply(
            &log.operations()[0],
            &Snapshot::empty(StructureKind::Stack),
            &TimingConfig::default(),
        )
        .expect("engine should not fail");
        assert_eq!(applied.steps.len(), applied.frames.len());
        assert_eq!(applied.frames.last(), Some(&applied.snapshot));
    }

    #[test]
    fn test_frames_keep_their_structure_kind() {
        for kind in [
            StructureKind::Bst,
            StructureKind::SinglyLinkedList,
            StructureKind::DoublyLinkedList,
            StructureKind::Stack,
            StructureKind::Queue,
        ] {
            assert_eq!(Snapshot::empty(kind).kind(), kind);
        }

        let mut log = OperationLog::new();
        log.append(OperationDraft::new("insert_end").value("a"));
        log.append(OperationDraft::new("traverse_backward"));
        let mut snapshot = Snapshot::empty(StructureKind::DoublyLinkedList);
        for op in log.iter() {
            let applied = apply(op, &snapshot, &TimingConfig::default())
                .expect("engine should not fail");
            assert!(applied
                .frames
                .iter()
                .all(|frame| frame.kind() == StructureKind::DoublyLinkedList));
            snapshot = applied.snapshot;
        }
        assert_eq!(snapshot, Snapshot::DoublyLinkedList(vec!["a".to_string()]));
    }

    #[test]
    fn test_clamp_position() {
        assert_eq!(clamp_position(-5, 3), 0);
        assert_eq!(clamp_position(2, 3), 2);
        assert_eq!(clamp_position(10, 3), 3);
    }
}
