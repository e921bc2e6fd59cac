// Property tests for engine and trace invariants

use dsviz::config::TimingConfig;
use dsviz::engine::{Snapshot, StructureKind};
use dsviz::operation::{OperationDraft, OperationLog};
use dsviz::trace;
use proptest::prelude::*;
use std::collections::{BTreeSet, VecDeque};

fn log_of(drafts: Vec<OperationDraft>) -> OperationLog {
    let mut log = OperationLog::new();
    for draft in drafts {
        log.append(draft);
    }
    log
}

fn fold(kind: StructureKind, log: &OperationLog) -> (Snapshot, trace::Trace) {
    trace::apply_all(log.operations(), Snapshot::empty(kind), &TimingConfig::default())
}

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i32),
    Delete(i32),
    Search(i32),
}

fn tree_op() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        4 => (-50i32..50).prop_map(TreeOp::Insert),
        2 => (-50i32..50).prop_map(TreeOp::Delete),
        1 => (-50i32..50).prop_map(TreeOp::Search),
    ]
}

impl TreeOp {
    fn draft(&self) -> OperationDraft {
        match self {
            TreeOp::Insert(v) => OperationDraft::new("insert").value(v.to_string()),
            TreeOp::Delete(v) => OperationDraft::new("delete").value(v.to_string()),
            TreeOp::Search(v) => OperationDraft::new("search").value(v.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
enum LinearOp {
    Add(u8),
    Remove,
    Look,
}

fn linear_op() -> impl Strategy<Value = LinearOp> {
    prop_oneof![
        3 => any::<u8>().prop_map(LinearOp::Add),
        2 => Just(LinearOp::Remove),
        1 => Just(LinearOp::Look),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bst_stays_ordered_and_matches_a_set(ops in prop::collection::vec(tree_op(), 0..60)) {
        let mut model = BTreeSet::new();
        for op in &ops {
            match op {
                TreeOp::Insert(v) => { model.insert(*v); }
                TreeOp::Delete(v) => { model.remove(v); }
                TreeOp::Search(_) => {}
            }
        }

        let log = log_of(ops.iter().map(TreeOp::draft).collect());
        let (snapshot, trace) = fold(StructureKind::Bst, &log);
        let tree = snapshot.as_tree().expect("tree snapshot");

        prop_assert!(tree.is_ordered());
        prop_assert_eq!(tree.size(), model.len());
        let expected: Vec<String> = model.iter().map(i32::to_string).collect();
        prop_assert_eq!(tree.values_in_order(), expected);
        prop_assert!(trace.failures.is_empty());
    }

    #[test]
    fn duplicate_insert_leaves_tree_unchanged(
        values in prop::collection::vec(-20i32..20, 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut drafts: Vec<_> = values
            .iter()
            .map(|v| OperationDraft::new("insert").value(v.to_string()))
            .collect();
        let (before, _) = fold(StructureKind::Bst, &log_of(drafts.clone()));

        let duplicate = values[pick.index(values.len())];
        drafts.push(OperationDraft::new("insert").value(duplicate.to_string()));
        let (after, _) = fold(StructureKind::Bst, &log_of(drafts));

        prop_assert_eq!(before, after);
    }

    #[test]
    fn stack_is_lifo(ops in prop::collection::vec(linear_op(), 0..60)) {
        let mut model: Vec<String> = Vec::new();
        let drafts = ops
            .iter()
            .map(|op| match op {
                LinearOp::Add(v) => {
                    model.push(v.to_string());
                    OperationDraft::new("push").value(v.to_string())
                }
                LinearOp::Remove => {
                    model.pop();
                    OperationDraft::new("pop")
                }
                LinearOp::Look => OperationDraft::new("peek"),
            })
            .collect();

        let (snapshot, trace) = fold(StructureKind::Stack, &log_of(drafts));
        prop_assert_eq!(snapshot.values(), Some(model.as_slice()));
        prop_assert!(trace.failures.is_empty());
    }

    #[test]
    fn queue_is_fifo(ops in prop::collection::vec(linear_op(), 0..60)) {
        let mut model: VecDeque<String> = VecDeque::new();
        let drafts = ops
            .iter()
            .map(|op| match op {
                LinearOp::Add(v) => {
                    model.push_back(v.to_string());
                    OperationDraft::new("enqueue").value(v.to_string())
                }
                LinearOp::Remove => {
                    model.pop_front();
                    OperationDraft::new("dequeue")
                }
                LinearOp::Look => OperationDraft::new("front"),
            })
            .collect();

        let (snapshot, _) = fold(StructureKind::Queue, &log_of(drafts));
        let expected: Vec<String> = model.into_iter().collect();
        prop_assert_eq!(snapshot.values(), Some(expected.as_slice()));
    }

    #[test]
    fn out_of_range_positions_clamp(
        values in prop::collection::vec(0u8..100, 1..10),
        offset in 1i64..50,
        doubly in any::<bool>(),
    ) {
        let kind = if doubly {
            StructureKind::DoublyLinkedList
        } else {
            StructureKind::SinglyLinkedList
        };
        let base: Vec<_> = values
            .iter()
            .map(|v| OperationDraft::new("insert_end").value(v.to_string()))
            .collect();
        let len = values.len() as i64;

        let with = |extra: OperationDraft| {
            let mut drafts = base.clone();
            drafts.push(extra);
            fold(kind, &log_of(drafts)).0
        };

        prop_assert_eq!(
            with(OperationDraft::new("insert_position").value("x").position(len + offset)),
            with(OperationDraft::new("insert_end").value("x"))
        );
        prop_assert_eq!(
            with(OperationDraft::new("insert_position").value("x").position(-offset)),
            with(OperationDraft::new("insert_beginning").value("x"))
        );
        prop_assert_eq!(
            with(OperationDraft::new("delete_position").position(len + offset)),
            with(OperationDraft::new("delete_end"))
        );
    }

    #[test]
    fn trace_is_deterministic_and_ends_on_the_fold(ops in prop::collection::vec(tree_op(), 0..30)) {
        let log = log_of(ops.iter().map(TreeOp::draft).collect());
        let (snapshot, first) = fold(StructureKind::Bst, &log);
        let (_, second) = fold(StructureKind::Bst, &log);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.steps.len(), first.frames.len());
        if let Some(last) = first.frames.last() {
            prop_assert_eq!(last, &snapshot);
        }
        let total: usize = first.spans.iter().map(|span| span.step_count).sum();
        prop_assert_eq!(total, first.len());
    }
}
