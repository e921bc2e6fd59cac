// Integration tests for whole operation logs

use dsviz::config::TimingConfig;
use dsviz::engine::{Snapshot, StepKind, StructureKind};
use dsviz::operation::{OperationDraft, OperationLog};
use dsviz::stats::{self, Stats};
use dsviz::trace;

fn build(drafts: Vec<OperationDraft>) -> OperationLog {
    let mut log = OperationLog::new();
    for draft in drafts {
        log.append(draft);
    }
    log
}

fn fold(kind: StructureKind, log: &OperationLog) -> (Snapshot, trace::Trace) {
    trace::apply_all(log.operations(), Snapshot::empty(kind), &TimingConfig::default())
}

fn op(kind: &str) -> OperationDraft {
    OperationDraft::new(kind)
}

fn op_with(kind: &str, value: &str) -> OperationDraft {
    OperationDraft::new(kind).value(value)
}

#[test]
fn test_bst_duplicate_is_dropped() {
    let log = build(vec![
        op_with("insert", "5"),
        op_with("insert", "3"),
        op_with("insert", "8"),
        op_with("insert", "3"),
        op("traverse_inorder"),
    ]);
    let (snapshot, trace) = fold(StructureKind::Bst, &log);

    match stats::derive(&snapshot) {
        Stats::Tree(tree) => assert_eq!(tree.size, 3),
        other => panic!("expected tree stats, got {:?}", other),
    }
    let traversal = trace.spans.last().expect("traversal span");
    let last_visit = &trace.steps[traversal.end_step() - 1];
    assert_eq!(last_visit.path, vec!["3", "5", "8"]);
}

#[test]
fn test_stack_push_pop_push() {
    let log = build(vec![
        op_with("push", "1"),
        op_with("push", "2"),
        op("pop"),
        op_with("push", "3"),
        op("peek"),
    ]);
    let (snapshot, trace) = fold(StructureKind::Stack, &log);

    assert_eq!(
        snapshot.values(),
        Some(&["1".to_string(), "3".to_string()][..])
    );
    let peek = &trace.steps[trace.len() - 1];
    assert_eq!(peek.description, "Top is 3");
}

#[test]
fn test_queue_records_dequeued_value() {
    let log = build(vec![
        op_with("enqueue", "A"),
        op_with("enqueue", "B"),
        op("dequeue"),
        op_with("enqueue", "C"),
    ]);
    let (snapshot, trace) = fold(StructureKind::Queue, &log);

    assert_eq!(
        snapshot.values(),
        Some(&["B".to_string(), "C".to_string()][..])
    );
    let dequeue = &trace.spans[2];
    let removal = &trace.steps[dequeue.end_step() - 1];
    assert_eq!(removal.kind, StepKind::Mutate);
    assert!(removal.description.contains("Remove A"));
}

#[test]
fn test_malformed_operations_are_silent_noops() {
    let log = build(vec![
        op_with("insert", "5"),
        op_with("insert", "five"),
        op("insert"),
        op_with("insert", "2"),
    ]);
    let (snapshot, trace) = fold(StructureKind::Bst, &log);

    assert_eq!(trace.spans[1].step_count, 0);
    assert_eq!(trace.spans[2].step_count, 0);
    assert!(trace.spans[1].rejection.is_some());
    assert!(trace.failures.is_empty());
    assert_eq!(
        snapshot.as_tree().map(|tree| tree.values_in_order()),
        Some(vec!["2".to_string(), "5".to_string()])
    );
}

#[test]
fn test_underflow_never_fails() {
    for (kind, ops) in [
        (StructureKind::Stack, vec![op("pop"), op("peek")]),
        (StructureKind::Queue, vec![op("dequeue"), op("front")]),
        (
            StructureKind::SinglyLinkedList,
            vec![op("delete_beginning"), op("delete_end"), op("delete_position").position(3)],
        ),
    ] {
        let count = ops.len();
        let (snapshot, trace) = fold(kind, &build(ops));
        assert!(snapshot.is_empty());
        assert!(trace.failures.is_empty());
        assert_eq!(trace.len(), count, "one explanatory step each for {}", kind);
    }
}

#[test]
fn test_doubly_linked_list_session() {
    let log = build(vec![
        op_with("insert_end", "b"),
        op_with("insert_beginning", "a"),
        op_with("insert_end", "d"),
        op_with("insert_before_position", "c").position(2),
        op("traverse_backward"),
        op_with("update_value", "d").new_value("D"),
        op("delete_before_position").position(1),
    ]);
    let (snapshot, trace) = fold(StructureKind::DoublyLinkedList, &log);

    let backward = &trace.spans[4];
    let last_visit = &trace.steps[backward.end_step() - 1];
    assert_eq!(last_visit.path, vec!["d", "c", "b", "a"]);
    assert_eq!(
        snapshot.values().map(<[String]>::to_vec),
        Some(vec!["b".to_string(), "c".to_string(), "D".to_string()])
    );
}

#[test]
fn test_unknown_operation_is_caught_and_skipped() {
    let log = build(vec![op_with("push", "1"), op("rotate"), op_with("push", "2")]);
    let (snapshot, trace) = fold(StructureKind::Stack, &log);

    assert_eq!(trace.failures.len(), 1);
    assert!(trace.failures[0].message.contains("rotate"));
    assert_eq!(snapshot.values().map(<[String]>::len), Some(2));
}
