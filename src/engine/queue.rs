//! FIFO queue engine; the front is the first element

use super::linked_list::node_id;
use super::{Outcome, Snapshot, Step, StepSink, StructureKind};
use crate::error::EngineError;
use crate::operation::{Operation, OperationKind};

fn frame(values: &[String]) -> Snapshot {
    Snapshot::Queue(values.to_vec())
}

fn enqueue(values: &mut Vec<String>, value: &str, sink: &mut StepSink) {
    sink.emit(
        Step::info(format!("enqueue({})", value), "queue.append(value)"),
        frame(values),
    );
    values.push(value.to_string());
    sink.emit(
        Step::mutate(
            format!("{} joins the rear (length {})", value, values.len()),
            "rear = value",
        )
        .affecting(node_id(values.len() - 1)),
        frame(values),
    );
}

fn dequeue(values: &mut Vec<String>, sink: &mut StepSink) {
    if values.is_empty() {
        sink.emit(
            Step::not_found(
                "Queue is empty: nothing to dequeue",
                "if not queue: return None",
            ),
            frame(values),
        );
        return;
    }
    sink.emit(
        Step::info(format!("dequeue(): front is {}", values[0]), "value = queue[0]")
            .affecting(node_id(0)),
        frame(values),
    );
    let removed = values.remove(0);
    let description = match values.first() {
        Some(next) => format!("Remove {}; {} is the new front", removed, next),
        None => format!("Remove {}; the queue is now empty", removed),
    };
    sink.emit(
        Step::mutate(description, "queue.popleft()").affecting(node_id(0)),
        frame(values),
    );
}

fn inspect(values: &[String], rear: bool, sink: &mut StepSink) {
    let end = if rear { values.len().checked_sub(1) } else { Some(0) };
    let step = match end.and_then(|index| values.get(index).map(|value| (index, value))) {
        Some((index, value)) => {
            let (label, code_line) = if rear {
                ("Rear", "return queue[-1]")
            } else {
                ("Front", "return queue[0]")
            };
            Step::info(format!("{} is {}", label, value), code_line).affecting(node_id(index))
        }
        None => Step::not_found("Queue is empty", "if not queue: return None"),
    };
    sink.emit(step, frame(values));
}

/// Apply one operation to a queue
pub fn apply(
    op: &Operation,
    values: &[String],
    sink: &mut StepSink,
) -> Result<Outcome<Vec<String>>, EngineError> {
    let mut values = values.to_vec();
    match &op.kind {
        OperationKind::Enqueue => enqueue(&mut values, require!(op.required_value()), sink),
        OperationKind::Dequeue => dequeue(&mut values, sink),
        OperationKind::Front | OperationKind::Peek => inspect(&values, false, sink),
        OperationKind::Rear => inspect(&values, true, sink),
        OperationKind::Size => sink.emit(
            Step::info(format!("Length is {}", values.len()), "return len(queue)"),
            frame(&values),
        ),
        OperationKind::IsEmpty => sink.emit(
            Step::info(
                format!("is_empty() is {}", values.is_empty()),
                "return len(queue) == 0",
            ),
            frame(&values),
        ),
        OperationKind::Clear => {
            values.clear();
            sink.emit(
                Step::mutate("Remove every element", "queue.clear()"),
                frame(&values),
            );
        }
        other => {
            return Err(EngineError::UnsupportedOperation {
                kind: other.clone(),
                structure: StructureKind::Queue,
            })
        }
    }
    Ok(Outcome::Applied(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::engine::{self, StepKind};
    use crate::operation::{OperationDraft, OperationLog};

    fn run(drafts: Vec<OperationDraft>) -> (Snapshot, Vec<engine::Applied>) {
        let mut log = OperationLog::new();
        for draft in drafts {
            log.append(draft);
        }
        let timing = TimingConfig::default();
        let mut snapshot = Snapshot::empty(StructureKind::Queue);
        let mut applied_ops = Vec::new();
        for op in log.iter() {
            let applied = engine::apply(op, &snapshot, &timing).expect("engine should not fail");
            snapshot = applied.snapshot.clone();
            applied_ops.push(applied);
        }
        (snapshot, applied_ops)
    }

    #[test]
    fn test_fifo_order() {
        let (snapshot, applied) = run(vec![
            OperationDraft::new("enqueue").value("1"),
            OperationDraft::new("enqueue").value("2"),
            OperationDraft::new("dequeue"),
        ]);
        assert_eq!(snapshot.values(), Some(&["2".to_string()][..]));
        let removal = &applied[2].steps[1];
        assert!(removal.description.starts_with("Remove 1"));
    }

    #[test]
    fn test_dequeue_empty_is_single_step() {
        let (_, applied) = run(vec![OperationDraft::new("dequeue")]);
        assert_eq!(applied[0].steps.len(), 1);
        assert_eq!(applied[0].steps[0].kind, StepKind::NotFound);
    }

    #[test]
    fn test_front_and_rear() {
        let (_, applied) = run(vec![
            OperationDraft::new("enqueue").value("a"),
            OperationDraft::new("enqueue").value("b"),
            OperationDraft::new("front"),
            OperationDraft::new("rear"),
            OperationDraft::new("size"),
        ]);
        assert_eq!(applied[2].steps[0].description, "Front is a");
        assert_eq!(applied[3].steps[0].description, "Rear is b");
        assert_eq!(applied[4].steps[0].description, "Length is 2");
    }

    #[test]
    fn test_rear_on_empty_queue() {
        let (_, applied) = run(vec![OperationDraft::new("rear")]);
        assert_eq!(applied[0].steps[0].kind, StepKind::NotFound);
    }
}
