//! LIFO stack engine; the top is the last element

use super::linked_list::node_id;
use super::{Outcome, Snapshot, Step, StepSink, StructureKind};
use crate::error::EngineError;
use crate::operation::{Operation, OperationKind};

fn frame(values: &[String]) -> Snapshot {
    Snapshot::Stack(values.to_vec())
}

fn push(values: &mut Vec<String>, value: &str, sink: &mut StepSink) {
    sink.emit(
        Step::info(format!("push({})", value), "stack.push(value)"),
        frame(values),
    );
    values.push(value.to_string());
    sink.emit(
        Step::mutate(
            format!("Place {} on top (height {})", value, values.len()),
            "top = value",
        )
        .affecting(node_id(values.len() - 1)),
        frame(values),
    );
}

fn pop(values: &mut Vec<String>, sink: &mut StepSink) {
    let Some(top) = values.pop() else {
        sink.emit(
            Step::not_found("Stack is empty: nothing to pop", "if not stack: return None"),
            frame(values),
        );
        return;
    };
    let index = values.len();
    let mut before = values.clone();
    before.push(top.clone());
    sink.emit(
        Step::info("pop()", "value = stack.pop()").affecting(node_id(index)),
        frame(&before),
    );
    sink.emit(
        Step::mutate(format!("Remove top {}", top), "return value").affecting(node_id(index)),
        frame(values),
    );
}

fn peek(values: &[String], sink: &mut StepSink) {
    let step = match values.last() {
        Some(top) => Step::info(format!("Top is {}", top), "return stack[-1]")
            .affecting(node_id(values.len() - 1)),
        None => Step::not_found("Stack is empty: nothing to peek", "if not stack: return None"),
    };
    sink.emit(step, frame(values));
}

/// Apply one operation to a stack
pub fn apply(
    op: &Operation,
    values: &[String],
    sink: &mut StepSink,
) -> Result<Outcome<Vec<String>>, EngineError> {
    let mut values = values.to_vec();
    match &op.kind {
        OperationKind::Push => push(&mut values, require!(op.required_value()), sink),
        OperationKind::Pop => pop(&mut values, sink),
        OperationKind::Peek => peek(&values, sink),
        OperationKind::Size => sink.emit(
            Step::info(format!("Height is {}", values.len()), "return len(stack)"),
            frame(&values),
        ),
        OperationKind::IsEmpty => sink.emit(
            Step::info(
                format!("is_empty() is {}", values.is_empty()),
                "return len(stack) == 0",
            ),
            frame(&values),
        ),
        OperationKind::Clear => {
            values.clear();
            sink.emit(
                Step::mutate("Remove every element", "stack.clear()"),
                frame(&values),
            );
        }
        other => {
            return Err(EngineError::UnsupportedOperation {
                kind: other.clone(),
                structure: StructureKind::Stack,
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
        let mut snapshot = Snapshot::empty(StructureKind::Stack);
        let mut applied_ops = Vec::new();
        for op in log.iter() {
            let applied = engine::apply(op, &snapshot, &timing).expect("engine should not fail");
            snapshot = applied.snapshot.clone();
            applied_ops.push(applied);
        }
        (snapshot, applied_ops)
    }

    #[test]
    fn test_lifo_order() {
        let (snapshot, applied) = run(vec![
            OperationDraft::new("push").value("1"),
            OperationDraft::new("push").value("2"),
            OperationDraft::new("pop"),
        ]);
        assert_eq!(snapshot.values(), Some(&["1".to_string()][..]));
        assert_eq!(applied[0].steps.len(), 2);
        assert!(applied[2].steps[1].description.contains('2'));
    }

    #[test]
    fn test_pop_empty_is_single_step() {
        let (snapshot, applied) = run(vec![OperationDraft::new("pop")]);
        assert!(snapshot.is_empty());
        assert_eq!(applied[0].steps.len(), 1);
        assert_eq!(applied[0].steps[0].kind, StepKind::NotFound);
    }

    #[test]
    fn test_pop_frames_show_element_until_removed() {
        let (_, applied) = run(vec![
            OperationDraft::new("push").value("a"),
            OperationDraft::new("pop"),
        ]);
        let pop = &applied[1];
        assert_eq!(pop.frames[0].values().map(<[String]>::len), Some(1));
        assert_eq!(pop.frames[1].values().map(<[String]>::len), Some(0));
    }

    #[test]
    fn test_push_without_value_is_rejected() {
        let (snapshot, applied) = run(vec![OperationDraft::new("push")]);
        assert!(snapshot.is_empty());
        assert!(applied[0].steps.is_empty());
        assert!(applied[0].rejection.is_some());
    }

    #[test]
    fn test_queue_operation_is_unsupported() {
        let mut log = OperationLog::new();
        log.append(OperationDraft::new("enqueue").value("1"));
        let result = engine::apply(
            &log.operations()[0],
            &Snapshot::empty(StructureKind::Stack),
            &TimingConfig::default(),
        );
        assert!(matches!(result, Err(EngineError::UnsupportedOperation { .. })));
    }
}
