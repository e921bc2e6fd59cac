//! Pseudo-code rendering of an operation log
//!
//! One constructor line, then one method call per operation that has every
//! field its kind needs.  Output depends only on the structure kind and the
//! operations, so an unchanged log always renders the same text.

use super::{Operation, OperationKind};
use crate::engine::StructureKind;

/// Rendered program plus the mapping from log index to line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    lines: Vec<String>,
    /// `line_of[i]` is the line rendered for the operation at log index `i`
    line_of: Vec<Option<usize>>,
}

impl GeneratedCode {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line number (0-based) of the operation at `index`, if it was rendered
    pub fn line_for(&self, index: usize) -> Option<usize> {
        self.line_of.get(index).copied().flatten()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn receiver(kind: StructureKind) -> (&'static str, &'static str) {
    match kind {
        StructureKind::Bst => ("tree", "BinarySearchTree"),
        StructureKind::SinglyLinkedList => ("ll", "SinglyLinkedList"),
        StructureKind::DoublyLinkedList => ("dll", "DoublyLinkedList"),
        StructureKind::Stack => ("stack", "Stack"),
        StructureKind::Queue => ("queue", "Queue"),
    }
}

/// Numbers print bare, everything else as a quoted string
fn literal(raw: &str) -> String {
    let raw = raw.trim();
    if raw.parse::<f64>().map_or(false, f64::is_finite) {
        raw.to_string()
    } else {
        format!("{:?}", raw)
    }
}

fn call(var: &str, op: &Operation) -> String {
    let kind = &op.kind;
    let mut args = Vec::new();
    if kind.requires_value() {
        args.extend(op.value.as_deref().map(literal));
    }
    if kind.requires_position() {
        args.extend(op.position.as_deref().map(literal));
    }
    if kind.requires_new_value() {
        args.extend(op.new_value.as_deref().map(literal));
    }
    format!("{}.{}({})", var, kind, args.join(", "))
}

/// Render `ops` as a program against a `kind` structure
pub fn generate(kind: StructureKind, ops: &[Operation]) -> GeneratedCode {
    let (var, class) = receiver(kind);
    let mut lines = vec![format!("{} = {}()", var, class)];
    let mut line_of = Vec::with_capacity(ops.len());

    for op in ops {
        if matches!(op.kind, OperationKind::Unknown(_)) || !op.has_required_fields() {
            line_of.push(None);
            continue;
        }
        line_of.push(Some(lines.len()));
        lines.push(call(var, op));
    }

    GeneratedCode { lines, line_of }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OperationDraft, OperationLog};

    fn log(drafts: Vec<OperationDraft>) -> OperationLog {
        let mut log = OperationLog::new();
        for draft in drafts {
            log.append(draft);
        }
        log
    }

    #[test]
    fn test_renders_calls_and_skips_incomplete() {
        let log = log(vec![
            OperationDraft::new("insert").value("5"),
            OperationDraft::new("insert"),
            OperationDraft::new("traverse_inorder"),
            OperationDraft::new("rotate"),
        ]);
        let code = generate(StructureKind::Bst, log.operations());
        assert_eq!(
            code.lines(),
            &[
                "tree = BinarySearchTree()".to_string(),
                "tree.insert(5)".to_string(),
                "tree.traverse_inorder()".to_string(),
            ]
        );
        assert_eq!(code.line_for(0), Some(1));
        assert_eq!(code.line_for(1), None);
        assert_eq!(code.line_for(2), Some(2));
        assert_eq!(code.line_for(3), None);
    }

    #[test]
    fn test_argument_order_and_quoting() {
        let log = log(vec![
            OperationDraft::new("insert_position").value("apple").position(2),
            OperationDraft::new("update_position").position(0).new_value("7"),
            OperationDraft::new("update_value").value("x").new_value("y"),
        ]);
        let code = generate(StructureKind::DoublyLinkedList, log.operations());
        assert_eq!(code.lines()[1], r#"dll.insert_position("apple", 2)"#);
        assert_eq!(code.lines()[2], "dll.update_position(0, 7)");
        assert_eq!(code.lines()[3], r#"dll.update_value("x", "y")"#);
    }

    #[test]
    fn test_regenerates_identically() {
        let log = log(vec![
            OperationDraft::new("push").value("1"),
            OperationDraft::new("pop"),
        ]);
        let first = generate(StructureKind::Stack, log.operations());
        let second = generate(StructureKind::Stack, log.operations());
        assert_eq!(first, second);
        assert_eq!(first.text(), "stack = Stack()\nstack.push(1)\nstack.pop()");
    }
}
