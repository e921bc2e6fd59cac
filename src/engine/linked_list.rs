//! Singly and doubly linked list engine
//!
//! Both variants store their values in order; the doubly flag changes which
//! pointers a step touches and whether the engine may walk from the tail.
//! A singly list has no tail pointer, so appending walks the whole list.
//!
//! Positions are clamped: inserts into `[0, length]`, deletes into
//! `[0, length - 1]`.  Search and update by position do not clamp; an
//! out-of-range position is reported as not found.

use super::{clamp_position, Outcome, Snapshot, Step, StepSink, StructureKind};
use crate::error::EngineError;
use crate::operation::{Operation, OperationKind};

/// Positional id used for `affected_node`; matches [`crate::layout`]
pub fn node_id(index: usize) -> String {
    format!("node-{}", index)
}

struct List {
    values: Vec<String>,
    doubly: bool,
}

impl List {
    fn kind(&self) -> StructureKind {
        if self.doubly {
            StructureKind::DoublyLinkedList
        } else {
            StructureKind::SinglyLinkedList
        }
    }

    fn frame(&self) -> Snapshot {
        let values = self.values.clone();
        if self.doubly {
            Snapshot::DoublyLinkedList(values)
        } else {
            Snapshot::SinglyLinkedList(values)
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    /// Emit one visit per node in `indices`, accumulating the path
    fn walk(
        &self,
        indices: impl Iterator<Item = usize>,
        code_line: &str,
        sink: &mut StepSink,
    ) -> Vec<String> {
        let mut path = Vec::new();
        for index in indices {
            let value = &self.values[index];
            path.push(value.clone());
            sink.emit(
                Step::visit(format!("Walk to {} at position {}", value, index), code_line)
                    .affecting(node_id(index))
                    .with_path(&path),
                self.frame(),
            );
        }
        path
    }

    fn announce_new_node(&self, value: &str, sink: &mut StepSink) {
        sink.emit(
            Step::info(format!("Create a node holding {}", value), "new_node = Node(value)"),
            self.frame(),
        );
    }

    fn empty_step(&self, action: &str, sink: &mut StepSink) {
        sink.emit(
            Step::not_found(
                format!("List is empty: nothing to {}", action),
                "if head is None: return",
            ),
            self.frame(),
        );
    }

    // ========== Insertion ==========

    fn insert_beginning(&mut self, value: &str, sink: &mut StepSink) {
        self.announce_new_node(value, sink);
        let old_head = self.values.first().cloned();
        self.values.insert(0, value.to_string());

        if let Some(old_head) = old_head {
            sink.emit(
                Step::mutate(
                    format!("Point the new node at the old head {}", old_head),
                    "new_node.next = head",
                )
                .affecting(node_id(0)),
                self.frame(),
            );
            if self.doubly {
                sink.emit(
                    Step::mutate(
                        format!("Link {} back to the new node", old_head),
                        "head.prev = new_node",
                    )
                    .affecting(node_id(1)),
                    self.frame(),
                );
            }
        }

        let code_line = if self.doubly && self.len() == 1 {
            "head = tail = new_node"
        } else {
            "head = new_node"
        };
        sink.emit(
            Step::mutate(format!("{} is the new head", value), code_line).affecting(node_id(0)),
            self.frame(),
        );
    }

    fn insert_end(&mut self, value: &str, sink: &mut StepSink) {
        if self.values.is_empty() {
            self.insert_beginning(value, sink);
            return;
        }

        self.announce_new_node(value, sink);
        let last = self.len() - 1;
        if self.doubly {
            sink.emit(
                Step::visit(format!("Jump to the tail {}", self.values[last]), "current = tail")
                    .affecting(node_id(last)),
                self.frame(),
            );
        } else {
            self.walk(0..=last, "while current.next: current = current.next", sink);
        }

        let old_tail = self.values[last].clone();
        self.values.push(value.to_string());
        let new_index = self.len() - 1;
        sink.emit(
            Step::mutate(
                format!("Link {} to the new node", old_tail),
                "current.next = new_node",
            )
            .affecting(node_id(new_index)),
            self.frame(),
        );
        if self.doubly {
            sink.emit(
                Step::mutate(
                    format!("Link the new node back to {}", old_tail),
                    "new_node.prev = tail",
                )
                .affecting(node_id(new_index)),
                self.frame(),
            );
            sink.emit(
                Step::mutate(format!("{} is the new tail", value), "tail = new_node")
                    .affecting(node_id(new_index)),
                self.frame(),
            );
        }
    }

    fn insert_position(&mut self, value: &str, position: i64, sink: &mut StepSink) {
        let position = clamp_position(position, self.len());
        if position == 0 {
            return self.insert_beginning(value, sink);
        }
        if position == self.len() {
            return self.insert_end(value, sink);
        }

        self.announce_new_node(value, sink);
        self.walk(
            0..position,
            "for _ in range(position - 1): current = current.next",
            sink,
        );
        let previous = self.values[position - 1].clone();
        let next = self.values[position].clone();
        self.values.insert(position, value.to_string());
        sink.emit(
            Step::mutate(
                format!("Splice the new node between {} and {}", previous, next),
                "new_node.next = current.next; current.next = new_node",
            )
            .affecting(node_id(position)),
            self.frame(),
        );
        if self.doubly {
            sink.emit(
                Step::mutate(
                    format!("Link {} back to the new node", next),
                    "new_node.prev = current; new_node.next.prev = new_node",
                )
                .affecting(node_id(position + 1)),
                self.frame(),
            );
        }
    }

    /// Insert so the new node sits immediately before the node at `position`,
    /// walking back from the tail
    fn insert_before_position(&mut self, value: &str, position: i64, sink: &mut StepSink) {
        let position = clamp_position(position, self.len());
        if position == 0 {
            return self.insert_beginning(value, sink);
        }
        if position == self.len() {
            return self.insert_end(value, sink);
        }

        self.announce_new_node(value, sink);
        self.walk(
            (position..self.len()).rev(),
            "while index > position: current = current.prev",
            sink,
        );
        let anchor = self.values[position].clone();
        let previous = self.values[position - 1].clone();
        self.values.insert(position, value.to_string());
        sink.emit(
            Step::mutate(
                format!("Point the new node at {} and {}", previous, anchor),
                "new_node.prev = current.prev; new_node.next = current",
            )
            .affecting(node_id(position)),
            self.frame(),
        );
        sink.emit(
            Step::mutate(
                format!("Link {} and {} to the new node", previous, anchor),
                "current.prev.next = new_node; current.prev = new_node",
            )
            .affecting(node_id(position)),
            self.frame(),
        );
    }

    // ========== Deletion ==========

    fn delete_beginning(&mut self, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("delete", sink);
        }
        let removed = self.values.remove(0);
        let description = match self.values.first() {
            Some(next) => format!("Remove head {}; {} is the new head", removed, next),
            None => format!("Remove {}; the list is now empty", removed),
        };
        sink.emit(
            Step::mutate(description, "head = head.next").affecting(node_id(0)),
            self.frame(),
        );
        if self.doubly && !self.values.is_empty() {
            sink.emit(
                Step::mutate("Clear the new head's back link", "head.prev = None")
                    .affecting(node_id(0)),
                self.frame(),
            );
        }
    }

    fn delete_end(&mut self, sink: &mut StepSink) {
        if self.len() <= 1 {
            return self.delete_beginning(sink);
        }
        let last = self.len() - 1;
        if self.doubly {
            sink.emit(
                Step::visit(format!("Jump to the tail {}", self.values[last]), "current = tail")
                    .affecting(node_id(last)),
                self.frame(),
            );
        } else {
            self.walk(
                0..last,
                "while current.next.next: current = current.next",
                sink,
            );
        }
        let removed = self.values.pop().unwrap_or_default();
        let new_tail = last - 1;
        let code_line = if self.doubly {
            "tail = tail.prev; tail.next = None"
        } else {
            "current.next = None"
        };
        sink.emit(
            Step::mutate(
                format!("Unlink tail {}; {} is the new tail", removed, self.values[new_tail]),
                code_line,
            )
            .affecting(node_id(new_tail)),
            self.frame(),
        );
    }

    fn unlink_at(&mut self, index: usize, code_line: &str, sink: &mut StepSink) {
        let removed = self.values.remove(index);
        sink.emit(
            Step::mutate(
                format!("Unlink {} at position {}", removed, index),
                code_line,
            )
            .affecting(node_id(index)),
            self.frame(),
        );
        if self.doubly {
            sink.emit(
                Step::mutate(
                    format!(
                        "Link {} back to {}",
                        self.values[index],
                        self.values[index - 1]
                    ),
                    "current.next.prev = current",
                )
                .affecting(node_id(index)),
                self.frame(),
            );
        }
    }

    fn delete_position(&mut self, position: i64, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("delete", sink);
        }
        let position = clamp_position(position, self.len() - 1);
        if position == 0 {
            return self.delete_beginning(sink);
        }
        if position == self.len() - 1 {
            return self.delete_end(sink);
        }
        self.walk(
            0..position,
            "for _ in range(position - 1): current = current.next",
            sink,
        );
        self.unlink_at(position, "current.next = current.next.next", sink);
    }

    /// Delete the node immediately before `position`, walking back from the tail
    fn delete_before_position(&mut self, position: i64, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("delete", sink);
        }
        let position = clamp_position(position, self.len());
        if position == 0 {
            sink.emit(
                Step::not_found("No node before the head", "if current.prev is None: return")
                    .affecting(node_id(0)),
                self.frame(),
            );
            return;
        }
        let target = position - 1;
        if target == 0 {
            return self.delete_beginning(sink);
        }
        if target == self.len() - 1 {
            return self.delete_end(sink);
        }
        self.walk(
            (position..self.len()).rev(),
            "while index > position: current = current.prev",
            sink,
        );
        self.unlink_at(
            target,
            "current.prev = current.prev.prev; current.prev.next = current",
            sink,
        );
    }

    fn delete_value(&mut self, value: &str, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("delete", sink);
        }
        match self.find_value(value, "current.value == value", sink) {
            Some(0) => self.delete_beginning(sink),
            Some(index) if index == self.len() - 1 => {
                let removed = self.values.pop().unwrap_or_default();
                sink.emit(
                    Step::mutate(
                        format!("Unlink tail {}", removed),
                        if self.doubly {
                            "tail = tail.prev; tail.next = None"
                        } else {
                            "prev.next = None"
                        },
                    )
                    .affecting(node_id(index)),
                    self.frame(),
                );
            }
            Some(index) => self.unlink_at(index, "prev.next = current.next", sink),
            None => sink.emit(
                Step::not_found(format!("{} is not in the list", value), "return"),
                self.frame(),
            ),
        }
    }

    /// Compare each node with `value` until the first match
    fn find_value(&self, value: &str, code_line: &str, sink: &mut StepSink) -> Option<usize> {
        let mut path = Vec::new();
        for (index, current) in self.values.iter().enumerate() {
            path.push(current.clone());
            let description = if current == value {
                format!("{} matches at position {}", current, index)
            } else {
                format!("{} is not {}: move on", current, value)
            };
            sink.emit(
                Step::compare(description, code_line)
                    .affecting(node_id(index))
                    .with_path(&path),
                self.frame(),
            );
            if current == value {
                return Some(index);
            }
        }
        None
    }

    // ========== Read-only and updates ==========

    fn search_value(&self, value: &str, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("search", sink);
        }
        if self.find_value(value, "if current.value == value: return index", sink).is_none() {
            sink.emit(
                Step::not_found(format!("{} not found", value), "return -1"),
                self.frame(),
            );
        }
    }

    fn checked_index(&self, position: i64, sink: &mut StepSink) -> Option<usize> {
        if position >= 0 && (position as u64) < self.len() as u64 {
            return Some(position as usize);
        }
        sink.emit(
            Step::not_found(
                format!(
                    "Position {} is out of range for a list of length {}",
                    position,
                    self.len()
                ),
                "if position < 0 or position >= length: return None",
            ),
            self.frame(),
        );
        None
    }

    fn search_position(&self, position: i64, sink: &mut StepSink) {
        let Some(position) = self.checked_index(position, sink) else {
            return;
        };
        let mut path = self.walk(0..position, "current = current.next", sink);
        let value = &self.values[position];
        path.push(value.clone());
        sink.emit(
            Step::info(format!("Position {} holds {}", position, value), "return current")
                .affecting(node_id(position))
                .with_path(&path),
            self.frame(),
        );
    }

    fn update_value(&mut self, value: &str, new_value: &str, sink: &mut StepSink) {
        if self.values.is_empty() {
            return self.empty_step("update", sink);
        }
        match self.find_value(value, "if current.value == value:", sink) {
            Some(index) => {
                self.values[index] = new_value.to_string();
                sink.emit(
                    Step::mutate(
                        format!("Replace {} with {}", value, new_value),
                        "current.value = new_value",
                    )
                    .affecting(node_id(index)),
                    self.frame(),
                );
            }
            None => sink.emit(
                Step::not_found(format!("{} is not in the list", value), "return"),
                self.frame(),
            ),
        }
    }

    fn update_position(&mut self, position: i64, new_value: &str, sink: &mut StepSink) {
        let Some(position) = self.checked_index(position, sink) else {
            return;
        };
        self.walk(0..position, "current = current.next", sink);
        let old = std::mem::replace(&mut self.values[position], new_value.to_string());
        sink.emit(
            Step::mutate(
                format!("Replace {} at position {} with {}", old, position, new_value),
                "current.value = new_value",
            )
            .affecting(node_id(position)),
            self.frame(),
        );
    }

    fn traverse(&self, backward: bool, sink: &mut StepSink) {
        if self.values.is_empty() {
            sink.emit(
                Step::info("List is empty: nothing to traverse", "while current: ..."),
                self.frame(),
            );
            return;
        }
        if backward {
            self.walk(
                (0..self.len()).rev(),
                "current = tail; while current: visit(current); current = current.prev",
                sink,
            );
        } else {
            self.walk(
                0..self.len(),
                "current = head; while current: visit(current); current = current.next",
                sink,
            );
        }
    }

    fn size(&self, sink: &mut StepSink) {
        sink.emit(
            Step::info(format!("Length is {}", self.len()), "return length"),
            self.frame(),
        );
    }

    fn is_empty(&self, sink: &mut StepSink) {
        sink.emit(
            Step::info(
                format!("is_empty() is {}", self.values.is_empty()),
                "return head is None",
            ),
            self.frame(),
        );
    }

    fn clear(&mut self, sink: &mut StepSink) {
        self.values.clear();
        let code_line = if self.doubly {
            "head = tail = None"
        } else {
            "head = None"
        };
        sink.emit(Step::mutate("Remove every node", code_line), self.frame());
    }
}

/// Apply one operation to a linked list
pub fn apply(
    op: &Operation,
    values: &[String],
    doubly: bool,
    sink: &mut StepSink,
) -> Result<Outcome<Vec<String>>, EngineError> {
    let mut list = List {
        values: values.to_vec(),
        doubly,
    };

    match &op.kind {
        OperationKind::InsertBeginning => {
            list.insert_beginning(require!(op.required_value()), sink)
        }
        OperationKind::InsertEnd => list.insert_end(require!(op.required_value()), sink),
        OperationKind::InsertPosition => {
            let value = require!(op.required_value());
            let position = require!(op.required_position());
            list.insert_position(value, position, sink);
        }
        OperationKind::InsertBeforePosition if doubly => {
            let value = require!(op.required_value());
            let position = require!(op.required_position());
            list.insert_before_position(value, position, sink);
        }
        OperationKind::DeleteBeginning => list.delete_beginning(sink),
        OperationKind::DeleteEnd => list.delete_end(sink),
        OperationKind::DeletePosition => {
            list.delete_position(require!(op.required_position()), sink)
        }
        OperationKind::DeleteBeforePosition if doubly => {
            list.delete_before_position(require!(op.required_position()), sink)
        }
        OperationKind::DeleteValue => list.delete_value(require!(op.required_value()), sink),
        OperationKind::SearchValue | OperationKind::Search => {
            list.search_value(require!(op.required_value()), sink)
        }
        OperationKind::SearchPosition => {
            list.search_position(require!(op.required_position()), sink)
        }
        OperationKind::UpdateValue => {
            let value = require!(op.required_value());
            let new_value = require!(op.required_new_value());
            list.update_value(value, new_value, sink);
        }
        OperationKind::UpdatePosition => {
            let position = require!(op.required_position());
            let new_value = require!(op.required_new_value());
            list.update_position(position, new_value, sink);
        }
        OperationKind::Traverse => list.traverse(false, sink),
        OperationKind::TraverseBackward if doubly => list.traverse(true, sink),
        OperationKind::Size => list.size(sink),
        OperationKind::IsEmpty => list.is_empty(sink),
        OperationKind::Clear => list.clear(sink),
        other => {
            return Err(EngineError::UnsupportedOperation {
                kind: other.clone(),
                structure: list.kind(),
            })
        }
    }
    Ok(Outcome::Applied(list.values))
}
