//! Ordered operation log with stable ids

use super::{Operation, OperationDraft, OperationField, OperationId, OperationPatch};

/// Ordered list of operations.
///
/// Ids come from a counter owned by the log; they start at 1, increase by one
/// per append and are never handed out twice, not even after [`clear`].
/// Everything except [`reorder`] is keyed by id.
///
/// [`clear`]: OperationLog::clear
/// [`reorder`]: OperationLog::reorder
#[derive(Debug, Clone)]
pub struct OperationLog {
    operations: Vec<Operation>,
    next_id: u64,
}

impl OperationLog {
    pub fn new() -> Self {
        OperationLog {
            operations: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a raw operation, returning its freshly assigned id
    pub fn append(&mut self, draft: OperationDraft) -> OperationId {
        let id = OperationId(self.next_id);
        self.next_id += 1;
        self.operations.push(Operation::from_draft(id, draft));
        id
    }

    /// Apply a partial update; returns false if no operation has this id
    pub fn update(&mut self, id: OperationId, patch: OperationPatch) -> bool {
        match self.operations.iter_mut().find(|op| op.id == id) {
            Some(op) => {
                patch.apply_to(op);
                true
            }
            None => false,
        }
    }

    /// Route a `(id, field, newValue)` edit event
    pub fn update_field(&mut self, id: OperationId, field: OperationField, value: &str) -> bool {
        let value = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        self.update(id, OperationPatch::field(field, value))
    }

    pub fn remove(&mut self, id: OperationId) -> Option<Operation> {
        let index = self.index_of(id)?;
        Some(self.operations.remove(index))
    }

    /// Move the operation at `from` so it ends up at `to`.
    ///
    /// Ids are untouched.  Out-of-range indices leave the log as it was.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.operations.len() || to >= self.operations.len() {
            return false;
        }
        let op = self.operations.remove(from);
        self.operations.insert(to, op);
        true
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn get(&self, id: OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn index_of(&self, id: OperationId) -> Option<usize> {
        self.operations.iter().position(|op| op.id == id)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a OperationLog {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;

    fn push(value: &str) -> OperationDraft {
        OperationDraft::new("push").value(value)
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut log = OperationLog::new();
        let a = log.append(push("1"));
        let b = log.append(push("2"));
        assert_eq!((a, b), (OperationId(1), OperationId(2)));

        log.remove(b);
        log.clear();
        let c = log.append(push("3"));
        assert_eq!(c, OperationId(3));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut log = OperationLog::new();
        let a = log.append(push("1"));
        let b = log.append(push("2"));

        assert!(log.update_field(a, OperationField::Value, "10"));
        assert_eq!(log.operations()[0].id, a);
        assert_eq!(log.operations()[0].value.as_deref(), Some("10"));
        assert_eq!(log.operations()[1].id, b);

        assert!(log.update_field(b, OperationField::Value, ""));
        assert_eq!(log.get(b).and_then(|op| op.value.clone()), None);

        assert!(!log.update_field(OperationId(99), OperationField::Value, "x"));
    }

    #[test]
    fn test_reorder_moves_without_renumbering() {
        let mut log = OperationLog::new();
        let ids: Vec<_> = ["a", "b", "c"].iter().map(|v| log.append(push(v))).collect();

        assert!(log.reorder(0, 2));
        let order: Vec<_> = log.iter().map(|op| op.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);

        assert!(!log.reorder(0, 3));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_append_is_verbatim() {
        let mut log = OperationLog::new();
        let id = log.append(OperationDraft::new("insert"));
        let op = log.get(id).expect("operation should exist");
        assert_eq!(op.kind, OperationKind::Insert);
        assert_eq!(op.value, None);
    }
}
