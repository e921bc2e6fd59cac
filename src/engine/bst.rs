//! Binary search tree engine
//!
//! Nodes live in an index arena ([`BstTree`]); children are slot indices.
//! Removing a node tombstones its slot instead of shifting the arena, so
//! indices held by a caller stay meaningful for the lifetime of a snapshot.
//!
//! Values are kept as the user typed them (trimmed) and ordered by their
//! numeric parse.  Equal keys are never stored twice.

use super::{Outcome, Snapshot, Step, StepSink, StructureKind};
use crate::error::{EngineError, ValidationError};
use crate::operation::{Operation, OperationKind};
use serde::ser::{Error as _, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// A tree node stored in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct BstNode {
    pub id: String,
    pub value: String,
    key: f64,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl BstNode {
    /// Numeric ordering key
    pub fn key(&self) -> f64 {
        self.key
    }
}

/// Arena-backed binary search tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BstTree {
    slots: Vec<Option<BstNode>>,
    root: Option<usize>,
    next_id: u64,
}

/// Where a subtree hangs from
#[derive(Debug, Clone, Copy)]
enum Link {
    Root,
    Left(usize),
    Right(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    In,
    Pre,
    Post,
    Level,
}

impl BstTree {
    pub fn new() -> Self {
        BstTree::default()
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn node(&self, index: usize) -> Option<&BstNode> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes reachable from the root
    pub fn size(&self) -> usize {
        self.in_order().len()
    }

    /// Number of levels; an empty tree has height 0
    pub fn height(&self) -> usize {
        self.height_from(self.root)
    }

    fn height_from(&self, at: Option<usize>) -> usize {
        match at.and_then(|index| self.node(index)) {
            Some(node) => 1 + self.height_from(node.left).max(self.height_from(node.right)),
            None => 0,
        }
    }

    /// Nodes in ascending key order
    pub fn in_order(&self) -> Vec<&BstNode> {
        self.collect(Order::In)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|index| self.node(index))
            .collect()
    }

    pub fn values_in_order(&self) -> Vec<String> {
        self.in_order().into_iter().map(|n| n.value.clone()).collect()
    }

    pub fn min_node(&self) -> Option<&BstNode> {
        let mut node = self.node(self.root?)?;
        while let Some(left) = node.left.and_then(|i| self.node(i)) {
            node = left;
        }
        Some(node)
    }

    pub fn max_node(&self) -> Option<&BstNode> {
        let mut node = self.node(self.root?)?;
        while let Some(right) = node.right.and_then(|i| self.node(i)) {
            node = right;
        }
        Some(node)
    }

    /// Check the ordering invariant over the whole tree
    pub fn is_ordered(&self) -> bool {
        let keys: Vec<f64> = self.in_order().iter().map(|n| n.key).collect();
        keys.windows(2).all(|pair| pair[0] < pair[1])
    }

    fn get(&self, index: usize) -> Result<&BstNode, EngineError> {
        self.node(index).ok_or(EngineError::DanglingNode { index })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut BstNode, EngineError> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(EngineError::DanglingNode { index })
    }

    fn alloc(&mut self, key: f64, value: &str) -> usize {
        self.next_id += 1;
        self.slots.push(Some(BstNode {
            id: format!("node-{}", self.next_id),
            value: value.to_string(),
            key,
            left: None,
            right: None,
        }));
        self.slots.len() - 1
    }

    fn set_link(&mut self, link: Link, child: Option<usize>) -> Result<(), EngineError> {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.get_mut(parent)?.left = child,
            Link::Right(parent) => self.get_mut(parent)?.right = child,
        }
        Ok(())
    }

    fn frame(&self) -> Snapshot {
        Snapshot::Bst(self.clone())
    }

    fn collect(&self, order: Order) -> Result<Vec<usize>, EngineError> {
        let mut out = Vec::new();
        if order == Order::Level {
            let mut queue: VecDeque<usize> = self.root.into_iter().collect();
            while let Some(index) = queue.pop_front() {
                let node = self.get(index)?;
                out.push(index);
                queue.extend(node.left);
                queue.extend(node.right);
            }
        } else {
            self.collect_from(self.root, order, &mut out)?;
        }
        Ok(out)
    }

    fn collect_from(
        &self,
        at: Option<usize>,
        order: Order,
        out: &mut Vec<usize>,
    ) -> Result<(), EngineError> {
        let Some(index) = at else {
            return Ok(());
        };
        let node = self.get(index)?;
        if order == Order::Pre {
            out.push(index);
        }
        self.collect_from(node.left, order, out)?;
        if order == Order::In {
            out.push(index);
        }
        self.collect_from(node.right, order, out)?;
        if order == Order::Post {
            out.push(index);
        }
        Ok(())
    }

    // ========== Operations ==========

    fn insert(&mut self, key: f64, value: &str, sink: &mut StepSink) -> Result<(), EngineError> {
        let mut path = Vec::new();
        self.insert_at(self.root, Link::Root, key, value, &mut path, sink)
    }

    fn insert_at(
        &mut self,
        at: Option<usize>,
        link: Link,
        key: f64,
        value: &str,
        path: &mut Vec<String>,
        sink: &mut StepSink,
    ) -> Result<(), EngineError> {
        let Some(index) = at else {
            let new_index = self.alloc(key, value);
            self.set_link(link, Some(new_index))?;
            let node_id = self.get(new_index)?.id.clone();
            path.push(value.to_string());
            let description = match link {
                Link::Root => format!("Tree is empty: {} becomes the root", value),
                Link::Left(parent) => {
                    format!("Place {} as the left child of {}", value, self.get(parent)?.value)
                }
                Link::Right(parent) => {
                    format!("Place {} as the right child of {}", value, self.get(parent)?.value)
                }
            };
            sink.emit(
                Step::mutate(description, "if node is None: return Node(value)")
                    .affecting(node_id)
                    .with_path(path),
                self.frame(),
            );
            return Ok(());
        };

        let node = self.get(index)?;
        let (node_key, node_value, node_id) = (node.key, node.value.clone(), node.id.clone());
        let (left, right) = (node.left, node.right);
        path.push(node_value.clone());

        if key < node_key {
            sink.emit(
                Step::compare(
                    format!("{} < {}: go left", value, node_value),
                    "if value < node.value: node.left = insert(node.left, value)",
                )
                .affecting(node_id)
                .with_path(path),
                self.frame(),
            );
            self.insert_at(left, Link::Left(index), key, value, path, sink)
        } else if key > node_key {
            sink.emit(
                Step::compare(
                    format!("{} > {}: go right", value, node_value),
                    "elif value > node.value: node.right = insert(node.right, value)",
                )
                .affecting(node_id)
                .with_path(path),
                self.frame(),
            );
            self.insert_at(right, Link::Right(index), key, value, path, sink)
        } else {
            sink.emit(
                Step::compare(
                    format!("{} is already in the tree; duplicates are ignored", value),
                    "else: return node",
                )
                .affecting(node_id)
                .with_path(path),
                self.frame(),
            );
            Ok(())
        }
    }

    fn delete(&mut self, key: f64, value: &str, sink: &mut StepSink) -> Result<(), EngineError> {
        let mut path = Vec::new();
        self.delete_at(self.root, Link::Root, key, value, &mut path, sink)
    }

    fn delete_at(
        &mut self,
        at: Option<usize>,
        link: Link,
        key: f64,
        value: &str,
        path: &mut Vec<String>,
        sink: &mut StepSink,
    ) -> Result<(), EngineError> {
        let Some(index) = at else {
            sink.emit(
                Step::not_found(
                    format!("{} not found in the tree", value),
                    "if node is None: return None",
                )
                .with_path(path),
                self.frame(),
            );
            return Ok(());
        };

        let node = self.get(index)?;
        let (node_key, node_value, node_id) = (node.key, node.value.clone(), node.id.clone());
        let (left, right) = (node.left, node.right);
        path.push(node_value.clone());

        if key < node_key {
            sink.emit(
                Step::compare(
                    format!("{} < {}: go left", value, node_value),
                    "if value < node.value: node.left = delete(node.left, value)",
                )
                .affecting(node_id)
                .with_path(path),
                self.frame(),
            );
            return self.delete_at(left, Link::Left(index), key, value, path, sink);
        }
        if key > node_key {
            sink.emit(
                Step::compare(
                    format!("{} > {}: go right", value, node_value),
                    "elif value > node.value: node.right = delete(node.right, value)",
                )
                .affecting(node_id)
                .with_path(path),
                self.frame(),
            );
            return self.delete_at(right, Link::Right(index), key, value, path, sink);
        }

        match (left, right) {
            (Some(_), Some(right_index)) => {
                sink.emit(
                    Step::info(
                        format!("{} has two children: find its in-order successor", node_value),
                        "successor = min_node(node.right)",
                    )
                    .affecting(node_id.clone())
                    .with_path(path),
                    self.frame(),
                );

                let mut successor = right_index;
                let first = self.get(successor)?;
                let mut hops = vec![first.value.clone()];
                sink.emit(
                    Step::visit(
                        format!("Move to the right subtree at {}", first.value),
                        "current = node.right",
                    )
                    .affecting(first.id.clone())
                    .with_path(&hops),
                    self.frame(),
                );
                while let Some(next) = self.get(successor)?.left {
                    let next_node = self.get(next)?;
                    hops.push(next_node.value.clone());
                    sink.emit(
                        Step::visit(
                            format!("Move left to {}", next_node.value),
                            "while current.left: current = current.left",
                        )
                        .affecting(next_node.id.clone())
                        .with_path(&hops),
                        self.frame(),
                    );
                    successor = next;
                }

                let succ = self.get(successor)?;
                let (succ_key, succ_value) = (succ.key, succ.value.clone());
                let target = self.get_mut(index)?;
                target.key = succ_key;
                target.value = succ_value.clone();
                sink.emit(
                    Step::mutate(
                        format!("Copy successor {} into the node holding {}", succ_value, node_value),
                        "node.value = successor.value",
                    )
                    .affecting(node_id)
                    .with_path(path),
                    self.frame(),
                );

                let mut succ_path = Vec::new();
                self.delete_at(
                    Some(right_index),
                    Link::Right(index),
                    succ_key,
                    &succ_value,
                    &mut succ_path,
                    sink,
                )
            }
            (child_left, child_right) => {
                let child = child_left.or(child_right);
                self.set_link(link, child)?;
                self.slots[index] = None;
                let (description, code_line) = match child {
                    None => (
                        format!("{} is a leaf: remove it", node_value),
                        "if node.left is None and node.right is None: return None",
                    ),
                    Some(child_index) => {
                        let child_value = &self.get(child_index)?.value;
                        let code_line = if child_left.is_some() {
                            "if node.right is None: return node.left"
                        } else {
                            "if node.left is None: return node.right"
                        };
                        (
                            format!(
                                "{} has one child: replace it with {}",
                                node_value, child_value
                            ),
                            code_line,
                        )
                    }
                };
                sink.emit(
                    Step::mutate(description, code_line)
                        .affecting(node_id)
                        .with_path(path),
                    self.frame(),
                );
                Ok(())
            }
        }
    }

    fn search(&self, key: f64, value: &str, sink: &mut StepSink) -> Result<(), EngineError> {
        let mut path = Vec::new();
        let mut at = self.root;
        while let Some(index) = at {
            let node = self.get(index)?;
            path.push(node.value.clone());
            if key < node.key {
                sink.emit(
                    Step::compare(
                        format!("{} < {}: search left", value, node.value),
                        "if value < node.value: node = node.left",
                    )
                    .affecting(node.id.clone())
                    .with_path(&path),
                    self.frame(),
                );
                at = node.left;
            } else if key > node.key {
                sink.emit(
                    Step::compare(
                        format!("{} > {}: search right", value, node.value),
                        "elif value > node.value: node = node.right",
                    )
                    .affecting(node.id.clone())
                    .with_path(&path),
                    self.frame(),
                );
                at = node.right;
            } else {
                sink.emit(
                    Step::info(format!("Found {}", node.value), "else: return node")
                        .affecting(node.id.clone())
                        .with_path(&path),
                    self.frame(),
                );
                return Ok(());
            }
        }
        sink.emit(
            Step::not_found(
                format!("{} not found in the tree", value),
                "return None",
            )
            .with_path(&path),
            self.frame(),
        );
        Ok(())
    }

    fn traverse(&self, order: Order, sink: &mut StepSink) -> Result<(), EngineError> {
        let (name, code_line) = match order {
            Order::In => ("In-order", "inorder(node.left); visit(node); inorder(node.right)"),
            Order::Pre => ("Pre-order", "visit(node); preorder(node.left); preorder(node.right)"),
            Order::Post => (
                "Post-order",
                "postorder(node.left); postorder(node.right); visit(node)",
            ),
            Order::Level => ("Level-order", "node = queue.popleft(); visit(node)"),
        };

        if self.is_empty() {
            sink.emit(
                Step::info(
                    format!("{} traversal: tree is empty", name),
                    "if node is None: return",
                ),
                self.frame(),
            );
            return Ok(());
        }

        let mut visited = Vec::new();
        for index in self.collect(order)? {
            let node = self.get(index)?;
            visited.push(node.value.clone());
            sink.emit(
                Step::visit(format!("{} traversal: visit {}", name, node.value), code_line)
                    .affecting(node.id.clone())
                    .with_path(&visited),
                self.frame(),
            );
        }
        Ok(())
    }

    fn find_extreme(&self, find_min: bool, sink: &mut StepSink) -> Result<(), EngineError> {
        let label = if find_min { "Minimum" } else { "Maximum" };
        let Some(root) = self.root else {
            sink.emit(
                Step::not_found(
                    format!("{} not found: tree is empty", label),
                    "if root is None: return None",
                ),
                self.frame(),
            );
            return Ok(());
        };

        let mut node = self.get(root)?;
        let mut path = vec![node.value.clone()];
        loop {
            let next = if find_min { node.left } else { node.right };
            let Some(next_index) = next else {
                break;
            };
            let next_node = self.get(next_index)?;
            path.push(next_node.value.clone());
            let (description, code_line) = if find_min {
                (
                    format!("{} has a left child: move to {}", node.value, next_node.value),
                    "while node.left: node = node.left",
                )
            } else {
                (
                    format!("{} has a right child: move to {}", node.value, next_node.value),
                    "while node.right: node = node.right",
                )
            };
            sink.emit(
                Step::visit(description, code_line)
                    .affecting(next_node.id.clone())
                    .with_path(&path),
                self.frame(),
            );
            node = next_node;
        }

        sink.emit(
            Step::info(format!("{} is {}", label, node.value), "return node")
                .affecting(node.id.clone())
                .with_path(&path),
            self.frame(),
        );
        Ok(())
    }

    fn clear(&mut self, sink: &mut StepSink) {
        self.slots.clear();
        self.root = None;
        sink.emit(Step::mutate("Remove every node", "root = None"), self.frame());
    }
}

fn parse_key(raw: &str) -> Result<f64, ValidationError> {
    raw.parse::<f64>()
        .ok()
        .filter(|key| key.is_finite())
        .ok_or_else(|| ValidationError::NonNumericValue {
            value: raw.to_string(),
        })
}

/// Apply one operation to a tree
pub fn apply(
    op: &Operation,
    tree: &BstTree,
    sink: &mut StepSink,
) -> Result<Outcome<BstTree>, EngineError> {
    let mut tree = tree.clone();
    match &op.kind {
        OperationKind::Insert => {
            let value = require!(op.required_value());
            let key = require!(parse_key(value));
            tree.insert(key, value, sink)?;
        }
        OperationKind::Delete => {
            let value = require!(op.required_value());
            let key = require!(parse_key(value));
            tree.delete(key, value, sink)?;
        }
        OperationKind::Search | OperationKind::SearchValue => {
            let value = require!(op.required_value());
            let key = require!(parse_key(value));
            tree.search(key, value, sink)?;
        }
        OperationKind::TraverseInorder => tree.traverse(Order::In, sink)?,
        OperationKind::TraversePreorder => tree.traverse(Order::Pre, sink)?,
        OperationKind::TraversePostorder => tree.traverse(Order::Post, sink)?,
        OperationKind::TraverseLevelorder => tree.traverse(Order::Level, sink)?,
        OperationKind::FindMin => tree.find_extreme(true, sink)?,
        OperationKind::FindMax => tree.find_extreme(false, sink)?,
        OperationKind::Clear => tree.clear(sink),
        other => {
            return Err(EngineError::UnsupportedOperation {
                kind: other.clone(),
                structure: StructureKind::Bst,
            })
        }
    }
    Ok(Outcome::Applied(tree))
}

// Serialized as the nested `{ root: { value, left, right, id } }` shape so
// trace dumps read like the tree rather than the arena.
impl Serialize for BstTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BstTree", 1)?;
        let root = self.root.map(|index| NodeView { tree: self, index });
        state.serialize_field("root", &root)?;
        state.end()
    }
}

struct NodeView<'a> {
    tree: &'a BstTree,
    index: usize,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self
            .tree
            .node(self.index)
            .ok_or_else(|| S::Error::custom(format!("dangling tree slot {}", self.index)))?;
        let child = |index: Option<usize>| index.map(|index| NodeView { tree: self.tree, index });
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("value", &node.value)?;
        state.serialize_field("left", &child(node.left))?;
        state.serialize_field("right", &child(node.right))?;
        state.serialize_field("id", &node.id)?;
        state.end()
    }
}
