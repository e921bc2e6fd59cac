//! Layout engine: 2-D coordinates for a snapshot
//!
//! Trees are placed by a pre-order walk.  The root sits at `x = 0`, each
//! level is `level_height` further down and a child is offset from its
//! parent by `node_width * decay_factor^(level + 1)`, where `level` is the
//! parent's depth.  Deeper levels compress so siblings rarely collide, but
//! nothing guarantees it: a dense tree can still overlap.
//!
//! Lists and queues are a horizontal row at `list_pitch` spacing, stacks a
//! vertical column with the top element uppermost.  Node ids match the
//! `affected_node` ids the engines emit.
//!
//! Coordinates are abstract units with `y` growing downward.

use crate::config::LayoutConfig;
use crate::engine::linked_list::node_id;
use crate::engine::{BstTree, Snapshot, StructureKind};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub value: String,
    pub center: Point,
    pub level: usize,
}

/// A line between two node boundaries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub from_id: String,
    pub to_id: String,
    pub start: Point,
    pub end: Point,
    /// Direction from `from` to `to`, radians
    pub angle: f64,
    /// Back link of a doubly linked list
    pub back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureLayout {
    pub nodes: Vec<PositionedNode>,
    pub connectors: Vec<Connector>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl StructureLayout {
    fn push_node(&mut self, node: PositionedNode) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(|node| node.center)
    }

    /// Box around every node center, grown by `margin` on each side
    pub fn bounds(&self, margin: f64) -> Option<Bounds> {
        let first = self.nodes.first()?.center;
        let (mut min, mut max) = (first, first);
        for node in &self.nodes {
            min.x = min.x.min(node.center.x);
            min.y = min.y.min(node.center.y);
            max.x = max.x.max(node.center.x);
            max.y = max.y.max(node.center.y);
        }
        Some(Bounds {
            min: Point::new(min.x - margin, min.y - margin),
            max: Point::new(max.x + margin, max.y + margin),
        })
    }

    fn link(&mut self, from: &str, to: &str, radius: f64, back: bool) {
        if let (Some(a), Some(b)) = (self.position(from), self.position(to)) {
            if let Some((start, end, angle)) = trim_segment(a, b, radius) {
                self.connectors.push(Connector {
                    from_id: from.to_string(),
                    to_id: to.to_string(),
                    start,
                    end,
                    angle,
                    back,
                });
            }
        }
    }
}

/// Segment from `from` to `to` shortened by `radius` at both ends.
///
/// `None` when the circles touch or overlap and no visible segment remains.
pub fn trim_segment(from: Point, to: Point, radius: f64) -> Option<(Point, Point, f64)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let distance = dx.hypot(dy);
    if distance <= 2.0 * radius || distance == 0.0 {
        return None;
    }
    let angle = dy.atan2(dx);
    let (cos, sin) = (angle.cos(), angle.sin());
    Some((
        Point::new(from.x + radius * cos, from.y + radius * sin),
        Point::new(to.x - radius * cos, to.y - radius * sin),
        angle,
    ))
}

/// Lay out any snapshot
pub fn layout(snapshot: &Snapshot, config: &LayoutConfig) -> StructureLayout {
    match snapshot {
        Snapshot::Bst(tree) => layout_tree(tree, config),
        Snapshot::SinglyLinkedList(values)
        | Snapshot::DoublyLinkedList(values)
        | Snapshot::Stack(values)
        | Snapshot::Queue(values) => layout_linear(snapshot.kind(), values, config),
    }
}

pub fn layout_tree(tree: &BstTree, config: &LayoutConfig) -> StructureLayout {
    let mut layout = StructureLayout::default();
    if let Some(root) = tree.root() {
        place(tree, root, 0.0, 0, None, config, &mut layout);
    }
    layout
}

fn place(
    tree: &BstTree,
    index: usize,
    x: f64,
    level: usize,
    parent: Option<&str>,
    config: &LayoutConfig,
    layout: &mut StructureLayout,
) {
    let Some(node) = tree.node(index) else {
        return;
    };
    layout.push_node(PositionedNode {
        id: node.id.clone(),
        value: node.value.clone(),
        center: Point::new(x, level as f64 * config.level_height),
        level,
    });
    if let Some(parent) = parent {
        layout.link(parent, &node.id, config.node_radius, false);
    }

    let offset = config.node_width * config.decay_factor.powi(level as i32 + 1);
    if let Some(left) = node.left {
        place(tree, left, x - offset, level + 1, Some(node.id.as_str()), config, layout);
    }
    if let Some(right) = node.right {
        place(tree, right, x + offset, level + 1, Some(node.id.as_str()), config, layout);
    }
}

pub fn layout_linear(kind: StructureKind, values: &[String], config: &LayoutConfig) -> StructureLayout {
    let mut layout = StructureLayout::default();
    let count = values.len();
    for (i, value) in values.iter().enumerate() {
        let center = match kind {
            StructureKind::Stack => Point::new(0.0, (count - 1 - i) as f64 * config.list_pitch),
            _ => Point::new(i as f64 * config.list_pitch, 0.0),
        };
        layout.push_node(PositionedNode {
            id: node_id(i),
            value: value.clone(),
            center,
            level: 0,
        });
    }

    if matches!(
        kind,
        StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList
    ) {
        for i in 1..count {
            let (prev, next) = (node_id(i - 1), node_id(i));
            layout.link(&prev, &next, config.node_radius, false);
            if kind == StructureKind::DoublyLinkedList {
                layout.link(&next, &prev, config.node_radius, true);
            }
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::engine;
    use crate::operation::{OperationDraft, OperationLog};

    fn tree(values: &[&str]) -> Snapshot {
        let mut log = OperationLog::new();
        for value in values {
            log.append(OperationDraft::new("insert").value(*value));
        }
        let timing = TimingConfig::default();
        let mut snapshot = Snapshot::empty(StructureKind::Bst);
        for op in log.iter() {
            snapshot = engine::apply(op, &snapshot, &timing)
                .expect("engine should not fail")
                .snapshot;
        }
        snapshot
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_tree_offsets_decay_per_level() {
        let config = LayoutConfig::default();
        let layout = layout(&tree(&["50", "30", "70", "20"]), &config);
        let value_at = |value: &str| {
            layout
                .nodes
                .iter()
                .find(|node| node.value == value)
                .map(|node| node.center)
                .expect("node should be placed")
        };

        assert_eq!(value_at("50"), Point::new(0.0, 0.0));
        assert!(approx(value_at("30").x, -72.0));
        assert!(approx(value_at("70").x, 72.0));
        assert!(approx(value_at("30").y, 80.0));
        // 72 + 120 * 0.6^2
        assert!(approx(value_at("20").x, -115.2));
        assert!(approx(value_at("20").y, 160.0));
        assert_eq!(layout.nodes[0].value, "50");
        assert_eq!(layout.connectors.len(), 3);
    }

    #[test]
    fn test_connectors_touch_node_boundaries() {
        let (start, end, angle) =
            trim_segment(Point::new(0.0, 0.0), Point::new(30.0, 40.0), 5.0).expect("segment");
        assert!(approx(start.x, 3.0) && approx(start.y, 4.0));
        assert!(approx(end.x, 27.0) && approx(end.y, 36.0));
        assert!(approx(angle, 40f64.atan2(30.0)));

        assert!(trim_segment(Point::new(0.0, 0.0), Point::new(8.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_linear_layouts() {
        let config = LayoutConfig::default();
        let values: Vec<String> = ["a", "b", "c"].iter().map(|v| v.to_string()).collect();

        let list = layout_linear(StructureKind::DoublyLinkedList, &values, &config);
        assert_eq!(list.position("node-2"), Some(Point::new(160.0, 0.0)));
        assert_eq!(list.connectors.len(), 4);
        assert_eq!(list.connectors.iter().filter(|c| c.back).count(), 2);

        let stack = layout_linear(StructureKind::Stack, &values, &config);
        assert_eq!(stack.position("node-2"), Some(Point::new(0.0, 0.0)));
        assert_eq!(stack.position("node-0"), Some(Point::new(0.0, 160.0)));
        assert!(stack.connectors.is_empty());
    }

    #[test]
    fn test_bounds() {
        let config = LayoutConfig::default();
        assert!(layout(&Snapshot::empty(StructureKind::Queue), &config)
            .bounds(0.0)
            .is_none());
        let values = vec!["x".to_string(), "y".to_string()];
        let bounds = layout_linear(StructureKind::Queue, &values, &config)
            .bounds(20.0)
            .expect("bounds");
        assert_eq!(bounds.min, Point::new(-20.0, -20.0));
        assert_eq!(bounds.max, Point::new(100.0, 20.0));
    }
}
