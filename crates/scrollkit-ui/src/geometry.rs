//! Boundary to the host's widget tree
//!
//! The engine only needs to know where nodes sit on screen and how big they
//! are, and to move its own canvas. `SceneGraph` is a minimal in-memory tree
//! implementing that boundary for hosts without one, tests and the simulator.

use crate::scroll::Axis;

/// Handle to a node in the host's widget tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along `axis`
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// Geometry queries the scroll engine makes against the host tree
///
/// Handles may dangle: a node removed between frames resolves to `None`.
pub trait NodeGeometry {
    /// Absolute (screen-space) origin of `node`
    fn screen_origin(&self, node: NodeId) -> Option<Point>;

    fn size(&self, node: NodeId) -> Option<Size>;

    /// Move `node` relative to its parent. Returns false if the node is gone.
    fn set_local_position(&mut self, node: NodeId, position: Point) -> bool;
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    position: Point,
    size: Size,
}

/// Parent-linked tree of positioned rectangles
#[derive(Debug, Default, Clone)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node positioned in screen space
    pub fn add_root(&mut self, position: Point, size: Size) -> NodeId {
        self.push(Node {
            parent: None,
            position,
            size,
        })
    }

    /// Add a node positioned relative to `parent`
    pub fn add_child(&mut self, parent: NodeId, position: Point, size: Size) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        Some(self.push(Node {
            parent: Some(parent),
            position,
            size,
        }))
    }

    /// Remove `node` and its whole subtree
    pub fn remove(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        self.nodes[node.0] = None;
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                Some(n) if n.parent == Some(node) => Some(NodeId(idx)),
                _ => None,
            })
            .collect();
        for child in children {
            self.remove(child);
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn local_position(&self, node: NodeId) -> Option<Point> {
        self.get(node).map(|n| n.position)
    }

    /// Extent of `node`'s children along `axis`, measured from its origin
    pub fn content_extent(&self, node: NodeId, axis: Axis) -> f64 {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.parent == Some(node))
            .map(|n| n.position.along(axis) + n.size.along(axis))
            .fold(0.0, f64::max)
    }

    fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() - 1)
    }
}

impl NodeGeometry for SceneGraph {
    fn screen_origin(&self, node: NodeId) -> Option<Point> {
        let mut current = self.get(node)?;
        let mut origin = current.position;
        while let Some(parent) = current.parent {
            current = self.get(parent)?;
            origin.x += current.position.x;
            origin.y += current.position.y;
        }
        Some(origin)
    }

    fn size(&self, node: NodeId) -> Option<Size> {
        self.get(node).map(|n| n.size)
    }

    fn set_local_position(&mut self, node: NodeId, position: Point) -> bool {
        match self.nodes.get_mut(node.0).and_then(Option::as_mut) {
            Some(n) => {
                n.position = position;
                true
            }
            None => false,
        }
    }
}
