//! Deterministic layered tree layout

use std::collections::{HashMap, HashSet};

use crate::types::{Edge, Node, Position};

use super::{Direction, LayoutEngine};

/// Ranks nodes by depth along the main axis and spreads leaves along the
/// cross axis, centring each parent over its children
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    /// Distance between consecutive depths
    pub rank_sep: f64,
    /// Distance between neighbouring leaves
    pub node_sep: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            rank_sep: 420.0,
            node_sep: 260.0,
        }
    }
}

impl LayeredLayout {
    pub fn new(rank_sep: f64, node_sep: f64) -> Self {
        Self { rank_sep, node_sep }
    }
}

struct Placement<'a> {
    children: HashMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    slots: HashMap<&'a str, (usize, f64)>,
    next_leaf: f64,
}

/// A node whose children are still being placed
struct Frame<'a> {
    id: &'a str,
    depth: usize,
    children: Vec<&'a str>,
    cursor: usize,
    first: Option<f64>,
    last: Option<f64>,
}

impl<'a> Placement<'a> {
    fn enter(&mut self, id: &'a str, depth: usize) -> Frame<'a> {
        self.visited.insert(id);
        let children = self
            .children
            .get(id)
            .map(|c| c.iter().copied().filter(|c| !self.visited.contains(c)).collect())
            .unwrap_or_default();
        Frame {
            id,
            depth,
            children,
            cursor: 0,
            first: None,
            last: None,
        }
    }

    /// Place `root` and its subtree in post-order
    ///
    /// Iterative so that arbitrarily deep chains never exhaust the stack.
    fn place(&mut self, root: &'a str, depth: usize) {
        let mut stack = vec![self.enter(root, depth)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.children.get(frame.cursor) {
                frame.cursor += 1;
                let depth = frame.depth + 1;
                // A shared descendant may have been claimed by an earlier sibling
                if !self.visited.contains(child) {
                    let next = self.enter(child, depth);
                    stack.push(next);
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let slot = match (done.first, done.last) {
                (Some(first), Some(last)) => (first + last) / 2.0,
                _ => {
                    let slot = self.next_leaf;
                    self.next_leaf += 1.0;
                    slot
                }
            };
            self.slots.insert(done.id, (done.depth, slot));

            if let Some(parent) = stack.last_mut() {
                parent.first.get_or_insert(slot);
                parent.last = Some(slot);
            }
        }
    }
}

impl LayoutEngine for LayeredLayout {
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: Direction) -> Vec<Node> {
        let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut has_parent: HashSet<&str> = HashSet::new();
        for edge in edges {
            if known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()) {
                children
                    .entry(edge.source.as_str())
                    .or_default()
                    .push(edge.target.as_str());
                has_parent.insert(edge.target.as_str());
            }
        }

        let mut placement = Placement {
            children,
            visited: HashSet::new(),
            slots: HashMap::new(),
            next_leaf: 0.0,
        };

        for node in nodes.iter().filter(|n| !has_parent.contains(n.id.as_str())) {
            if !placement.visited.contains(node.id.as_str()) {
                placement.place(&node.id, 0);
            }
        }
        // Anything left sits on a cycle with no root; lay it out from itself
        for node in nodes {
            if !placement.visited.contains(node.id.as_str()) {
                placement.place(&node.id, 0);
            }
        }

        nodes
            .iter()
            .map(|node| {
                let (depth, slot) = placement
                    .slots
                    .get(node.id.as_str())
                    .copied()
                    .unwrap_or((0, 0.0));
                let main = depth as f64 * self.rank_sep;
                let cross = slot * self.node_sep;
                let position = match direction {
                    Direction::LR => Position::new(main, cross),
                    Direction::RL => Position::new(-main, cross),
                    Direction::TB => Position::new(cross, main),
                    Direction::BT => Position::new(cross, -main),
                };
                Node {
                    position,
                    ..node.clone()
                }
            })
            .collect()
    }
}
