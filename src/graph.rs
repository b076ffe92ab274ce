//! Graph store (component B, part 2): owns the `NodeId -> Node` map, the
//! id allocator, and the sequence arena, and implements the low-level
//! mutators every pass builds on.
//!
//! Grounded on `original_source/src/node.cpp`'s `Node::add_node`,
//! `Node::add_edge`, `Node::move_right_edges_to`,
//! `Node::move_left_edges_to` and `Node::merge_to`. The original hangs
//! these off `Node` itself via a process-global `unordered_map`; this
//! crate moves them onto the owning `Graph` so there is never a live
//! reference into the node map across a mutation.

use std::collections::HashMap;

use crate::edges::EdgeSet;
use crate::node::{Node, NodeId, SignedNodeId};
use crate::seq_arena::{SeqArena, SeqHandle};

pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub last_id: NodeId,
    pub arena: SeqArena,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            last_id: 0,
            arena: SeqArena::new(),
        }
    }

    /// Allocate a new id, copy `bytes` into the arena, and insert the node.
    /// `left_neighbour`/`right_neighbour`, when non-zero, seed the new
    /// node's edge lists -- kept for API symmetry with the original's
    /// `Node::add_node`, though none of the core passes use it.
    pub fn add_node(&mut self, bytes: &[u8], left_neighbour: SignedNodeId, right_neighbour: SignedNodeId) -> NodeId {
        let handle = self.arena.alloc(bytes);
        self.add_node_with_handle(handle, left_neighbour, right_neighbour)
    }

    pub fn add_node_with_handle(&mut self, handle: SeqHandle, left_neighbour: SignedNodeId, right_neighbour: SignedNodeId) -> NodeId {
        assert!(handle.len() >= 1, "sequence_len must stay positive");
        self.last_id += 1;
        let id = self.last_id;
        let mut node = Node::new(id, handle);
        if left_neighbour != 0 {
            node.left_edges.insert(left_neighbour);
        }
        if right_neighbour != 0 {
            node.right_edges.insert(right_neighbour);
        }
        self.nodes.insert(id, node);
        id
    }

    /// Record an edge between `from_node`'s `from_side` and `to_node`'s
    /// `to_side`, at both endpoints, per spec.md §3's sign convention.
    /// Self-loops are fine; parallel edges are silently deduplicated by
    /// `EdgeSet::insert`.
    pub fn add_edge(&mut self, from_node: NodeId, from_side: Side, to_node: NodeId, to_side: Side) {
        let signed_from = if from_side == Side::Right { from_node } else { -from_node };
        let signed_to = if to_side == Side::Right { to_node } else { -to_node };

        match from_side {
            Side::Right => self.nodes.get_mut(&from_node).unwrap().right_edges.insert(signed_to),
            Side::Left => self.nodes.get_mut(&from_node).unwrap().left_edges.insert(signed_to),
        }
        match to_side {
            Side::Right => self.nodes.get_mut(&to_node).unwrap().right_edges.insert(signed_from),
            Side::Left => self.nodes.get_mut(&to_node).unwrap().left_edges.insert(signed_from),
        }
    }

    /// Move every edge incident on `src`'s right side onto `dst`'s right
    /// side, rewriting the reciprocal entry at each neighbour so it now
    /// points at `dst` instead of `src`. If `update` is false, `dst`'s
    /// existing right edges are discarded first (the caller is replacing
    /// them wholesale, as `unify` does).
    pub fn move_right_edges_to(&mut self, src: NodeId, dst: NodeId, update: bool) {
        if !update {
            self.nodes.get_mut(&dst).unwrap().right_edges.clear();
        }
        let src_right = std::mem::take(&mut self.nodes.get_mut(&src).unwrap().right_edges);
        self.nodes.get_mut(&dst).unwrap().right_edges.merge_with(&src_right);

        for &right_neighbour_id in src_right.iter() {
            if right_neighbour_id == src {
                let d = &mut self.nodes.get_mut(&dst).unwrap().right_edges;
                d.erase(src);
                d.insert(dst);
                continue;
            }
            let neighbour = self.nodes.get_mut(&right_neighbour_id.abs()).unwrap();
            if right_neighbour_id < 0 {
                neighbour.left_edges.erase(src);
                neighbour.left_edges.insert(dst);
            } else {
                neighbour.right_edges.erase(src);
                neighbour.right_edges.insert(dst);
            }
        }
    }

    /// Symmetric counterpart of [`Graph::move_right_edges_to`] for left
    /// sides; signs are inverted throughout, per spec.md §3.
    pub fn move_left_edges_to(&mut self, src: NodeId, dst: NodeId, update: bool) {
        if !update {
            self.nodes.get_mut(&dst).unwrap().left_edges.clear();
        }
        let src_left = std::mem::take(&mut self.nodes.get_mut(&src).unwrap().left_edges);
        self.nodes.get_mut(&dst).unwrap().left_edges.merge_with(&src_left);

        for &left_neighbour_id in src_left.iter() {
            if left_neighbour_id == -src {
                let d = &mut self.nodes.get_mut(&dst).unwrap().left_edges;
                d.erase(-src);
                d.insert(-dst);
                continue;
            }
            let neighbour = self.nodes.get_mut(&left_neighbour_id.abs()).unwrap();
            if left_neighbour_id < 0 {
                neighbour.left_edges.erase(-src);
                neighbour.left_edges.insert(-dst);
            } else {
                neighbour.right_edges.erase(-src);
                neighbour.right_edges.insert(-dst);
            }
        }
    }

    /// Move both edge sides of `src` onto `dst`, then delete `src`.
    pub fn merge_to(&mut self, src: NodeId, dst: NodeId) {
        self.move_right_edges_to(src, dst, true);
        self.move_left_edges_to(src, dst, true);
        self.nodes.remove(&src);
    }

    pub fn seq(&self, id: NodeId) -> &[u8] {
        self.arena.slice(self.nodes[&id].seq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[allow(dead_code)]
pub fn opposite_edges<'a>(node: &'a Node, side: Side) -> &'a EdgeSet {
    match side {
        Side::Left => &node.left_edges,
        Side::Right => &node.right_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_is_reciprocal() {
        let mut g = Graph::new();
        let a = g.add_node(b"ACGT", 0, 0);
        let b = g.add_node(b"TTTT", 0, 0);
        // a's right overlaps b's left (a GFA "a + b +" link): stored as -b
        // at a's right list, +a at b's left list (original sign scheme).
        g.add_edge(a, Side::Right, b, Side::Left);
        assert!(g.nodes[&a].right_edges.find(-b));
        assert!(g.nodes[&b].left_edges.find(a));
    }

    #[test]
    fn add_edge_reverse_orientation_signs() {
        let mut g = Graph::new();
        let a = g.add_node(b"ACGT", 0, 0);
        let b = g.add_node(b"TTTT", 0, 0);
        // a's right overlaps b's right (a GFA "a + b -" link): both sides
        // record a positive entry.
        g.add_edge(a, Side::Right, b, Side::Right);
        assert!(g.nodes[&a].right_edges.find(b));
        assert!(g.nodes[&b].right_edges.find(a));
    }

    #[test]
    fn move_right_edges_preserves_self_loop() {
        let mut g = Graph::new();
        let u = g.add_node(b"ACGT", 0, 0);
        let v = g.add_node(b"TTTT", 0, 0);
        g.add_edge(u, Side::Right, u, Side::Right); // +u in u.right_edges
        g.add_edge(u, Side::Right, v, Side::Left);
        g.move_right_edges_to(u, v, true);
        assert!(g.nodes[&v].right_edges.find(v));
        assert!(!g.nodes.contains_key(&u) || g.nodes[&u].right_edges.empty());
    }

    #[test]
    fn merge_to_removes_src_and_migrates_edges() {
        let mut g = Graph::new();
        let a = g.add_node(b"ACGT", 0, 0);
        let b = g.add_node(b"ACGT", 0, 0);
        let p = g.add_node(b"GGGG", 0, 0);
        g.add_edge(p, Side::Right, a, Side::Left);
        g.merge_to(a, b);
        assert!(!g.nodes.contains_key(&a));
        assert!(g.nodes[&p].right_edges.find(-b));
        assert!(g.nodes[&b].left_edges.find(p));
    }
}
