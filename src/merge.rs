//! Merge pass (component E): fold sibling nodes that share an entire
//! edge set down to their common prefix or suffix, removing redundant
//! copies of the same sequence.
//!
//! Grounded on `original_source/src/main.cpp`'s `merge_nodes()` and
//! `original_source/src/node.cpp`'s `Node::partial_left_merge_to` /
//! `Node::partial_right_merge_to`. As with `graph.rs`, the per-node
//! methods become free functions taking `&mut Graph` plus the two node
//! ids involved, so no `Node` reference is ever live across a mutation
//! of the map that owns it.

use std::collections::BTreeSet;

use crate::edges::EdgeSet;
use crate::graph::{Graph, Side};
use crate::node::{NodeId, SignedNodeId};
use crate::unify::unify;

/// Repeat a merge sweep until the number of changes in a sweep falls
/// below `max(1, last_id/1000)`, re-unifying after every sweep (including
/// the last) so chains exposed by a merge collapse immediately.
/// `growing_merge` selects between the non-growing policy (only merges
/// that shrink total node count) and the growing policy (also split out a
/// brand new node for the shared prefix/suffix when neither side is
/// already a full match).
pub fn merge_nodes(graph: &mut Graph, growing_merge: bool) {
    let min_change_per_step = (graph.last_id / 1000).max(1);
    let mut step = 0u32;

    loop {
        let mut changed = 0;
        log::info!("merge step {step} for {} nodes", graph.nodes.len());
        unify(graph, 1);

        for i in 1..=graph.last_id {
            if !graph.nodes.contains_key(&i) {
                continue;
            }
            if try_merge_into(graph, i, growing_merge) {
                changed += 1;
            }
        }
        step += 1;
        if changed < min_change_per_step {
            break;
        }
    }
    unify(graph, 1);
}

/// Look for a sibling of `i` that shares one of its edge sets wholesale
/// and merge it in, per spec.md §5's candidate search: gather the
/// front/back neighbour of each non-empty side, pull every edge of
/// those neighbours in as a merge candidate, then try each candidate in
/// turn.
fn try_merge_into(graph: &mut Graph, i: NodeId, growing_merge: bool) -> bool {
    let mut neighbours: BTreeSet<SignedNodeId> = BTreeSet::new();
    {
        let node = &graph.nodes[&i];
        if !node.left_edges.empty() {
            neighbours.insert(node.left_edges.front());
            neighbours.insert(node.left_edges.back());
        }
        if !node.right_edges.empty() {
            neighbours.insert(node.right_edges.front());
            neighbours.insert(node.right_edges.back());
        }
    }

    let mut candidates = EdgeSet::new();
    for neighbour_id in neighbours {
        let neighbour = &graph.nodes[&neighbour_id.abs()];
        if neighbour_id < 0 {
            candidates.merge_with(&neighbour.left_edges);
        } else {
            candidates.merge_with(&neighbour.right_edges);
        }
    }

    let candidate_ids: Vec<SignedNodeId> = candidates.iter().copied().collect();
    for candidate_id in candidate_ids {
        let candidate = candidate_id.abs();
        if candidate == i {
            continue;
        }
        let self_looping = {
            let c = &graph.nodes[&candidate];
            c.left_edges.find(candidate)
                || c.left_edges.find(-candidate)
                || c.right_edges.find(candidate)
                || c.right_edges.find(-candidate)
        };
        if self_looping {
            continue;
        }

        let left_match = graph.nodes[&candidate].left_edges == graph.nodes[&i].left_edges;
        if left_match && partial_left_merge_to(graph, candidate, i, growing_merge) != 0 {
            return true;
        }
        let right_match = graph.nodes[&candidate].right_edges == graph.nodes[&i].right_edges;
        if right_match && partial_right_merge_to(graph, candidate, i, growing_merge) != 0 {
            return true;
        }
    }
    false
}

/// Merge `src` leftward into `dst`: both are assumed to share the same
/// left edge set already (the caller checks this). Returns `0` if no
/// common prefix exists (or, without `growing_merge`, if the common
/// prefix is shorter than both sequences); otherwise returns the id that
/// now holds the merged prefix.
fn partial_left_merge_to(graph: &mut Graph, src: NodeId, dst: NodeId, growing_merge: bool) -> NodeId {
    let src_handle = graph.nodes[&src].seq;
    let dst_handle = graph.nodes[&dst].seq;
    let common = src_handle.len().min(dst_handle.len());
    let src_seq = graph.arena.slice(src_handle);
    let dst_seq = graph.arena.slice(dst_handle);
    let mut i = 0;
    while i < common && src_seq[i] == dst_seq[i] {
        i += 1;
    }
    if i == 0 {
        return 0;
    }

    let src_len = src_handle.len();
    let dst_len = dst_handle.len();

    if i == dst_len {
        if i == src_len {
            graph.merge_to(src, dst);
            return dst;
        }
        let trimmed = graph.arena.narrow(src_handle, i, src_len);
        graph.nodes.get_mut(&src).unwrap().seq = trimmed;
        graph.move_left_edges_to(src, dst, true);
        graph.add_edge(dst, Side::Right, src, Side::Left);
        return dst;
    }

    if i == src_len {
        let trimmed = graph.arena.narrow(dst_handle, i, dst_len);
        graph.nodes.get_mut(&dst).unwrap().seq = trimmed;
        graph.move_left_edges_to(dst, src, true);
        graph.add_edge(src, Side::Right, dst, Side::Left);
        return src;
    }

    if !growing_merge {
        return 0;
    }

    let prefix = graph.arena.slice(graph.arena.narrow(src_handle, 0, i)).to_vec();
    let new_node = graph.add_node(&prefix, 0, 0);
    let src_trimmed = graph.arena.narrow(src_handle, i, src_len);
    let dst_trimmed = graph.arena.narrow(dst_handle, i, dst_len);
    graph.nodes.get_mut(&src).unwrap().seq = src_trimmed;
    graph.nodes.get_mut(&dst).unwrap().seq = dst_trimmed;
    graph.move_left_edges_to(dst, new_node, true);
    graph.move_left_edges_to(src, new_node, true);
    graph.add_edge(new_node, Side::Right, src, Side::Left);
    graph.add_edge(new_node, Side::Right, dst, Side::Left);
    new_node
}

/// Mirror of [`partial_left_merge_to`] working from the common suffix
/// and the right edge sets instead.
fn partial_right_merge_to(graph: &mut Graph, src: NodeId, dst: NodeId, growing_merge: bool) -> NodeId {
    let src_handle = graph.nodes[&src].seq;
    let dst_handle = graph.nodes[&dst].seq;
    let common = src_handle.len().min(dst_handle.len());
    let src_seq = graph.arena.slice(src_handle);
    let dst_seq = graph.arena.slice(dst_handle);
    let mut i = 0;
    while i < common && src_seq[src_handle.len() - 1 - i] == dst_seq[dst_handle.len() - 1 - i] {
        i += 1;
    }
    if i == 0 {
        return 0;
    }

    let src_len = src_handle.len();
    let dst_len = dst_handle.len();

    if i == dst_len {
        if i == src_len {
            graph.merge_to(src, dst);
            return dst;
        }
        let trimmed = graph.arena.narrow(src_handle, 0, src_len - i);
        graph.nodes.get_mut(&src).unwrap().seq = trimmed;
        graph.move_right_edges_to(src, dst, true);
        graph.add_edge(src, Side::Right, dst, Side::Left);
        return dst;
    }

    if i == src_len {
        let trimmed = graph.arena.narrow(dst_handle, 0, dst_len - i);
        graph.nodes.get_mut(&dst).unwrap().seq = trimmed;
        graph.move_right_edges_to(dst, src, true);
        graph.add_edge(dst, Side::Right, src, Side::Left);
        return src;
    }

    if !growing_merge {
        return 0;
    }

    let suffix = graph.arena.slice(graph.arena.narrow(src_handle, src_len - i, src_len)).to_vec();
    let new_node = graph.add_node(&suffix, 0, 0);
    let src_trimmed = graph.arena.narrow(src_handle, 0, src_len - i);
    let dst_trimmed = graph.arena.narrow(dst_handle, 0, dst_len - i);
    graph.nodes.get_mut(&src).unwrap().seq = src_trimmed;
    graph.nodes.get_mut(&dst).unwrap().seq = dst_trimmed;
    graph.move_right_edges_to(dst, new_node, true);
    graph.move_right_edges_to(src, new_node, true);
    graph.add_edge(src, Side::Right, new_node, Side::Left);
    graph.add_edge(dst, Side::Right, new_node, Side::Left);
    new_node
}
