//! Unify pass (component D): contract maximal linear chains into single
//! nodes. Grounded on `original_source/src/main.cpp`'s `unify(int cur_k)`.
//!
//! Per spec.md §9's second Open Question, this crate always allocates a
//! fresh buffer on concatenation rather than attempting the original's
//! "does the arena happen to already hold the right bytes after this
//! node's stored length" fast path -- that optimization read past a
//! node's declared length and relied on buffer layout accidents that
//! don't hold once sequences live in independently-sized `Vec<u8>`s.

use crate::graph::Graph;

/// Single-sweep chain contraction. `cur_k` is the overlap length still
/// implicit on edges (the input `k` before bluntify, `1` afterwards).
/// Visits ids `1..=last_id` as of entry; nodes created mid-sweep are not
/// revisited (spec.md §5).
pub fn unify(graph: &mut Graph, cur_k: i64) {
    let cur_k_1 = cur_k - 1;
    let snapshot_last_id = graph.last_id;

    for i in 1..=snapshot_last_id {
        if !graph.nodes.contains_key(&i) {
            continue;
        }

        let node = &graph.nodes[&i];
        if node.left_edges.size() != 1 {
            continue;
        }
        let left_neighbour_id = node.left_edges.front();
        if left_neighbour_id < 0 {
            continue;
        }
        debug_assert!(
            graph.nodes.contains_key(&left_neighbour_id),
            "dangling left-edge reference in unify"
        );
        let left_neighbour = &graph.nodes[&left_neighbour_id];
        if left_neighbour.right_edges.size() != 1 {
            continue;
        }
        if left_neighbour_id == i {
            continue;
        }

        graph.move_right_edges_to(i, left_neighbour_id, false);

        let tail = graph.seq(i)[cur_k_1 as usize..].to_vec();
        let mut combined = graph.seq(left_neighbour_id).to_vec();
        combined.extend_from_slice(&tail);
        let handle = graph.arena.alloc_owned(combined);
        graph.nodes.get_mut(&left_neighbour_id).unwrap().seq = handle;

        graph.nodes.remove(&i);
    }
}
