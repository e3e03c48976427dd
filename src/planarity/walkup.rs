//! Walk-up.
//!
//! For a back edge from descendant `w` to the vertex `v` being processed,
//! tags `w` as pending and climbs toward `v`, registering every component
//! root on the way as pertinent to its parent vertex. Both directions around
//! each external face are walked in lock-step so the climb costs no more than
//! the shorter side, and a walk stops as soon as it meets a node an earlier
//! walk-up already passed in this generation.

use super::arena::{Arena, Cursor, NodeIx, NIL};

/// Register the path from `w` up to `v` as pertinent for the back edge `w - v`.
pub(crate) fn walkup(arena: &mut Arena, v: NodeIx, w: NodeIx) {
    arena.vertices[w].pending = v;

    let generation = arena.generation;
    let mut x = Cursor::new(w, 1);
    let mut y = Cursor::new(w, 0);

    while x.node != v {
        if arena.nodes[x.node].visited == generation || arena.nodes[y.node].visited == generation {
            break;
        }
        arena.nodes[x.node].visited = generation;
        arena.nodes[y.node].visited = generation;

        let root = if arena.is_root(x.node) {
            x.node
        } else if arena.is_root(y.node) {
            y.node
        } else {
            NIL
        };

        if root == NIL {
            x = arena.ext_face_next(x);
            y = arena.ext_face_next(y);
            continue;
        }

        let child = arena.child_of(root);
        let parent = arena.vertices[child].parent;
        if parent != v {
            if arena.vertices[child].lowpoint < v {
                arena.pert_push_back(child);
            } else {
                arena.pert_push_front(child);
            }
        }
        x = Cursor::new(parent, 1);
        y = Cursor::new(parent, 0);
    }
}
