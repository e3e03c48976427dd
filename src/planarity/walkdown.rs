//! Walk-down.
//!
//! Embeds the back edges from `v` into one child component, walking its
//! external face from the root in one direction. Pertinent child components
//! met on the way are descended into and merged lazily, just before the back
//! edge that needs them is embedded.

use tracing::trace;

use super::arena::{Arena, ArcKind, Cursor, NodeIx, NIL};
use super::merge::merge;

/// Result of one walk-down pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkdownResult {
    /// Back edges embedded by this pass.
    pub embedded: usize,
    /// Stopped inside a child component with merges still pending.
    pub blocked: bool,
}

/// Embed the pending back edges of `v` reachable from `child`'s root through side `vout`.
pub(crate) fn walkdown(arena: &mut Arena, v: NodeIx, child: NodeIx, vout: usize) -> WalkdownResult {
    let root = arena.root_of(child);
    // (cut vertex and entry side, child root and exit side)
    let mut stack: Vec<(Cursor, Cursor)> = Vec::new();
    let mut embedded = 0;

    let mut w = arena.ext_face_next(Cursor::new(root, 1 ^ vout));
    while w.node != root {
        if arena.vertices[w.node].pending == v {
            while let Some((cut, child_root)) = stack.pop() {
                merge(arena, cut, child_root);
            }
            arena.embed_edge(root, vout, w, ArcKind::Back);
            arena.vertices[w.node].pending = NIL;
            embedded += 1;
        }

        let head = arena.vertices[w.node].pert_head;
        if head != NIL {
            let child_root = arena.root_of(head);
            let x = arena.ext_face_next(Cursor::new(child_root, 1));
            let y = arena.ext_face_next(Cursor::new(child_root, 0));
            let (next, exit) = if arena.is_internally_active(x.node, v) {
                (x, 0)
            } else if arena.is_internally_active(y.node, v) {
                (y, 1)
            } else if arena.is_pertinent(x.node, v) {
                (x, 0)
            } else {
                (y, 1)
            };
            stack.push((w, Cursor::new(child_root, exit)));
            w = next;
        } else if arena.is_inactive(w.node, v) {
            w = arena.ext_face_next(w);
        } else {
            let boundary = arena.nodes[root].link[vout];
            if stack.is_empty()
                && arena.vertices[child].lowpoint < v
                && arena.arcs[boundary].neighbor != w.node
            {
                arena.embed_edge(root, vout, w, ArcKind::ShortCircuit);
            }
            trace!(v, child, vout, stop = w.node, depth = stack.len(), "Walk-down stopped");
            break;
        }
    }

    WalkdownResult {
        embedded,
        blocked: !stack.is_empty(),
    }
}
