//! Merge engine: splice a child component root into its cut vertex.

use super::arena::{twin, Arena, Cursor, NodeIx, NIL};

/// Merge the component rooted at `root` into `cut`.
///
/// `cut.color` is the side the walk-down entered the cut vertex from and
/// `root.color` the side it left the root through. When they coincide the
/// child component is flipped first so the external face stays one
/// continuous walk.
pub(crate) fn merge(arena: &mut Arena, cut: Cursor, root: Cursor) {
    let child = arena.child_of(root.node);
    if cut.color == root.color {
        arena.invert(root.node);
        arena.roots[child].flipped ^= true;
    }
    arena.pert_remove(child);
    arena.sep_remove(child);
    merge_vertex(arena, cut.node, cut.color, root.node);
}

/// Move every half-edge of `root` into `w`'s list at end `side`.
///
/// The root's own order is kept; its `link[1 ^ side]` half-edge ends up
/// next to `w`'s old end and its `link[side]` half-edge becomes `w`'s new
/// end.
pub(crate) fn merge_vertex(arena: &mut Arena, w: NodeIx, side: usize, root: NodeIx) {
    let mut arc = arena.nodes[root].link[0];
    while arc != NIL {
        arena.arcs[twin(arc)].neighbor = w;
        arc = arena.arcs[arc].link[1];
    }

    let inner = arena.nodes[root].link[1 ^ side];
    let outer = arena.nodes[root].link[side];
    let old_end = arena.nodes[w].link[side];
    if old_end == NIL {
        arena.nodes[w].link = arena.nodes[root].link;
    } else {
        arena.arcs[old_end].link[side] = inner;
        arena.arcs[inner].link[1 ^ side] = old_end;
        arena.nodes[w].link[side] = outer;
    }
    arena.nodes[root].link = [NIL, NIL];
}
