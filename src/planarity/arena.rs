//! Flat arenas for the edge-addition engine.
//!
//! Tree vertices and component roots share one node index space: node `u`
//! for `u < n` is the tree vertex with DFS index `u`, node `n + c` is the
//! component root standing in for `parent(c)` in the biconnected component
//! that contains tree edge `parent(c) -> c`.
//!
//! Every node owns a doubly linked list of half-edges. `link[0]` is the first
//! and `link[1]` the last; both are on the external face of the node's
//! component. Half-edges come in pairs so the twin of `a` is `a ^ 1`.

use crate::types::VertexId;

/// Index into [`Arena::nodes`].
pub(crate) type NodeIx = usize;
/// Index into [`Arena::arcs`].
pub(crate) type ArcIx = usize;

/// Null handle.
pub(crate) const NIL: usize = usize::MAX;

/// Twin of a half-edge.
#[inline]
pub(crate) fn twin(arc: ArcIx) -> ArcIx {
    arc ^ 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArcKind {
    Tree,
    Back,
    /// Keeps inactive stretches of the external face off future walks;
    /// dropped when the embedding is read out.
    ShortCircuit,
}

/// Directed half-edge in its owner's list.
///
/// `link[s]` points toward end `s` of the list.
#[derive(Debug, Clone)]
pub(crate) struct HalfEdge {
    pub neighbor: NodeIx,
    pub link: [ArcIx; 2],
    pub kind: ArcKind,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub link: [ArcIx; 2],
    /// Generation of the last walk-up that passed through.
    pub visited: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct TreeVertex {
    pub id: VertexId,
    pub parent: NodeIx,
    pub least_ancestor: NodeIx,
    pub lowpoint: NodeIx,
    /// Children not yet merged, ascending by lowpoint.
    pub sep_head: NodeIx,
    /// Pertinent child roots, internally active first.
    pub pert_head: NodeIx,
    pub pert_tail: NodeIx,
    /// Descendants with a back edge to this vertex.
    pub back_edge_sources: Vec<NodeIx>,
    /// Ancestor whose back edge to this vertex is waiting to be embedded.
    pub pending: NodeIx,
}

impl TreeVertex {
    pub(crate) fn new(id: VertexId, dfi: NodeIx, parent: NodeIx) -> Self {
        Self {
            id,
            parent,
            least_ancestor: dfi,
            lowpoint: dfi,
            sep_head: NIL,
            pert_head: NIL,
            pert_tail: NIL,
            back_edge_sources: Vec::new(),
            pending: NIL,
        }
    }
}

/// Per-child bookkeeping for the root `n + c`; entries are indexed by the
/// child `c`.
#[derive(Debug, Clone)]
pub(crate) struct ComponentRoot {
    pub sep_prev: NodeIx,
    pub sep_next: NodeIx,
    pub pert_prev: NodeIx,
    pub pert_next: NodeIx,
    /// Orientation of the child's subtree relative to its parent.
    pub flipped: bool,
}

impl Default for ComponentRoot {
    fn default() -> Self {
        Self {
            sep_prev: NIL,
            sep_next: NIL,
            pert_prev: NIL,
            pert_next: NIL,
            flipped: false,
        }
    }
}

/// Position on the external face: a node and the side it was entered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub node: NodeIx,
    pub color: usize,
}

impl Cursor {
    pub(crate) fn new(node: NodeIx, color: usize) -> Self {
        Self { node, color }
    }
}

/// All per-call state of the engine.
#[derive(Debug)]
pub(crate) struct Arena {
    pub vertices: Vec<TreeVertex>,
    pub roots: Vec<ComponentRoot>,
    pub nodes: Vec<Node>,
    pub arcs: Vec<HalfEdge>,
    pub generation: u32,
    /// Edges of the input component.
    pub num_edges: usize,
}

impl Arena {
    /// Wrap a finished DFS: allocate node slots and one tree-edge pair per
    /// child.
    pub(crate) fn new(vertices: Vec<TreeVertex>, num_edges: usize) -> Self {
        let n = vertices.len();
        let mut arena = Self {
            vertices,
            roots: vec![ComponentRoot::default(); n],
            nodes: vec![Node { link: [NIL, NIL], visited: 0 }; 2 * n],
            arcs: Vec::with_capacity(2 * (3 * n).max(num_edges)),
            generation: 0,
            num_edges,
        };
        for c in 1..n {
            let root = arena.root_of(c);
            let arc = arena.new_pair(root, c, ArcKind::Tree);
            arena.nodes[root].link = [arc, arc];
            arena.nodes[c].link = [twin(arc), twin(arc)];
        }
        arena
    }

    /// Number of tree vertices.
    #[inline]
    pub(crate) fn n(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub(crate) fn is_root(&self, node: NodeIx) -> bool {
        node >= self.n()
    }

    /// Root node for the component of child `c`.
    #[inline]
    pub(crate) fn root_of(&self, c: NodeIx) -> NodeIx {
        self.n() + c
    }

    /// Child whose component a root node belongs to.
    #[inline]
    pub(crate) fn child_of(&self, root: NodeIx) -> NodeIx {
        debug_assert!(self.is_root(root));
        root - self.n()
    }

    /// Allocate `from -> to` and its twin `to -> from`. Returns the half-edge
    /// owned by `from`; neither is linked into a list yet.
    pub(crate) fn new_pair(&mut self, from: NodeIx, to: NodeIx, kind: ArcKind) -> ArcIx {
        let arc = self.arcs.len();
        self.arcs.push(HalfEdge { neighbor: to, link: [NIL, NIL], kind });
        self.arcs.push(HalfEdge { neighbor: from, link: [NIL, NIL], kind });
        arc
    }

    /// Insert `arc` at end `side` of `node`'s list.
    pub(crate) fn add_arc(&mut self, node: NodeIx, side: usize, arc: ArcIx) {
        let old = self.nodes[node].link[side];
        self.arcs[arc].link[side] = NIL;
        self.arcs[arc].link[1 ^ side] = old;
        if old == NIL {
            self.nodes[node].link[1 ^ side] = arc;
        } else {
            self.arcs[old].link[side] = arc;
        }
        self.nodes[node].link[side] = arc;
    }

    /// Embed an edge between `root` and vertex `w` at the given ends.
    pub(crate) fn embed_edge(&mut self, root: NodeIx, root_side: usize, w: Cursor, kind: ArcKind) {
        let arc = self.new_pair(root, w.node, kind);
        self.add_arc(root, root_side, arc);
        self.add_arc(w.node, w.color, twin(arc));
    }

    #[inline]
    pub(crate) fn has_single_arc(&self, node: NodeIx) -> bool {
        let [first, last] = self.nodes[node].link;
        first == last
    }

    /// Step along the external face, leaving `from` on the side opposite
    /// its entry.
    ///
    /// A node with a single half-edge keeps the entry color, so a component
    /// that is one edge behaves like a two-cycle.
    pub(crate) fn ext_face_next(&self, from: Cursor) -> Cursor {
        let arc = self.nodes[from.node].link[1 ^ from.color];
        debug_assert_ne!(arc, NIL, "external face step from an isolated node");
        let next = self.arcs[arc].neighbor;
        let color = if self.has_single_arc(next) {
            from.color
        } else if self.nodes[next].link[0] == twin(arc) {
            0
        } else {
            1
        };
        Cursor::new(next, color)
    }

    /// Reverse `node`'s list in place.
    pub(crate) fn invert(&mut self, node: NodeIx) {
        let mut arc = self.nodes[node].link[0];
        while arc != NIL {
            let next = self.arcs[arc].link[1];
            self.arcs[arc].link.swap(0, 1);
            arc = next;
        }
        self.nodes[node].link.swap(0, 1);
    }

    /// Half-edges of `node` from first to last.
    pub(crate) fn arcs_of(&self, node: NodeIx) -> ArcIter<'_> {
        ArcIter { arena: self, next: self.nodes[node].link[0] }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Activity relative to the vertex `v` being processed
    // ─────────────────────────────────────────────────────────────────────

    /// Has an unembedded back edge to `v` in its own or a child's subtree.
    #[inline]
    pub(crate) fn is_pertinent(&self, w: NodeIx, v: NodeIx) -> bool {
        let vertex = &self.vertices[w];
        vertex.pending == v || vertex.pert_head != NIL
    }

    /// Reaches a proper ancestor of `v` directly or through a separated child.
    #[inline]
    pub(crate) fn is_externally_active(&self, w: NodeIx, v: NodeIx) -> bool {
        let vertex = &self.vertices[w];
        vertex.least_ancestor < v
            || (vertex.sep_head != NIL && self.vertices[vertex.sep_head].lowpoint < v)
    }

    #[inline]
    pub(crate) fn is_internally_active(&self, w: NodeIx, v: NodeIx) -> bool {
        self.is_pertinent(w, v) && !self.is_externally_active(w, v)
    }

    #[inline]
    pub(crate) fn is_inactive(&self, w: NodeIx, v: NodeIx) -> bool {
        !self.is_pertinent(w, v) && !self.is_externally_active(w, v)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Child lists
    // ─────────────────────────────────────────────────────────────────────

    /// Append child `c` to its parent's separated-children list.
    pub(crate) fn sep_push_back(&mut self, c: NodeIx, tail: &mut [NodeIx]) {
        let parent = self.vertices[c].parent;
        let last = tail[parent];
        self.roots[c].sep_prev = last;
        self.roots[c].sep_next = NIL;
        if last == NIL {
            self.vertices[parent].sep_head = c;
        } else {
            self.roots[last].sep_next = c;
        }
        tail[parent] = c;
    }

    pub(crate) fn sep_remove(&mut self, c: NodeIx) {
        let parent = self.vertices[c].parent;
        let ComponentRoot { sep_prev, sep_next, .. } = self.roots[c];
        if sep_prev == NIL {
            self.vertices[parent].sep_head = sep_next;
        } else {
            self.roots[sep_prev].sep_next = sep_next;
        }
        if sep_next != NIL {
            self.roots[sep_next].sep_prev = sep_prev;
        }
        self.roots[c].sep_prev = NIL;
        self.roots[c].sep_next = NIL;
    }

    /// Separated children of `w`, ascending by lowpoint.
    pub(crate) fn separated_children(&self, w: NodeIx) -> Vec<NodeIx> {
        let mut children = Vec::new();
        let mut c = self.vertices[w].sep_head;
        while c != NIL {
            children.push(c);
            c = self.roots[c].sep_next;
        }
        children
    }

    pub(crate) fn pert_push_front(&mut self, c: NodeIx) {
        let parent = self.vertices[c].parent;
        let head = self.vertices[parent].pert_head;
        self.roots[c].pert_prev = NIL;
        self.roots[c].pert_next = head;
        if head == NIL {
            self.vertices[parent].pert_tail = c;
        } else {
            self.roots[head].pert_prev = c;
        }
        self.vertices[parent].pert_head = c;
    }

    pub(crate) fn pert_push_back(&mut self, c: NodeIx) {
        let parent = self.vertices[c].parent;
        let tail = self.vertices[parent].pert_tail;
        self.roots[c].pert_next = NIL;
        self.roots[c].pert_prev = tail;
        if tail == NIL {
            self.vertices[parent].pert_head = c;
        } else {
            self.roots[tail].pert_next = c;
        }
        self.vertices[parent].pert_tail = c;
    }

    /// Unlink `c` from its parent's pertinent roots; no-op if absent.
    pub(crate) fn pert_remove(&mut self, c: NodeIx) {
        let parent = self.vertices[c].parent;
        let ComponentRoot { pert_prev, pert_next, .. } = self.roots[c];
        if pert_prev == NIL && self.vertices[parent].pert_head != c {
            return;
        }
        if pert_prev == NIL {
            self.vertices[parent].pert_head = pert_next;
        } else {
            self.roots[pert_prev].pert_next = pert_next;
        }
        if pert_next == NIL {
            self.vertices[parent].pert_tail = pert_prev;
        } else {
            self.roots[pert_next].pert_prev = pert_prev;
        }
        self.roots[c].pert_prev = NIL;
        self.roots[c].pert_next = NIL;
    }
}

pub(crate) struct ArcIter<'a> {
    arena: &'a Arena,
    next: ArcIx,
}

impl Iterator for ArcIter<'_> {
    type Item = ArcIx;

    fn next(&mut self) -> Option<ArcIx> {
        if self.next == NIL {
            return None;
        }
        let arc = self.next;
        self.next = self.arena.arcs[arc].link[1];
        Some(arc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path 0 - 1 - 2 as a DFS tree.
    fn path3() -> Arena {
        let vertices = vec![
            TreeVertex::new(VertexId::new(10), 0, NIL),
            TreeVertex::new(VertexId::new(11), 1, 0),
            TreeVertex::new(VertexId::new(12), 2, 1),
        ];
        Arena::new(vertices, 2)
    }

    #[test]
    fn test_tree_edges_start_as_single_arcs() {
        let arena = path3();
        assert_eq!(arena.n(), 3);
        assert!(arena.is_root(arena.root_of(1)));
        assert!(arena.has_single_arc(arena.root_of(2)));
        assert!(arena.has_single_arc(2));
        assert_eq!(arena.child_of(4), 1);

        let arc = arena.nodes[arena.root_of(2)].link[0];
        assert_eq!(arena.arcs[arc].neighbor, 2);
        assert_eq!(arena.arcs[twin(arc)].neighbor, arena.root_of(2));
    }

    #[test]
    fn test_single_arc_step_keeps_color() {
        let arena = path3();
        let root = arena.root_of(2);
        assert_eq!(arena.ext_face_next(Cursor::new(root, 1)), Cursor::new(2, 1));
        assert_eq!(arena.ext_face_next(Cursor::new(root, 0)), Cursor::new(2, 0));
        assert_eq!(arena.ext_face_next(Cursor::new(2, 0)), Cursor::new(root, 0));
    }

    #[test]
    fn test_add_arc_and_invert() {
        let mut arena = path3();
        let root = arena.root_of(1);
        arena.embed_edge(root, 0, Cursor::new(2, 1), ArcKind::Back);

        let order: Vec<NodeIx> = arena.arcs_of(root).map(|a| arena.arcs[a].neighbor).collect();
        assert_eq!(order, vec![2, 1]);

        arena.invert(root);
        let order: Vec<NodeIx> = arena.arcs_of(root).map(|a| arena.arcs[a].neighbor).collect();
        assert_eq!(order, vec![1, 2]);
        assert!(!arena.has_single_arc(root));
    }

    #[test]
    fn test_pertinent_list_order() {
        let vertices = vec![
            TreeVertex::new(VertexId::new(0), 0, NIL),
            TreeVertex::new(VertexId::new(1), 1, 0),
            TreeVertex::new(VertexId::new(2), 2, 0),
            TreeVertex::new(VertexId::new(3), 3, 0),
        ];
        let mut arena = Arena::new(vertices, 3);
        arena.pert_push_back(1);
        arena.pert_push_front(2);
        arena.pert_push_back(3);
        assert_eq!(arena.vertices[0].pert_head, 2);
        assert_eq!(arena.vertices[0].pert_tail, 3);

        arena.pert_remove(2);
        arena.pert_remove(2);
        assert_eq!(arena.vertices[0].pert_head, 1);
        arena.pert_remove(3);
        assert_eq!(arena.vertices[0].pert_tail, 1);
        arena.pert_remove(1);
        assert_eq!(arena.vertices[0].pert_head, NIL);
        assert_eq!(arena.vertices[0].pert_tail, NIL);
    }
}
