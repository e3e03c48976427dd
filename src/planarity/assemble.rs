//! Embedding assembler.
//!
//! Runs once every vertex has been processed. Joins the components that are
//! still separate into their parent vertices, resolves the lazy flip flags
//! top-down, reads the rotations out of the half-edge lists and traces the
//! external face around the DFS root.

use std::collections::BTreeMap;

use crate::embedding::faces::RotationIndex;
use crate::embedding::{Embedding, EmbeddingError};
use crate::types::VertexId;
use super::arena::{Arena, ArcKind, NIL};
use super::merge::merge_vertex;

/// Turn the fully processed arena into an [`Embedding`].
pub(crate) fn assemble(arena: &mut Arena) -> Result<Embedding, EmbeddingError> {
    let n = arena.n();

    for c in 1..n {
        let root = arena.root_of(c);
        if arena.nodes[root].link[0] != NIL {
            let parent = arena.vertices[c].parent;
            arena.sep_remove(c);
            merge_vertex(arena, parent, 0, root);
        }
    }

    // DFS indices are a preorder, so parents are settled before children.
    let mut odd = vec![false; n];
    for u in 1..n {
        odd[u] = odd[arena.vertices[u].parent] ^ arena.roots[u].flipped;
        if odd[u] {
            arena.invert(u);
        }
    }

    let mut rotations: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
    for u in 0..n {
        let rotation = arena
            .arcs_of(u)
            .filter(|&arc| arena.arcs[arc].kind != ArcKind::ShortCircuit)
            .map(|arc| {
                let neighbor = arena.arcs[arc].neighbor;
                debug_assert!(!arena.is_root(neighbor), "half-edge still points at a root");
                arena.vertices[neighbor].id
            })
            .collect();
        rotations.insert(arena.vertices[u].id, rotation);
    }

    let start = arena.vertices[0].id;
    let external_face = match rotations.get(&start).and_then(|r| r.first()) {
        None => vec![start],
        Some(&first) => RotationIndex::new(&rotations)
            .trace((start, first))
            .ok_or(EmbeddingError::ExternalFaceNotAFace)?,
    };

    Ok(Embedding::from_engine(rotations, external_face))
}
