//! Palm-tree builder.
//!
//! Iterative DFS from the start vertex. Assigns DFS indices in preorder,
//! records every back edge once (on the ancestor, from the descendant's
//! side), computes least ancestors and lowpoints, then bucket-sorts each
//! vertex's children by lowpoint into its separated-children list.

use std::collections::HashMap;

use crate::graph::{AdjacencyGraph, GraphError};
use crate::policy::PlanarityPolicyV1;
use crate::types::VertexId;
use super::arena::{Arena, NodeIx, TreeVertex, NIL};
use super::PlanarityError;

/// Open DFS call: a vertex and how far through its neighbors we are.
struct Frame {
    dfi: NodeIx,
    neighbors: Vec<VertexId>,
    next: usize,
}

fn open<G: AdjacencyGraph + ?Sized>(
    graph: &G,
    id: VertexId,
    parent: NodeIx,
    vertices: &mut Vec<TreeVertex>,
    index: &mut HashMap<VertexId, NodeIx>,
    policy: &PlanarityPolicyV1,
) -> Result<Frame, PlanarityError> {
    // Every earlier open passed, so the budget is exactly the current count.
    if !policy.admits(vertices.len() + 1) {
        return Err(PlanarityError::ComponentTooLarge { limit: vertices.len() });
    }
    let dfi = vertices.len();
    index.insert(id, dfi);
    vertices.push(TreeVertex::new(id, dfi, parent));
    Ok(Frame {
        dfi,
        neighbors: graph.neighbors(id),
        next: 0,
    })
}

/// Build the DFS palm tree of the component containing `start`.
pub(crate) fn build<G: AdjacencyGraph + ?Sized>(
    graph: &G,
    start: VertexId,
    policy: &PlanarityPolicyV1,
) -> Result<Arena, PlanarityError> {
    if !graph.contains_vertex(start) {
        return Err(PlanarityError::StartVertexNotFound(start));
    }

    let mut vertices: Vec<TreeVertex> = Vec::new();
    let mut index: HashMap<VertexId, NodeIx> = HashMap::new();
    let mut degree_sum = 0usize;
    let mut stack = vec![open(graph, start, NIL, &mut vertices, &mut index, policy)?];

    while let Some(frame) = stack.last_mut() {
        let u = frame.dfi;
        let Some(&x) = frame.neighbors.get(frame.next) else {
            stack.pop();
            let vertex = &mut vertices[u];
            vertex.lowpoint = vertex.lowpoint.min(vertex.least_ancestor);
            let (parent, low) = (vertex.parent, vertex.lowpoint);
            if parent != NIL {
                vertices[parent].lowpoint = vertices[parent].lowpoint.min(low);
            }
            continue;
        };
        frame.next += 1;
        degree_sum += 1;

        if x == vertices[u].id {
            return Err(GraphError::SelfLoop(x).into());
        }
        match index.get(&x) {
            None => {
                if !graph.contains_vertex(x) {
                    return Err(GraphError::VertexNotFound(x).into());
                }
                let child = open(graph, x, u, &mut vertices, &mut index, policy)?;
                stack.push(child);
            }
            Some(&ancestor) if ancestor < u && ancestor != vertices[u].parent => {
                vertices[ancestor].back_edge_sources.push(u);
                vertices[u].least_ancestor = vertices[u].least_ancestor.min(ancestor);
            }
            // Tree edge to the parent, or a back edge already seen from below.
            Some(_) => {}
        }
    }

    let n = vertices.len();
    let mut arena = Arena::new(vertices, degree_sum / 2);

    let mut buckets: Vec<Vec<NodeIx>> = vec![Vec::new(); n];
    for c in 1..n {
        buckets[arena.vertices[c].lowpoint].push(c);
    }
    let mut tail = vec![NIL; n];
    for c in buckets.into_iter().flatten() {
        arena.sep_push_back(c, &mut tail);
    }

    Ok(arena)
}
