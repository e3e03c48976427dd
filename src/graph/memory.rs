//! In-memory adjacency-set graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::{Edge, VertexId};
use super::AdjacencyGraph;

/// Error type for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge from a vertex to itself.
    #[error("Self loop at {0}")]
    SelfLoop(VertexId),
    /// Vertex not present in the graph.
    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexId),
}

/// Simple undirected graph stored as adjacency sets.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order. Parallel edges
/// collapse into one; self loops are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryGraph {
    adjacency: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl InMemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list given as raw pairs.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(VertexId::new(a), VertexId::new(b))?;
        }
        Ok(graph)
    }

    /// Add a vertex (no-op if present).
    pub fn add_vertex(&mut self, v: VertexId) {
        self.adjacency.entry(v).or_default();
    }

    /// Add an undirected edge, inserting missing endpoints.
    ///
    /// Returns `true` if the edge was not present before.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        Ok(inserted)
    }

    /// Remove an undirected edge. Returns `true` if it was present.
    pub fn remove_edge(&mut self, a: VertexId, b: VertexId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .map(|set| set.remove(&b))
            .unwrap_or(false);
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
        removed
    }

    /// Check whether the edge exists.
    pub fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacency.get(&a).map(|set| set.contains(&b)).unwrap_or(false)
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Get number of edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// All vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    /// All edges in canonical order.
    pub fn edges(&self) -> Vec<Edge> {
        self.adjacency
            .iter()
            .flat_map(|(&a, set)| set.iter().filter_map(move |&b| if a < b { Edge::new(a, b) } else { None }))
            .collect()
    }

    /// Vertices reachable from `start`, in BFS order.
    pub fn component_of(&self, start: VertexId) -> Result<Vec<VertexId>, GraphError> {
        if !self.adjacency.contains_key(&start) {
            return Err(GraphError::VertexNotFound(start));
        }
        let mut seen: BTreeSet<VertexId> = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &u in &self.adjacency[&v] {
                if seen.insert(u) {
                    queue.push_back(u);
                }
            }
        }
        Ok(order)
    }

    /// Check whether every vertex is reachable from every other.
    pub fn is_connected(&self) -> bool {
        match self.adjacency.keys().next() {
            None => true,
            Some(&first) => self
                .component_of(first)
                .map(|c| c.len() == self.adjacency.len())
                .unwrap_or(false),
        }
    }

    /// Canonical fingerprint of the edge set and vertex set.
    pub fn fingerprint(&self) -> String {
        let vertices: Vec<VertexId> = self.vertices().collect();
        canonical_hash_hex(&(vertices, self.edges()))
    }
}

impl AdjacencyGraph for InMemoryGraph {
    fn contains_vertex(&self, v: VertexId) -> bool {
        self.adjacency.contains_key(&v)
    }

    fn neighbors(&self, v: VertexId) -> Vec<VertexId> {
        self.adjacency
            .get(&v)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(&v).map(BTreeSet::len).unwrap_or(0)
    }
}
