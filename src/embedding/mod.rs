//! Combinatorial planar embeddings.
//!
//! An [`Embedding`] is a clockwise rotation of neighbors at every vertex plus
//! the external face as a clockwise closed walk. It is what the planarity
//! engine returns and all downstream consumers read; none of them needs the
//! engine's internal structures.
//!
//! ## Validation
//!
//! [`Embedding::new`] reconstructs the boundary structure implied by the
//! caller's data and rejects it unless:
//!
//! - every rotation is duplicate-free, loop-free and references only known
//!   vertices,
//! - rotations are symmetric (`u` lists `w` iff `w` lists `u`),
//! - consecutive external-face vertices are joined by edges,
//! - the external walk is exactly one face of the rotation system,
//! - the rotation system has Euler characteristic 2 (genus zero).

pub(crate) mod faces;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::graph::AdjacencyGraph;
use crate::types::VertexId;
use faces::RotationIndex;

/// Error type for embedding construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbeddingError {
    /// No vertices at all.
    #[error("Embedding has no vertices")]
    Empty,
    /// A rotation lists the same neighbor twice.
    #[error("Rotation of {vertex} lists {neighbor} more than once")]
    DuplicateNeighbor {
        /// Vertex whose rotation is invalid.
        vertex: VertexId,
        /// The repeated neighbor.
        neighbor: VertexId,
    },
    /// A rotation lists its own vertex.
    #[error("Rotation of {0} contains a self loop")]
    SelfLoop(VertexId),
    /// A vertex referenced somewhere has no rotation entry.
    #[error("Vertex {0} is referenced but missing from the rotation map")]
    VertexMissing(VertexId),
    /// A rotation omits a neighbor that lists it.
    #[error("Rotation of {vertex} omits neighbor {neighbor}")]
    MissingNeighbor {
        /// Vertex whose rotation is incomplete.
        vertex: VertexId,
        /// The omitted neighbor.
        neighbor: VertexId,
    },
    /// A rotation lists a vertex the underlying graph does not connect.
    #[error("Rotation of {vertex} lists {neighbor}, which is not adjacent in the graph")]
    UnexpectedNeighbor {
        /// Vertex whose rotation is invalid.
        vertex: VertexId,
        /// The extra neighbor.
        neighbor: VertexId,
    },
    /// Consecutive external-face vertices are not adjacent.
    #[error("External face steps from {from} to {to}, which is not an edge of the rotation")]
    ExternalFaceNotEdge {
        /// Tail of the missing edge.
        from: VertexId,
        /// Head of the missing edge.
        to: VertexId,
    },
    /// The external walk does not follow the rotation system.
    #[error("External face is not a face of the rotation system")]
    ExternalFaceNotAFace,
    /// The rotation system is not a genus-zero embedding of a connected graph.
    #[error("Euler characteristic is {found}, expected 2")]
    EulerCharacteristic {
        /// V - E + F of the rotation system.
        found: i64,
    },
}

/// Unvalidated embedding data, as supplied by callers or the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingParts {
    /// Clockwise neighbor order per vertex.
    pub rotations: BTreeMap<VertexId, Vec<VertexId>>,
    /// External face as a clockwise closed walk.
    pub external_face: Vec<VertexId>,
}

/// Validated combinatorial embedding of a connected planar graph.
///
/// Deserialization goes through the validating constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmbeddingParts")]
pub struct Embedding {
    rotations: BTreeMap<VertexId, Vec<VertexId>>,
    external_face: Vec<VertexId>,
}

impl Embedding {
    /// Build an embedding from caller-supplied rotation and external-face
    /// data, validating it (see module docs).
    pub fn new(
        rotations: BTreeMap<VertexId, Vec<VertexId>>,
        external_face: Vec<VertexId>,
    ) -> Result<Self, EmbeddingError> {
        validate(&rotations, &external_face)?;
        Ok(Self { rotations, external_face })
    }

    /// Build without validation. The engine's own output goes through here
    /// and is checked separately when the policy asks for it.
    pub(crate) fn from_engine(
        rotations: BTreeMap<VertexId, Vec<VertexId>>,
        external_face: Vec<VertexId>,
    ) -> Self {
        Self { rotations, external_face }
    }

    /// Re-run the validating constructor's checks.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        validate(&self.rotations, &self.external_face)
    }

    /// Check that every rotation is exactly the graph's neighbor set.
    pub fn validate_against<G: AdjacencyGraph + ?Sized>(&self, graph: &G) -> Result<(), EmbeddingError> {
        for (&vertex, rotation) in &self.rotations {
            if !graph.contains_vertex(vertex) {
                return Err(EmbeddingError::VertexMissing(vertex));
            }
            let listed: HashSet<VertexId> = rotation.iter().copied().collect();
            for neighbor in graph.neighbors(vertex) {
                if !listed.contains(&neighbor) {
                    return Err(EmbeddingError::MissingNeighbor { vertex, neighbor });
                }
            }
            if rotation.len() != graph.degree(vertex) {
                let actual: HashSet<VertexId> = graph.neighbors(vertex).into_iter().collect();
                if let Some(&neighbor) = rotation.iter().find(|u| !actual.contains(u)) {
                    return Err(EmbeddingError::UnexpectedNeighbor { vertex, neighbor });
                }
            }
        }
        Ok(())
    }

    /// Mirror image: every rotation reversed, external walk reversed.
    ///
    /// The walk keeps its first vertex, so `e.flip()?.flip()? == e`.
    pub fn flip(&self) -> Result<Self, EmbeddingError> {
        let rotations = self
            .rotations
            .iter()
            .map(|(&v, rotation)| (v, rotation.iter().rev().copied().collect()))
            .collect();
        let mut external_face = Vec::with_capacity(self.external_face.len());
        if let Some((&first, rest)) = self.external_face.split_first() {
            external_face.push(first);
            external_face.extend(rest.iter().rev().copied());
        }
        Self::new(rotations, external_face)
    }

    /// Clockwise rotation at `v`.
    pub fn rotation(&self, v: VertexId) -> Option<&[VertexId]> {
        self.rotations.get(&v).map(Vec::as_slice)
    }

    /// All rotations, keyed by vertex.
    pub fn rotations(&self) -> &BTreeMap<VertexId, Vec<VertexId>> {
        &self.rotations
    }

    /// External face as a clockwise closed walk (vertices may repeat).
    pub fn external_face(&self) -> &[VertexId] {
        &self.external_face
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.rotations.keys().copied()
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.rotations.len()
    }

    /// Get number of edges.
    pub fn num_edges(&self) -> usize {
        self.rotations.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Every face as a closed walk; bounded faces counterclockwise, the
    /// external face clockwise.
    pub fn faces(&self) -> Vec<Vec<VertexId>> {
        if self.num_edges() == 0 {
            return vec![self.external_face.clone()];
        }
        RotationIndex::new(&self.rotations).faces().unwrap_or_default()
    }

    /// Number of faces, including the external one.
    pub fn num_faces(&self) -> usize {
        self.faces().len()
    }

    /// Check whether `other` has the same rotations up to cyclic shift,
    /// either as-is or globally mirrored.
    pub fn equivalent_up_to_mirror(&self, other: &Embedding) -> bool {
        if self.rotations.len() != other.rotations.len() {
            return false;
        }
        let same = |mirrored: bool| {
            self.rotations.iter().all(|(v, rotation)| match other.rotations.get(v) {
                Some(theirs) if mirrored => {
                    let reversed: Vec<VertexId> = theirs.iter().rev().copied().collect();
                    cyclically_equal(rotation, &reversed)
                }
                Some(theirs) => cyclically_equal(rotation, theirs),
                None => false,
            })
        };
        same(false) || same(true)
    }

    /// Canonical fingerprint of rotations and external face.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Decompose into raw parts.
    pub fn into_parts(self) -> EmbeddingParts {
        EmbeddingParts {
            rotations: self.rotations,
            external_face: self.external_face,
        }
    }
}

impl TryFrom<EmbeddingParts> for Embedding {
    type Error = EmbeddingError;

    fn try_from(parts: EmbeddingParts) -> Result<Self, Self::Error> {
        Self::new(parts.rotations, parts.external_face)
    }
}

fn cyclically_equal(a: &[VertexId], b: &[VertexId]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    match b.iter().position(|&x| x == a[0]) {
        Some(offset) => (0..a.len()).all(|i| a[i] == b[(i + offset) % b.len()]),
        None => false,
    }
}

fn validate(
    rotations: &BTreeMap<VertexId, Vec<VertexId>>,
    external_face: &[VertexId],
) -> Result<(), EmbeddingError> {
    if rotations.is_empty() {
        return Err(EmbeddingError::Empty);
    }

    for (&vertex, rotation) in rotations {
        let mut listed: HashSet<VertexId> = HashSet::with_capacity(rotation.len());
        for &neighbor in rotation {
            if neighbor == vertex {
                return Err(EmbeddingError::SelfLoop(vertex));
            }
            if !rotations.contains_key(&neighbor) {
                return Err(EmbeddingError::VertexMissing(neighbor));
            }
            if !listed.insert(neighbor) {
                return Err(EmbeddingError::DuplicateNeighbor { vertex, neighbor });
            }
        }
    }

    let index = RotationIndex::new(rotations);
    for (&vertex, rotation) in rotations {
        for &neighbor in rotation {
            if !index.contains(neighbor, vertex) {
                return Err(EmbeddingError::MissingNeighbor { vertex: neighbor, neighbor: vertex });
            }
        }
    }

    for &v in external_face {
        if !rotations.contains_key(&v) {
            return Err(EmbeddingError::VertexMissing(v));
        }
    }

    let num_vertices = rotations.len() as i64;
    let num_edges = (rotations.values().map(Vec::len).sum::<usize>() / 2) as i64;

    if num_edges == 0 {
        // A single isolated vertex is its own external face.
        return match (num_vertices, external_face) {
            (1, [_]) => Ok(()),
            (1, _) => Err(EmbeddingError::ExternalFaceNotAFace),
            _ => Err(EmbeddingError::EulerCharacteristic { found: num_vertices + 1 }),
        };
    }

    if external_face.len() < 2 {
        return Err(EmbeddingError::ExternalFaceNotAFace);
    }
    for i in 0..external_face.len() {
        let from = external_face[i];
        let to = external_face[(i + 1) % external_face.len()];
        if !index.contains(from, to) {
            return Err(EmbeddingError::ExternalFaceNotEdge { from, to });
        }
    }

    let traced = index
        .trace((external_face[0], external_face[1]))
        .ok_or(EmbeddingError::ExternalFaceNotAFace)?;
    if traced != external_face {
        return Err(EmbeddingError::ExternalFaceNotAFace);
    }

    let num_faces = index
        .faces()
        .ok_or(EmbeddingError::ExternalFaceNotAFace)?
        .len() as i64;
    let found = num_vertices - num_edges + num_faces;
    if found != 2 {
        return Err(EmbeddingError::EulerCharacteristic { found });
    }
    Ok(())
}
