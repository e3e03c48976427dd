//! Face tracing over a rotation system.
//!
//! A dart `(u, w)` is the edge `u-w` traversed from `u` to `w`. With
//! clockwise rotations, the dart following `(u, w)` on the same face is
//! `(w, x)` where `x` is the clockwise successor of `u` around `w`. Bounded
//! faces come out counterclockwise, the external face clockwise.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::VertexId;

/// Position lookup for rotation lists.
pub(crate) struct RotationIndex<'a> {
    rotations: &'a BTreeMap<VertexId, Vec<VertexId>>,
    /// (w, u) -> index of u in the rotation of w.
    position: HashMap<(VertexId, VertexId), usize>,
}

impl<'a> RotationIndex<'a> {
    pub(crate) fn new(rotations: &'a BTreeMap<VertexId, Vec<VertexId>>) -> Self {
        let mut position = HashMap::with_capacity(rotations.values().map(Vec::len).sum());
        for (&w, rotation) in rotations {
            for (i, &u) in rotation.iter().enumerate() {
                position.insert((w, u), i);
            }
        }
        Self { rotations, position }
    }

    /// Check whether `u` appears in the rotation of `w`.
    pub(crate) fn contains(&self, w: VertexId, u: VertexId) -> bool {
        self.position.contains_key(&(w, u))
    }

    /// Clockwise successor of `u` around `w`.
    pub(crate) fn successor(&self, w: VertexId, u: VertexId) -> Option<VertexId> {
        let rotation = self.rotations.get(&w)?;
        let i = *self.position.get(&(w, u))?;
        Some(rotation[(i + 1) % rotation.len()])
    }

    /// Dart following `(u, w)` on its face.
    pub(crate) fn next_dart(&self, dart: (VertexId, VertexId)) -> Option<(VertexId, VertexId)> {
        let (u, w) = dart;
        self.successor(w, u).map(|x| (w, x))
    }

    /// Closed walk of the face containing `start`, as the tails of its darts.
    ///
    /// Returns `None` if the rotation system is inconsistent along the way.
    pub(crate) fn trace(&self, start: (VertexId, VertexId)) -> Option<Vec<VertexId>> {
        let limit = self.position.len();
        let mut walk = Vec::new();
        let mut dart = start;
        loop {
            walk.push(dart.0);
            dart = self.next_dart(dart)?;
            if dart == start {
                return Some(walk);
            }
            if walk.len() > limit {
                return None;
            }
        }
    }

    /// All faces, each as a closed walk, in deterministic order.
    pub(crate) fn faces(&self) -> Option<Vec<Vec<VertexId>>> {
        let mut seen: HashSet<(VertexId, VertexId)> = HashSet::with_capacity(self.position.len());
        let mut faces = Vec::new();
        for (&u, rotation) in self.rotations {
            for &w in rotation {
                if seen.contains(&(u, w)) {
                    continue;
                }
                let walk = self.trace((u, w))?;
                for i in 0..walk.len() {
                    seen.insert((walk[i], walk[(i + 1) % walk.len()]));
                }
                faces.push(walk);
            }
        }
        Some(faces)
    }
}
