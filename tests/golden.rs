//! Golden tests for the planarity kernel.
//!
//! These tests check verdicts and embeddings on well-known graphs.

use std::collections::{BTreeMap, BTreeSet};

use planarity_kernel::{
    canonical_hash_hex, AdjacencyGraph, Embedding, EmbeddingError, InMemoryGraph, NonPlanarReason,
    PlanarityOutcome, PlanarityPolicyV1, PlanarityTester, VertexId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn v(id: u32) -> VertexId {
    VertexId::new(id)
}

fn graph(edges: &[(u32, u32)]) -> InMemoryGraph {
    InMemoryGraph::from_edges(edges.iter().copied()).unwrap()
}

fn complete(n: u32) -> InMemoryGraph {
    let mut edges = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            edges.push((a, b));
        }
    }
    graph(&edges)
}

fn cycle(n: u32) -> InMemoryGraph {
    graph(&(0..n).map(|i| (i, (i + 1) % n)).collect::<Vec<_>>())
}

fn petersen() -> InMemoryGraph {
    let mut edges = Vec::new();
    for i in 0..5 {
        edges.push((i, (i + 1) % 5));
        edges.push((i, i + 5));
        edges.push((i + 5, (i + 2) % 5 + 5));
    }
    graph(&edges)
}

/// Dodecahedron as three rings: a0..a4 (ids 0-4), b0..b9 (ids 5-14),
/// c0..c4 (ids 15-19).
fn dodecahedron() -> (InMemoryGraph, Vec<Vec<u32>>) {
    let a = |i: u32| i % 5;
    let b = |j: u32| 5 + j % 10;
    let c = |i: u32| 15 + i % 5;

    let mut edges = Vec::new();
    for i in 0..5 {
        edges.push((a(i), a(i + 1)));
        edges.push((a(i), b(2 * i)));
        edges.push((b(2 * i + 1), c(i)));
        edges.push((c(i), c(i + 1)));
    }
    for j in 0..10 {
        edges.push((b(j), b(j + 1)));
    }

    let mut faces = vec![(0..5).map(a).collect::<Vec<_>>(), (0..5).map(c).collect()];
    for i in 0..5 {
        faces.push(vec![a(i), a(i + 1), b(2 * i + 2), b(2 * i + 1), b(2 * i)]);
        faces.push(vec![c(i), c(i + 1), b(2 * i + 3), b(2 * i + 2), b(2 * i + 1)]);
    }
    (graph(&edges), faces)
}

/// Goldner-Harary: triangular bipyramid (apexes 0 and 1, equator 2-3-4)
/// with a vertex stacked into each of its six faces.
fn goldner_harary() -> InMemoryGraph {
    let mut edges = vec![(2, 3), (3, 4), (4, 2)];
    for apex in [0, 1] {
        for eq in [2, 3, 4] {
            edges.push((apex, eq));
        }
    }
    let faces = [(0, 2, 3), (0, 3, 4), (0, 4, 2), (1, 2, 3), (1, 3, 4), (1, 4, 2)];
    for (k, &(x, y, z)) in faces.iter().enumerate() {
        let s = 5 + k as u32;
        edges.extend([(s, x), (s, y), (s, z)]);
    }
    graph(&edges)
}

fn embed(graph: &InMemoryGraph, start: u32) -> Embedding {
    match PlanarityTester::default().test(graph, v(start)).unwrap() {
        PlanarityOutcome::Planar(embedding) => embedding,
        PlanarityOutcome::NotPlanar(reason) => panic!("expected planar, got {:?}", reason),
    }
}

/// Rotations list exactly the graph's neighbors and Euler's formula holds.
fn assert_well_formed(graph: &InMemoryGraph, embedding: &Embedding) {
    for (&vertex, rotation) in embedding.rotations() {
        let listed: BTreeSet<VertexId> = rotation.iter().copied().collect();
        let expected: BTreeSet<VertexId> = graph.neighbors(vertex).into_iter().collect();
        assert_eq!(listed, expected, "rotation of {}", vertex);
        assert_eq!(rotation.len(), expected.len(), "duplicate in rotation of {}", vertex);
    }
    let (n, m) = (embedding.num_vertices() as i64, embedding.num_edges() as i64);
    assert_eq!(n - m + embedding.num_faces() as i64, 2);
    embedding.validate().unwrap();
}

/// Smallest rotation of the walk or its reverse.
fn normalize_face(face: &[u32]) -> Vec<u32> {
    let mut best: Option<Vec<u32>> = None;
    let reversed: Vec<u32> = face.iter().rev().copied().collect();
    for walk in [face.to_vec(), reversed] {
        for shift in 0..walk.len() {
            let mut rotated = walk.clone();
            rotated.rotate_left(shift);
            if best.as_ref().map_or(true, |b| rotated < *b) {
                best = Some(rotated);
            }
        }
    }
    best.unwrap_or_default()
}

fn face_set(faces: &[Vec<VertexId>]) -> BTreeSet<Vec<u32>> {
    faces
        .iter()
        .map(|f| normalize_face(&f.iter().map(VertexId::get).collect::<Vec<_>>()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// NON-PLANAR GRAPHS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_k5_rejected_by_edge_count() {
    let outcome = PlanarityTester::default().test(&complete(5), v(0)).unwrap();
    assert_eq!(
        outcome,
        PlanarityOutcome::NotPlanar(NonPlanarReason::EulerBound { vertices: 5, edges: 10 })
    );
}

#[test]
fn test_k5_rejected_without_edge_count() {
    let tester = PlanarityTester::new(PlanarityPolicyV1::exhaustive());
    for start in 0..5 {
        let outcome = tester.test(&complete(5), v(start)).unwrap();
        assert!(
            matches!(outcome, PlanarityOutcome::NotPlanar(NonPlanarReason::UnembeddedBackEdge { .. })),
            "start {}: {:?}",
            start,
            outcome
        );
    }
}

#[test]
fn test_k33_rejected() {
    let k33 = graph(&[(0, 3), (0, 4), (0, 5), (1, 3), (1, 4), (1, 5), (2, 3), (2, 4), (2, 5)]);
    for start in 0..6 {
        let outcome = PlanarityTester::default().test(&k33, v(start)).unwrap();
        assert!(!outcome.is_planar(), "start {}", start);
    }
}

#[test]
fn test_petersen_rejected() {
    let outcome = PlanarityTester::default().test(&petersen(), v(0)).unwrap();
    assert!(matches!(
        outcome,
        PlanarityOutcome::NotPlanar(NonPlanarReason::UnembeddedBackEdge { .. })
    ));
}

#[test]
fn test_triangulation_plus_edge_rejected() {
    // Octahedron: 0/5 are poles, 1-2-3-4 the equator. Adding 1-3 gives 3V-5 edges.
    let mut edges = vec![(1, 2), (2, 3), (3, 4), (4, 1)];
    for eq in 1..5 {
        edges.push((0, eq));
        edges.push((5, eq));
    }
    let octahedron = graph(&edges);
    assert!(PlanarityTester::default().test(&octahedron, v(0)).unwrap().is_planar());

    edges.push((1, 3));
    let dense = graph(&edges);
    assert_eq!(
        PlanarityTester::default().test(&dense, v(0)).unwrap(),
        PlanarityOutcome::NotPlanar(NonPlanarReason::EulerBound { vertices: 6, edges: 13 })
    );
    let exhaustive = PlanarityTester::new(PlanarityPolicyV1::exhaustive());
    assert!(!exhaustive.test(&dense, v(0)).unwrap().is_planar());
}

// ─────────────────────────────────────────────────────────────────────────────
// SPARSE PLANAR GRAPHS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_vertices() {
    let g = graph(&[(7, 3)]);
    let embedding = embed(&g, 3);
    assert_eq!(embedding.rotation(v(3)), Some(&[v(7)][..]));
    assert_eq!(embedding.rotation(v(7)), Some(&[v(3)][..]));
    assert_eq!(embedding.external_face(), &[v(3), v(7)]);
    assert_eq!(embedding.num_faces(), 1);
}

#[test]
fn test_paths_and_trees() {
    let path = graph(&[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let embedding = embed(&path, 2);
    assert_well_formed(&path, &embedding);
    assert_eq!(embedding.num_faces(), 1);
    assert_eq!(embedding.external_face().len(), 8);
    assert_eq!(embedding.external_face()[0], v(2));

    let tree = graph(&[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (2, 6), (6, 7)]);
    let embedding = embed(&tree, 0);
    assert_well_formed(&tree, &embedding);
    assert_eq!(embedding.external_face().len(), 14);
}

#[test]
fn test_star_external_face_alternates() {
    let star = graph(&[(0, 1), (0, 2), (0, 3)]);
    let embedding = embed(&star, 0);
    let face = embedding.external_face();

    assert_eq!(face.len(), 6);
    let leaves: BTreeSet<VertexId> = face.iter().skip(1).step_by(2).copied().collect();
    assert!(face.iter().step_by(2).all(|&u| u == v(0)));
    assert_eq!(leaves, [v(1), v(2), v(3)].into_iter().collect());
}

#[test]
fn test_cycles_have_two_faces() {
    for n in 3..9 {
        let g = cycle(n);
        let embedding = embed(&g, 0);
        assert_well_formed(&g, &embedding);
        let faces = embedding.faces();
        assert_eq!(faces.len(), 2, "C{}", n);
        assert!(faces.iter().all(|f| f.len() == n as usize));
    }
}

#[test]
fn test_triangle() {
    let g = complete(3);
    let embedding = embed(&g, 0);
    assert_well_formed(&g, &embedding);
    assert_eq!(embedding.external_face().len(), 3);
    assert_eq!(embedding.external_face()[0], v(0));
}

#[test]
fn test_only_start_component_is_tested() {
    let mut g = complete(5);
    for (a, b) in [(10, 11), (11, 12), (12, 10)] {
        g.add_edge(v(a), v(b)).unwrap();
    }

    let embedding = embed(&g, 11);
    assert_eq!(embedding.num_vertices(), 3);
    assert_well_formed(&g, &embedding);

    assert!(!PlanarityTester::default().test(&g, v(0)).unwrap().is_planar());
}

// ─────────────────────────────────────────────────────────────────────────────
// DENSE PLANAR GRAPHS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_k4_every_start() {
    let g = complete(4);
    for start in 0..4 {
        let embedding = embed(&g, start);
        assert_well_formed(&g, &embedding);
        assert_eq!(embedding.num_faces(), 4);
        assert!(embedding.faces().iter().all(|f| f.len() == 3));
    }
}

#[test]
fn test_dodecahedron_faces() {
    let (g, reference) = dodecahedron();
    let expected: BTreeSet<Vec<u32>> = reference.iter().map(|f| normalize_face(f)).collect();
    assert_eq!(expected.len(), 12);

    for start in [0, 7, 15] {
        let embedding = embed(&g, start);
        assert_well_formed(&g, &embedding);
        assert_eq!(face_set(&embedding.faces()), expected, "start {}", start);
    }
}

#[test]
fn test_goldner_harary() {
    let g = goldner_harary();
    assert_eq!(g.num_vertices(), 11);
    assert_eq!(g.num_edges(), 27);

    let embedding = embed(&g, 0);
    assert_well_formed(&g, &embedding);
    let faces = embedding.faces();
    assert_eq!(faces.len(), 18);
    assert!(faces.iter().all(|f| f.len() == 3));
}

#[test]
fn test_wheel_faces() {
    // Hub 0, rim 1..=6.
    let mut edges: Vec<(u32, u32)> = (1..=6).map(|i| (0, i)).collect();
    edges.extend((1..=6).map(|i| (i, i % 6 + 1)));
    let g = graph(&edges);

    let embedding = embed(&g, 3);
    assert_well_formed(&g, &embedding);
    let faces = face_set(&embedding.faces());
    assert!(faces.contains(&normalize_face(&[1, 2, 3, 4, 5, 6])));
    for i in 1..=6 {
        assert!(faces.contains(&normalize_face(&[0, i, i % 6 + 1])));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DETERMINISM
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_same_input_same_embedding() {
    let g = goldner_harary();
    let first = embed(&g, 4);
    let second = embed(&g.clone(), 4);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(canonical_hash_hex(&first), first.fingerprint());
}

#[test]
fn test_verification_does_not_change_result() {
    let (g, _) = dodecahedron();
    let checked = PlanarityTester::new(PlanarityPolicyV1::new(true, true, None));
    let unchecked = PlanarityTester::new(PlanarityPolicyV1::new(true, false, None));
    assert_eq!(checked.test(&g, v(0)).unwrap(), unchecked.test(&g, v(0)).unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// EMBEDDING TYPE
// ─────────────────────────────────────────────────────────────────────────────

fn rotations(layout: &[(u32, &[u32])]) -> BTreeMap<VertexId, Vec<VertexId>> {
    layout.iter()
        .map(|(w, rot)| (v(*w), rot.iter().map(|&u| v(u)).collect()))
        .collect()
}

#[test]
fn test_constructor_rejections() {
    assert_eq!(Embedding::new(BTreeMap::new(), vec![]), Err(EmbeddingError::Empty));
    assert_eq!(
        Embedding::new(rotations(&[(0, &[0])]), vec![v(0)]),
        Err(EmbeddingError::SelfLoop(v(0)))
    );
    assert_eq!(
        Embedding::new(rotations(&[(0, &[1, 1]), (1, &[0])]), vec![v(0), v(1)]),
        Err(EmbeddingError::DuplicateNeighbor { vertex: v(0), neighbor: v(1) })
    );
    assert_eq!(
        Embedding::new(rotations(&[(0, &[1])]), vec![v(0), v(1)]),
        Err(EmbeddingError::VertexMissing(v(1)))
    );
    assert_eq!(
        Embedding::new(rotations(&[(0, &[1, 2]), (1, &[0, 2]), (2, &[1])]), vec![v(0), v(1), v(2)]),
        Err(EmbeddingError::MissingNeighbor { vertex: v(2), neighbor: v(0) })
    );
    assert_eq!(
        Embedding::new(rotations(&[(0, &[1]), (1, &[0, 2]), (2, &[1])]), vec![v(0), v(1), v(2)]),
        Err(EmbeddingError::ExternalFaceNotEdge { from: v(2), to: v(0) })
    );
    assert_eq!(
        Embedding::new(rotations(&[(0, &[]), (1, &[])]), vec![v(0)]),
        Err(EmbeddingError::EulerCharacteristic { found: 3 })
    );
}

#[test]
fn test_flip_round_trip_on_engine_output() {
    let (g, _) = dodecahedron();
    let embedding = embed(&g, 0);
    let mirrored = embedding.flip().unwrap();

    assert_ne!(mirrored, embedding);
    assert!(mirrored.equivalent_up_to_mirror(&embedding));
    assert_eq!(face_set(&mirrored.faces()), face_set(&embedding.faces()));
    assert_eq!(mirrored.flip().unwrap(), embedding);
}

#[test]
fn test_engine_output_survives_serde() {
    let g = goldner_harary();
    let embedding = embed(&g, 0);
    let json = serde_json::to_string(&embedding).unwrap();
    let back: Embedding = serde_json::from_str(&json).unwrap();
    assert_eq!(back, embedding);
}
