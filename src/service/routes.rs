//! Axum routes for the planarity service.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::embedding::{Embedding, EmbeddingParts};
use crate::graph::{GraphError, InMemoryGraph};
use crate::planarity::{CacheStats, PlanarityError, PlanarityOutcome};
use crate::policy::PlanarityPolicyV1;
use crate::types::VertexId;
use crate::PLANARITY_KERNEL_SCHEMA_VERSION;

use super::middleware::record_embed_metrics;
use super::state::{PolicyRef, ServiceState};

/// Type alias for the shared service state.
pub type AppState = ServiceState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response Types
// ============================================================================

/// Graph on the wire: an edge list plus optional isolated vertices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDto {
    /// Undirected edges as vertex id pairs.
    pub edges: Vec<(u32, u32)>,
    /// Extra vertices (isolated ones need to be listed here).
    #[serde(default)]
    pub vertices: Vec<u32>,
}

impl GraphDto {
    /// Build the in-memory graph.
    pub fn to_graph(&self) -> Result<InMemoryGraph, GraphError> {
        let mut graph = InMemoryGraph::from_edges(self.edges.iter().copied())?;
        for &v in &self.vertices {
            graph.add_vertex(VertexId::new(v));
        }
        Ok(graph)
    }
}

/// Request to test a graph and embed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// The graph.
    pub graph: GraphDto,
    /// Start vertex; defaults to the smallest vertex id.
    #[serde(default)]
    pub start: Option<u32>,
    /// Optional policy reference. If not provided, uses default policy.
    #[serde(default)]
    pub policy_ref: Option<PolicyRef>,
}

/// One graph in a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// The graph.
    pub graph: GraphDto,
    /// Start vertex; defaults to the smallest vertex id.
    #[serde(default)]
    pub start: Option<u32>,
}

/// Request to test several graphs under one policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedRequest {
    /// Graphs to test.
    pub graphs: Vec<BatchItem>,
    /// Policy reference (applies to all).
    #[serde(default)]
    pub policy_ref: Option<PolicyRef>,
}

/// Response for a single test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Planar with embedding, or the reason it is not.
    pub outcome: PlanarityOutcome,
    /// Fingerprint of the tested graph.
    pub graph_fingerprint: String,
    /// Fingerprint of the embedding, if planar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_fingerprint: Option<String>,
    /// Policy used.
    pub policy_ref: PolicyRef,
    /// Whether the outcome came from the cache.
    pub cache_hit: bool,
    /// Schema version.
    pub schema_version: String,
}

/// Batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedResponse {
    /// Successful results, in request order.
    pub results: Vec<EmbedResponse>,
    /// Policy used.
    pub policy_ref: PolicyRef,
    /// Number of successful tests.
    pub success_count: usize,
    /// Per-item failures.
    pub errors: Vec<BatchError>,
}

/// Failure for one batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Position in the request.
    pub index: usize,
    /// Error message.
    pub error: String,
}

/// Request to validate caller-supplied embedding data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateEmbeddingRequest {
    /// Rotations and external face.
    pub embedding: EmbeddingParts,
    /// If given, rotations must also match this graph's neighbor sets.
    #[serde(default)]
    pub graph: Option<GraphDto>,
}

/// Validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateEmbeddingResponse {
    /// Whether the embedding is valid.
    pub valid: bool,
    /// Reason if invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Fingerprint if valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Number of faces if valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_faces: Option<usize>,
}

/// Request to mirror an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipEmbeddingRequest {
    /// Embedding to mirror.
    pub embedding: EmbeddingParts,
}

/// Mirrored embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipEmbeddingResponse {
    /// The mirror image.
    pub embedding: Embedding,
    /// Its fingerprint.
    pub fingerprint: String,
}

/// Request to register a new policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPolicyRequest {
    pub policy: PlanarityPolicyV1,
}

/// Response containing a policy reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRefResponse {
    pub policy_ref: PolicyRef,
}

/// A registered policy with its reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub policy_ref: PolicyRef,
    pub policy: PlanarityPolicyV1,
}

/// List of registered policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyListResponse {
    pub policies: Vec<PolicyRef>,
    pub registry_fingerprint: String,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub schema_version: String,
    pub policy_count: usize,
    pub registry_fingerprint: String,
    /// Outcome cache usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheHealth>,
}

/// Shared outcome cache usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealth {
    pub entries: usize,
    pub capacity: usize,
}

impl From<CacheStats> for CacheHealth {
    fn from(stats: CacheStats) -> Self {
        Self {
            entries: stats.len,
            capacity: stats.cap,
        }
    }
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub details: Option<String>,
}

/// Structured error response with correlation ID for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Correlation ID for request tracing (matches X-Request-Id or generated UUID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: None,
            details: None,
        }
    }

    /// Add a correlation ID to the error.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(
            code = %self.code,
            error = %self.error,
            correlation_id = ?self.correlation_id,
            "Request error"
        );
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Correlation id from `X-Request-Id`, or a fresh UUID.
fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn api_error(status: StatusCode, error: ErrorResponse, correlation_id: &str) -> ApiError {
    tracing::warn!(
        code = %error.code,
        error = %error.error,
        correlation_id = %correlation_id,
        status = status.as_u16(),
        "Request error"
    );
    (status, Json(error.with_correlation_id(correlation_id)))
}

fn planarity_error(e: &PlanarityError) -> (StatusCode, ErrorResponse) {
    match e {
        PlanarityError::StartVertexNotFound(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("START_VERTEX_NOT_FOUND", e.to_string()),
        ),
        PlanarityError::InvalidGraph(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_GRAPH", e.to_string()),
        ),
        PlanarityError::ComponentTooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("COMPONENT_TOO_LARGE", e.to_string()),
        ),
        PlanarityError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL", e.to_string()),
        ),
    }
}

/// Test one graph; `Err` carries a status and error body.
fn embed_one(
    tester: &crate::planarity::CachedTester,
    policy_ref: &PolicyRef,
    graph: &GraphDto,
    start: Option<u32>,
) -> Result<EmbedResponse, (StatusCode, ErrorResponse)> {
    let started = Instant::now();
    let graph = graph.to_graph().map_err(|e| {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("INVALID_GRAPH", e.to_string()))
    })?;
    let start = match start.map(VertexId::new).or_else(|| graph.vertices().next()) {
        Some(start) => start,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("EMPTY_GRAPH", "Graph has no vertices"),
            ))
        }
    };

    let result = tester.test(&graph, start).map_err(|e| planarity_error(&e))?;
    let embedding_fingerprint = result.outcome.embedding().map(Embedding::fingerprint);

    record_embed_metrics(
        graph.num_vertices(),
        graph.num_edges(),
        result.outcome.is_planar(),
        result.cache_hit,
        started.elapsed().as_millis() as u64,
    );

    Ok(EmbedResponse {
        outcome: result.outcome,
        graph_fingerprint: graph.fingerprint(),
        embedding_fingerprint,
        policy_ref: policy_ref.clone(),
        cache_hit: result.cache_hit,
        schema_version: PLANARITY_KERNEL_SCHEMA_VERSION.to_string(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Test a graph for planarity and embed it.
async fn embed_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let cid = correlation_id(&headers);
    let (policy_ref, tester) = state.tester(request.policy_ref.as_ref()).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            ErrorResponse::new("POLICY_NOT_FOUND", format!("Policy not found: {:?}", request.policy_ref)),
            &cid,
        )
    })?;

    embed_one(&tester, &policy_ref, &request.graph, request.start)
        .map(Json)
        .map_err(|(status, error)| api_error(status, error, &cid))
}

/// Test several graphs under one policy.
async fn batch_embed_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<BatchEmbedRequest>,
) -> Result<Json<BatchEmbedResponse>, ApiError> {
    let cid = correlation_id(&headers);
    let (policy_ref, tester) = state.tester(request.policy_ref.as_ref()).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            ErrorResponse::new("POLICY_NOT_FOUND", format!("Policy not found: {:?}", request.policy_ref)),
            &cid,
        )
    })?;

    let mut results = Vec::new();
    let mut errors = Vec::new();

    for (index, item) in request.graphs.iter().enumerate() {
        match embed_one(&tester, &policy_ref, &item.graph, item.start) {
            Ok(response) => results.push(response),
            Err((_, error)) => errors.push(BatchError {
                index,
                error: error.error,
            }),
        }
    }

    Ok(Json(BatchEmbedResponse {
        success_count: results.len(),
        results,
        policy_ref,
        errors,
    }))
}

/// Validate caller-supplied embedding data.
async fn validate_embedding_handler(
    Json(request): Json<ValidateEmbeddingRequest>,
) -> Json<ValidateEmbeddingResponse> {
    let invalid = |reason: String| ValidateEmbeddingResponse {
        valid: false,
        reason: Some(reason),
        fingerprint: None,
        num_faces: None,
    };

    let embedding = match Embedding::try_from(request.embedding) {
        Ok(embedding) => embedding,
        Err(e) => return Json(invalid(e.to_string())),
    };

    if let Some(dto) = &request.graph {
        let graph = match dto.to_graph() {
            Ok(graph) => graph,
            Err(e) => return Json(invalid(format!("Invalid graph: {}", e))),
        };
        if let Err(e) = embedding.validate_against(&graph) {
            return Json(invalid(e.to_string()));
        }
    }

    Json(ValidateEmbeddingResponse {
        valid: true,
        reason: None,
        fingerprint: Some(embedding.fingerprint()),
        num_faces: Some(embedding.num_faces()),
    })
}

/// Mirror an embedding.
async fn flip_embedding_handler(
    headers: HeaderMap,
    Json(request): Json<FlipEmbeddingRequest>,
) -> Result<Json<FlipEmbeddingResponse>, ApiError> {
    let cid = correlation_id(&headers);
    let flipped = Embedding::try_from(request.embedding)
        .and_then(|e| e.flip())
        .map_err(|e| {
            api_error(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_EMBEDDING", e.to_string()),
                &cid,
            )
        })?;

    Ok(Json(FlipEmbeddingResponse {
        fingerprint: flipped.fingerprint(),
        embedding: flipped,
    }))
}

/// List registered policies.
async fn list_policies_handler(State(state): State<Arc<AppState>>) -> Json<PolicyListResponse> {
    let registry = state.policy_registry.read();
    Json(PolicyListResponse {
        policies: registry.list(),
        registry_fingerprint: registry.fingerprint().to_string(),
    })
}

/// Register a new policy.
///
/// Fails with 409 once the registry holds its maximum number of policies.
async fn register_policy_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RegisterPolicyRequest>,
) -> Result<Json<PolicyRefResponse>, ApiError> {
    let cid = correlation_id(&headers);
    let registered = state.policy_registry.write().register(request.policy);
    let policy_ref = registered.map_err(|e| {
        api_error(
            StatusCode::CONFLICT,
            ErrorResponse::new("POLICY_REGISTRY_FULL", e.to_string()),
            &cid,
        )
    })?;
    tracing::info!(params_hash = %policy_ref.params_hash, "Policy registered");
    Ok(Json(PolicyRefResponse { policy_ref }))
}

/// Fetch a registered policy by params hash.
async fn get_policy_handler(
    State(state): State<Arc<AppState>>,
    Path(params_hash): Path<String>,
) -> Result<Json<PolicyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let registry = state.policy_registry.read();
    match registry.find_by_hash(&params_hash) {
        Some((policy_ref, policy)) => Ok(Json(PolicyResponse {
            policy_ref: policy_ref.clone(),
            policy: policy.clone(),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("POLICY_NOT_FOUND", "Policy not found").with_details(params_hash)),
        )),
    }
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (policy_count, registry_fingerprint) = {
        let registry = state.policy_registry.read();
        (registry.len(), registry.fingerprint().to_string())
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: PLANARITY_KERNEL_SCHEMA_VERSION.to_string(),
        policy_count,
        registry_fingerprint,
        cache: state.cache_stats().map(CacheHealth::from),
    })
}

/// Liveness check endpoint.
///
/// Simple check that the service is running. Returns 200 if the process is alive.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness check endpoint.
///
/// Ready once at least one policy is registered.
async fn readiness_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    if state.policy_registry.read().is_empty() {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                details: Some("No policies registered".to_string()),
            }),
        ))
    } else {
        Ok(Json(ReadinessResponse {
            ready: true,
            details: None,
        }))
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the planarity service.
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Planarity
        .route("/api/embed", post(embed_handler))
        .route("/api/embed/batch", post(batch_embed_handler))
        // Embedding utilities
        .route("/api/embedding/validate", post(validate_embedding_handler))
        .route("/api/embedding/flip", post(flip_embedding_handler))
        // Policy management
        .route("/api/policies", get(list_policies_handler).post(register_policy_handler))
        .route("/api/policies/:params_hash", get(get_policy_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state)
}
