//! Planarity REST Service
//!
//! Exposes the planarity tester as a REST API.
//!
//! ## Endpoints
//!
//! - `POST /api/embed` - Test a graph and return its embedding
//! - `POST /api/embed/batch` - Batch testing under one policy
//! - `POST /api/embedding/validate` - Validate caller-supplied rotations
//! - `POST /api/embedding/flip` - Mirror an embedding
//! - `GET /api/policies` - List registered policies
//! - `POST /api/policies` - Register a new policy
//! - `GET /api/policies/:params_hash` - Fetch one policy
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_embed_metrics};
pub use routes::{create_router, AppState};
pub use state::{PolicyRef, PolicyRegistry, RegistryError, ServiceState};
