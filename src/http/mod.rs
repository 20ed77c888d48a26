//! HTTP API module for the graph index
//!
//! Provides REST endpoints for:
//! - Pattern and one-line queries
//! - Entry ingestion and lookup
//! - Subject listing

pub mod server;

pub use server::{
    create_server, start_server, AddItemRequest, AddItemResponse, AppState, ErrorResponse,
    HealthResponse, LineQueryRequest, OntologyResponse, PatternQueryRequest, QueryResponse,
    SubjectsResponse,
};
