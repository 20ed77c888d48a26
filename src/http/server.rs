//! HTTP API Server for the graph index
//!
//! Provides REST endpoints for pattern queries, one-line queries, entry
//! lookup, subject listing and ingestion over one shared [`GraphIndex`].

use crate::{
    core::{identifier::ResourceIdentifier, RawTriple},
    error::Error,
    indexing::graph_index::{GraphIndex, GraphIndexStats, GraphItem},
    parsing::graph_query_parser::parse_graph_query,
    querying::pattern::{QueryFilter, TriplePattern},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Storage key holding the ontology document
pub const ONTOLOGY_KEY: &str = "ontology.ttl";

/// Request for a pattern query; absent or empty positions are wildcards
#[derive(Debug, Default, Deserialize)]
pub struct PatternQueryRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub filter: QueryFilter,
}

/// Request for a one-line query such as `? type Message`
#[derive(Debug, Deserialize)]
pub struct LineQueryRequest {
    pub line: String,
    #[serde(default)]
    pub filter: QueryFilter,
}

/// Matched identifiers, rendered
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub identifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub identifier: ResourceIdentifier,
    #[serde(alias = "quads", default)]
    pub triples: Vec<RawTriple>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItemResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubjectsParams {
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectsResponse {
    pub subjects: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OntologyResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub stats: GraphIndexStats,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Shared application state
pub struct AppState {
    pub index: Arc<GraphIndex>,
}

/// Custom error type for API errors
pub enum ApiError {
    IndexError(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::IndexError(e) => {
                let status = match e {
                    Error::Parse(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
                    Error::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    log::error!("Request failed: {}", e);
                }
                (status, e.to_string())
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::IndexError(err)
    }
}

/// Create the HTTP server with all routes
pub fn create_server(index: Arc<GraphIndex>) -> Router {
    let state = Arc::new(AppState { index });

    // Configure CORS
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/graph/query", post(query_by_pattern))
        .route("/api/graph/query-line", post(query_by_line))
        .route("/api/graph/items", post(add_item))
        .route("/api/graph/items/*id", get(get_item))
        .route("/api/graph/subjects", get(list_subjects))
        .route("/api/graph/ontology", get(get_ontology))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn render(identifiers: Vec<ResourceIdentifier>) -> QueryResponse {
    QueryResponse { identifiers: identifiers.iter().map(ToString::to_string).collect() }
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let stats = state.index.stats().await?;
    Ok(Json(HealthResponse { message: "Graph index HTTP API is running".to_string(), stats }))
}

/// POST /api/graph/query - Match a triple pattern
async fn query_by_pattern(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PatternQueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let pattern = TriplePattern {
        subject: payload.subject,
        predicate: payload.predicate,
        object: payload.object,
    };
    let identifiers = state.index.query_items(&pattern, &payload.filter).await?;
    Ok(Json(render(identifiers)))
}

/// POST /api/graph/query-line - Parse and match a one-line query
async fn query_by_line(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LineQueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = parse_graph_query(&payload.line).map_err(Error::from)?;
    let identifiers = state.index.query_items(&query.into(), &payload.filter).await?;
    Ok(Json(render(identifiers)))
}

/// POST /api/graph/items - Ingest one entry
async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<AddItemResponse>), ApiError> {
    ResourceIdentifier::try_new(payload.identifier.resource_type(), payload.identifier.name())?;
    let id = payload.identifier.to_string();
    state.index.add_item(payload.identifier, payload.triples).await?;
    Ok((StatusCode::CREATED, Json(AddItemResponse { id })))
}

/// GET /api/graph/items/*id - Fetch one entry
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GraphItem>, ApiError> {
    let item = state
        .index
        .get_item(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("entry '{}'", id)))?;
    Ok(Json(item))
}

/// GET /api/graph/subjects?type= - Typed subjects
async fn list_subjects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubjectsParams>,
) -> Result<Json<SubjectsResponse>, ApiError> {
    let subjects = state.index.subjects(params.type_filter.as_deref()).await?;
    Ok(Json(SubjectsResponse { subjects }))
}

/// GET /api/graph/ontology - Ontology document kept next to the index
async fn get_ontology(State(state): State<Arc<AppState>>) -> Result<Json<OntologyResponse>, ApiError> {
    let bytes = state.index.storage().get(ONTOLOGY_KEY).await?.unwrap_or_default();
    Ok(Json(OntologyResponse { content: String::from_utf8_lossy(&bytes).into_owned() }))
}

/// Start the HTTP server on the specified address
pub async fn start_server(addr: &str, index: Arc<GraphIndex>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(index);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Graph index HTTP API listening on http://{}", addr);
    println!();
    println!("Available endpoints:");
    println!("  POST   /api/graph/query          - Match a triple pattern");
    println!("  POST   /api/graph/query-line     - Match a one-line query");
    println!("  POST   /api/graph/items          - Ingest an entry");
    println!("  GET    /api/graph/items/:id      - Get an entry");
    println!("  GET    /api/graph/subjects       - List typed subjects");
    println!("  GET    /api/graph/ontology       - Get the ontology document");
    println!("  GET    /health                   - Health check");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
