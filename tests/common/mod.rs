#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use shorty::api::handlers::health_handler;
use shorty::api::routes::api_routes;
use shorty::application::services::{Allocator, AllocatorConfig, LinkService};
use shorty::domain::entities::{ShortCode, UrlMapping};
use shorty::domain::repositories::{StoreError, UrlStore};
use shorty::infrastructure::cache::NullCache;
use shorty::infrastructure::persistence::MemoryUrlStore;
use shorty::state::AppState;
use shorty::utils::code_generator::CodeGenerator;
use std::sync::Arc;

pub const BASE_URL: &str = "http://sho.rt";

/// Builds application state over the given store with caching disabled.
pub fn create_test_state(store: Arc<dyn UrlStore>) -> AppState {
    let allocator = Arc::new(Allocator::new(
        store.clone(),
        CodeGenerator::os(6).unwrap(),
        AllocatorConfig::default(),
    ));
    let link_service = Arc::new(LinkService::new(
        allocator,
        store,
        Arc::new(NullCache::new()),
        BASE_URL,
    ));

    AppState::new(link_service)
}

/// Router with the same paths as production, without the outer middleware.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

/// Test server over a fresh in-memory store.
///
/// The store handle is returned so tests can seed or inspect it.
pub fn memory_server() -> (TestServer, Arc<MemoryUrlStore>) {
    let store = Arc::new(MemoryUrlStore::new());
    let app = create_test_app(create_test_state(store.clone()));

    (TestServer::new(app).unwrap(), store)
}

pub fn server_with_store(store: Arc<dyn UrlStore>) -> TestServer {
    TestServer::new(create_test_app(create_test_state(store))).unwrap()
}

/// Store whose every operation fails as if the database were down.
pub struct UnavailableStore;

#[async_trait]
impl UrlStore for UnavailableStore {
    async fn exists(&self, _code: &ShortCode) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn save(&self, _code: &ShortCode, _original_url: &str) -> Result<UrlMapping, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn resolve(&self, _code: &ShortCode) -> Result<UrlMapping, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
