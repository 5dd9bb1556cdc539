use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::address::Address;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::health::HealthChecker;
use crate::id;
use crate::store::AddressStore;
use crate::validation::AddressValidator;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: AddressStore,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by a freshly seeded store
    pub fn new(config: Config) -> Self {
        Self::with_store(config, AddressStore::seeded())
    }

    pub fn with_store(config: Config, store: AddressStore) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Plain text greeting
pub async fn root() -> &'static str {
    "Hello, address book!"
}

/// List every address in insertion order
pub async fn list_addresses(State(state): State<AppState>) -> Result<Json<Vec<Address>>> {
    Ok(Json(state.store.list()?))
}

/// Validate and store a new address
pub async fn create_address(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let new_address = AddressValidator::validate_new_address(&body)?;
    let address = Address::from_new(id::generate(), new_address);

    // Location must be valid before the store is touched
    let location = HeaderValue::try_from(state.config.address_location(&address.id))
        .map_err(|e| ApiError::Internal(format!("invalid Location header: {}", e)))?;

    state.store.insert(address.clone())?;

    info!(
        target: "address_book::handlers",
        id = %address.id,
        "Address created"
    );

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(address)))
}

/// Delete the address with the given id
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.store.remove_by_id(&id)? {
        return Err(ApiError::NotFound(id));
    }

    info!(
        target: "address_book::handlers",
        id = %id,
        "Address deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthChecker::new(state.store).check_health())
}
