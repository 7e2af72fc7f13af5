//! The generic resource controller.
//!
//! [`CrudResource`] normalizes heterogeneous resources into one uniform
//! list/create/retrieve/update/destroy contract. Resources are composed
//! explicitly: each implementation supplies its row/DTO types, its static
//! field descriptors, and its listing policies; the generic handlers below
//! apply validation, logging, and the response envelope identically for
//! every resource.
//!
//! Operations a resource does not declare keep their default bodies, which
//! answer method-not-allowed inside the envelope instead of leaking a
//! framework default.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use plinth_core::error::CoreError;
use plinth_core::fields::{self, FieldDescriptor};
use plinth_core::listing::{default_sort_options, ListQuery, Page, SortOption};
use plinth_core::validation;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// A resource exposed through the uniform CRUD surface.
///
/// Default operation bodies return [`CoreError::MethodNotAllowed`];
/// implementations override only what the resource actually supports.
#[async_trait]
pub trait CrudResource: Send + Sync + 'static {
    /// Entity name used in trace entries and error payloads.
    const ENTITY: &'static str;

    /// Read representation. Never accepts input.
    type Row: Serialize + Send + Sync;
    /// Validated create payload.
    type Create: DeserializeOwned + Validate + Send;
    /// Validated update payload (all fields optional).
    type Update: DeserializeOwned + Validate + Send;

    /// Writable field descriptors, for create/update form metadata.
    fn fields() -> &'static [FieldDescriptor];

    /// Field names of the read representation, for auto-derived table
    /// columns.
    fn list_fields() -> &'static [&'static str];

    /// Explicit table columns `(id, label)`. Empty means auto-derive from
    /// [`Self::list_fields`].
    fn table_columns() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Fields a client may sort by.
    fn sortable_fields() -> &'static [&'static str];

    /// Fields a client may filter by. Anything else is ignored.
    fn filterable_fields() -> &'static [&'static str] {
        &[]
    }

    /// Sort options surfaced in table metadata.
    fn sort_options() -> Vec<SortOption> {
        default_sort_options()
    }

    /// Return one page of rows plus the total filtered count.
    async fn list(_state: &AppState, _query: &ListQuery) -> AppResult<(Vec<Self::Row>, i64)> {
        Err(AppError::Core(CoreError::MethodNotAllowed))
    }

    /// Resolve an entity by external identifier. Must distinguish retired
    /// (gone) from never-existed (not found).
    async fn retrieve(_state: &AppState, _uuid: Uuid) -> AppResult<Self::Row> {
        Err(AppError::Core(CoreError::MethodNotAllowed))
    }

    /// Persist a validated create payload.
    async fn create(
        _state: &AppState,
        _actor: &CurrentUser,
        _input: Self::Create,
    ) -> AppResult<Self::Row> {
        Err(AppError::Core(CoreError::MethodNotAllowed))
    }

    /// Hook invoked after a successful create. Default no-op; failures
    /// inside the hook must be handled by the hook itself.
    async fn after_create(_state: &AppState, _actor: &CurrentUser, _row: &Self::Row) {}

    /// Apply a validated update payload to the entity.
    async fn update(
        _state: &AppState,
        _actor: &CurrentUser,
        _uuid: Uuid,
        _input: Self::Update,
    ) -> AppResult<Self::Row> {
        Err(AppError::Core(CoreError::MethodNotAllowed))
    }

    /// Delete the entity (soft where supported), stamping the acting user.
    async fn destroy(_state: &AppState, _actor: &CurrentUser, _uuid: Uuid) -> AppResult<()> {
        Err(AppError::Core(CoreError::MethodNotAllowed))
    }
}

/// Routes for one resource, mounted under its collection path.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /table-meta   -> table columns + sort options
/// GET    /meta         -> create-form metadata
/// GET    /{id}         -> retrieve
/// PUT    /{id}         -> update
/// DELETE /{id}         -> destroy
/// GET    /{id}/meta    -> update-form metadata
/// ```
pub fn crud_router<R: CrudResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/table-meta", get(table_meta::<R>))
        .route("/meta", get(create_meta::<R>))
        .route(
            "/{id}",
            get(retrieve::<R>).put(update::<R>).delete(destroy::<R>),
        )
        .route("/{id}/meta", get(update_meta::<R>))
}

/// Parse a path identifier as an external uuid.
///
/// Anything that is not a uuid cannot name an entity, so it resolves to
/// not-found rather than a malformed-request error.
fn parse_identifier<R: CrudResource>(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Core(CoreError::NotFound { entity: R::ENTITY }))
}

/// Deserialize a JSON request body, surfacing failures inside the
/// envelope instead of as a framework rejection.
fn deserialize_payload<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|err| {
        AppError::Core(CoreError::validation(format!("Malformed request body: {err}")))
    })
}

/// GET /: paginated, filtered, sorted listing.
pub async fn list<R: CrudResource>(
    State(state): State<AppState>,
    _actor: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<ApiResponse<Page<R::Row>>> {
    let query = params.resolve(R::sortable_fields(), R::filterable_fields())?;
    let (rows, count) = R::list(&state, &query).await?;
    Ok(ApiResponse::ok(Page::new(rows, count, &query.page)))
}

/// POST /: validate, persist, run the post-create hook.
pub async fn create<R: CrudResource>(
    State(state): State<AppState>,
    actor: CurrentUser,
    body: Bytes,
) -> AppResult<ApiResponse<R::Row>> {
    let input: R::Create = deserialize_payload(&body)?;
    validation::validate(&input)?;

    tracing::debug!(entity = R::ENTITY, actor = %actor.email, "Creating entity");
    let row = R::create(&state, &actor, input).await?;
    R::after_create(&state, &actor, &row).await;

    Ok(ApiResponse::created(row))
}

/// GET /{id}: resolve by external identifier.
pub async fn retrieve<R: CrudResource>(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<R::Row>> {
    let uuid = parse_identifier::<R>(&id)?;
    tracing::debug!(entity = R::ENTITY, id = %uuid, actor = %actor.email, "Retrieving entity");
    let row = R::retrieve(&state, uuid).await?;
    Ok(ApiResponse::ok(row))
}

/// PUT /{id}: validate and apply an update.
pub async fn update<R: CrudResource>(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<R::Row>> {
    let uuid = parse_identifier::<R>(&id)?;
    let input: R::Update = deserialize_payload(&body)?;
    validation::validate(&input)?;

    tracing::debug!(entity = R::ENTITY, id = %uuid, actor = %actor.email, "Updating entity");
    let row = R::update(&state, &actor, uuid, input).await?;
    Ok(ApiResponse::ok(row))
}

/// DELETE /{id}: delete and answer with an empty-payload success
/// envelope, never the deleted object.
pub async fn destroy<R: CrudResource>(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let uuid = parse_identifier::<R>(&id)?;
    tracing::debug!(entity = R::ENTITY, id = %uuid, actor = %actor.email, "Deleting entity");
    R::destroy(&state, &actor, uuid).await?;
    Ok(ApiResponse::empty())
}

/// GET /table-meta: column id/label mapping plus sort options for
/// client-driven table rendering.
pub async fn table_meta<R: CrudResource>(
    State(_state): State<AppState>,
    _actor: CurrentUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let columns = fields::table_columns(R::table_columns(), R::list_fields());
    Ok(ApiResponse::ok(json!({
        "columns": columns,
        "sort_options": R::sort_options(),
    })))
}

/// GET /meta: create-form metadata. Requires no instance.
pub async fn create_meta<R: CrudResource>(
    State(_state): State<AppState>,
    _actor: CurrentUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    Ok(ApiResponse::ok(fields::create_meta(R::fields())))
}

/// GET /{id}/meta: update-form metadata with the current instance's
/// values as defaults.
pub async fn update_meta<R: CrudResource>(
    State(state): State<AppState>,
    _actor: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let uuid = parse_identifier::<R>(&id)?;
    let row = R::retrieve(&state, uuid).await?;
    let instance = serde_json::to_value(&row)
        .map_err(|err| AppError::Core(CoreError::Internal(err.to_string())))?;
    Ok(ApiResponse::ok(fields::update_meta(R::fields(), &instance)))
}
