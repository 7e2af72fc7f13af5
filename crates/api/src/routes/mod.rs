//! Route composition.

pub mod health;

use axum::Router;

use crate::handlers::city::CityResource;
use crate::handlers::users::UserResource;
use crate::resource::crud_router;
use crate::state::AppState;

/// All versioned API routes, nested under `/api/v1` by the app router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cities", crud_router::<CityResource>())
        .nest("/users", crud_router::<UserResource>())
}
