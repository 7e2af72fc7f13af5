//! The user resource.
//!
//! Users are never deleted through the API, so destroy keeps its default
//! method-not-allowed body. Deactivation (`is_active = false`) is the
//! supported way to retire an account; inactive users cannot authenticate.
//! Account creation dispatches a welcome email in the background.

use async_trait::async_trait;
use uuid::Uuid;

use plinth_core::error::CoreError;
use plinth_core::fields::{FieldDescriptor, FieldKind};
use plinth_core::listing::{ListQuery, SortOption};
use plinth_db::models::user::{CreateUser, UpdateUser, User};
use plinth_db::repositories::UserRepo;

use crate::auth::{generate_api_token, CurrentUser};
use crate::background::OutboundEmail;
use crate::error::AppResult;
use crate::resource::CrudResource;
use crate::state::AppState;

const USER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required("email", FieldKind::Email),
    FieldDescriptor::required("display_name", FieldKind::Text),
    FieldDescriptor::optional("is_active", FieldKind::Boolean),
];

const USER_LIST_FIELDS: &[&str] = &["id", "uuid", "email", "display_name", "is_active"];

const USER_SORTABLE: &[&str] = &["display_name", "email", "created_at"];

const USER_FILTERABLE: &[&str] = &["is_active"];

pub struct UserResource;

#[async_trait]
impl CrudResource for UserResource {
    const ENTITY: &'static str = "User";

    type Row = User;
    type Create = CreateUser;
    type Update = UpdateUser;

    fn fields() -> &'static [FieldDescriptor] {
        USER_FIELDS
    }

    fn list_fields() -> &'static [&'static str] {
        USER_LIST_FIELDS
    }

    fn sortable_fields() -> &'static [&'static str] {
        USER_SORTABLE
    }

    fn filterable_fields() -> &'static [&'static str] {
        USER_FILTERABLE
    }

    fn sort_options() -> Vec<SortOption> {
        vec![
            SortOption {
                id: "display_name",
                label: "A to Z",
            },
            SortOption {
                id: "-display_name",
                label: "Z to A",
            },
            SortOption {
                id: "-created_at",
                label: "Newest first",
            },
        ]
    }

    async fn list(state: &AppState, query: &ListQuery) -> AppResult<(Vec<User>, i64)> {
        Ok(UserRepo::list(&state.pool, query).await?)
    }

    async fn retrieve(state: &AppState, uuid: Uuid) -> AppResult<User> {
        UserRepo::find_by_uuid(&state.pool, uuid)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "User" }.into())
    }

    async fn create(state: &AppState, _actor: &CurrentUser, input: CreateUser) -> AppResult<User> {
        if UserRepo::email_exists(&state.pool, &input.email).await? {
            return Err(CoreError::field("email", "User with this email already exists.").into());
        }
        let api_token = generate_api_token();
        Ok(UserRepo::create(&state.pool, &input, &api_token).await?)
    }

    async fn after_create(state: &AppState, _actor: &CurrentUser, row: &User) {
        state
            .mailer
            .dispatch(OutboundEmail::welcome(&row.email, &row.display_name));
    }

    async fn update(
        state: &AppState,
        _actor: &CurrentUser,
        uuid: Uuid,
        input: UpdateUser,
    ) -> AppResult<User> {
        UserRepo::update_by_uuid(&state.pool, uuid, &input)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "User" }.into())
    }
}
