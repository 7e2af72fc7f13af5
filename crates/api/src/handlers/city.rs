//! The city resource.
//!
//! Cities support the full CRUD set. Deletion is soft: the row is retired
//! in place with an actor stamp, and a retired row answers 410 on
//! retrieve/update rather than 404.

use async_trait::async_trait;
use uuid::Uuid;

use plinth_core::error::CoreError;
use plinth_core::fields::{FieldDescriptor, FieldKind};
use plinth_core::listing::ListQuery;
use plinth_db::models::city::{City, CreateCity, UpdateCity};
use plinth_db::repositories::CityRepo;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::resource::CrudResource;
use crate::state::AppState;

const CITY_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::required("name", FieldKind::Text)];

const CITY_LIST_FIELDS: &[&str] = &["id", "uuid", "name", "is_deleted"];

const CITY_TABLE_COLUMNS: &[(&str, &str)] = &[("name", "City Name")];

const CITY_SORTABLE: &[&str] = &["name", "created_at", "modified_at"];

const CITY_FILTERABLE: &[&str] = &["is_deleted"];

pub struct CityResource;

#[async_trait]
impl CrudResource for CityResource {
    const ENTITY: &'static str = "City";

    type Row = City;
    type Create = CreateCity;
    type Update = UpdateCity;

    fn fields() -> &'static [FieldDescriptor] {
        CITY_FIELDS
    }

    fn list_fields() -> &'static [&'static str] {
        CITY_LIST_FIELDS
    }

    fn table_columns() -> &'static [(&'static str, &'static str)] {
        CITY_TABLE_COLUMNS
    }

    fn sortable_fields() -> &'static [&'static str] {
        CITY_SORTABLE
    }

    fn filterable_fields() -> &'static [&'static str] {
        CITY_FILTERABLE
    }

    async fn list(state: &AppState, query: &ListQuery) -> AppResult<(Vec<City>, i64)> {
        Ok(CityRepo::list(&state.pool, query).await?)
    }

    async fn retrieve(state: &AppState, uuid: Uuid) -> AppResult<City> {
        let city = CityRepo::find_by_uuid(&state.pool, uuid)
            .await?
            .ok_or(CoreError::NotFound { entity: "City" })?;
        if city.is_deleted {
            return Err(CoreError::Gone { entity: "City" }.into());
        }
        Ok(city)
    }

    async fn create(state: &AppState, _actor: &CurrentUser, input: CreateCity) -> AppResult<City> {
        if CityRepo::name_exists(&state.pool, &input.name, None).await? {
            return Err(CoreError::field("name", "City with this name already exists.").into());
        }
        Ok(CityRepo::create(&state.pool, &input).await?)
    }

    async fn update(
        state: &AppState,
        _actor: &CurrentUser,
        uuid: Uuid,
        input: UpdateCity,
    ) -> AppResult<City> {
        // Resolve first so a retired row answers 410, not a silent miss.
        Self::retrieve(state, uuid).await?;

        if let Some(name) = &input.name {
            if CityRepo::name_exists(&state.pool, name, Some(uuid)).await? {
                return Err(
                    CoreError::field("name", "City with this name already exists.").into(),
                );
            }
        }

        CityRepo::update_by_uuid(&state.pool, uuid, &input)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "City" }.into())
    }

    async fn destroy(state: &AppState, actor: &CurrentUser, uuid: Uuid) -> AppResult<()> {
        let city = CityRepo::find_by_uuid(&state.pool, uuid)
            .await?
            .ok_or(CoreError::NotFound { entity: "City" })?;

        // Deleting an already-retired row is a no-op success; the original
        // deletion stamp is preserved.
        if city.is_deleted {
            return Ok(());
        }

        CityRepo::soft_delete_by_uuid(&state.pool, uuid, actor.id).await?;
        Ok(())
    }
}
