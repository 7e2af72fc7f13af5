//! Repository for the `cities` table.
//!
//! Lookups are by external uuid. Soft delete is a single UPDATE that flips
//! the flag and stamps `deleted_at` / `deleted_by` together, so a row can
//! never end up deleted without its actor stamp.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use plinth_core::listing::{ListQuery, Sort};
use plinth_core::types::DbId;

use crate::models::city::{City, CreateCity, UpdateCity};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, uuid, name, is_deleted, deleted_at, deleted_by, created_at, modified_at";

/// Default list order: active rows first, newest first within each group.
const DEFAULT_ORDER: &str = "is_deleted ASC, created_at DESC";

/// Provides CRUD operations for cities.
pub struct CityRepo;

impl CityRepo {
    /// Insert a new city, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCity) -> Result<City, sqlx::Error> {
        let query = format!("INSERT INTO cities (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, City>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Whether an (active or retired) city with the given name exists,
    /// optionally excluding one row. Backs the field-level duplicate-name
    /// validation; the `uq_cities_name` constraint remains the final word.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM cities WHERE name = $1 AND ($2::uuid IS NULL OR uuid <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }

    /// Find a city by external uuid, including retired rows. Callers
    /// distinguish active from retired via `is_deleted`.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cities WHERE uuid = $1");
        sqlx::query_as::<_, City>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List cities for the given query, returning the page rows and the
    /// total filtered count.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<(Vec<City>, i64), sqlx::Error> {
        let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM cities");
        push_filters(&mut count_builder, query);
        let count: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM cities"));
        push_filters(&mut builder, query);
        builder.push(" ORDER BY ");
        builder.push(order_clause(query.sort.as_ref()));
        builder.push(" LIMIT ");
        builder.push_bind(query.page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.page.offset());

        let rows = builder.build_query_as::<City>().fetch_all(pool).await?;
        Ok((rows, count))
    }

    /// Update an active city by uuid. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no active row matches.
    pub async fn update_by_uuid(
        pool: &PgPool,
        uuid: Uuid,
        input: &UpdateCity,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!(
            "UPDATE cities SET
                name = COALESCE($2, name),
                modified_at = NOW()
             WHERE uuid = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(uuid)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a city, stamping the deleting actor in the same write.
    ///
    /// Returns `true` if a row was retired; `false` means the row was
    /// already retired (or absent), in which case nothing is re-stamped.
    pub async fn soft_delete_by_uuid(
        pool: &PgPool,
        uuid: Uuid,
        actor_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cities SET
                is_deleted = TRUE,
                deleted_at = NOW(),
                deleted_by = $2,
                modified_at = NOW()
             WHERE uuid = $1 AND is_deleted = FALSE",
        )
        .bind(uuid)
        .bind(actor_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total row count including retired rows.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cities")
            .fetch_one(pool)
            .await
    }
}

/// Push the allow-listed filters as a WHERE clause.
///
/// Only `is_deleted` is filterable; unparseable values are ignored rather
/// than erroring, matching the allow-list contract.
fn push_filters(builder: &mut QueryBuilder<Postgres>, query: &ListQuery) {
    let mut separator = " WHERE ";
    for (field, value) in &query.filters {
        if field == "is_deleted" {
            match value.parse::<bool>() {
                Ok(flag) => {
                    builder.push(separator);
                    builder.push("is_deleted = ");
                    builder.push_bind(flag);
                    separator = " AND ";
                }
                Err(_) => {
                    tracing::debug!(field, value, "Ignoring unparseable filter value");
                }
            }
        }
    }
}

/// ORDER BY clause for a validated sort, or the default ordering.
///
/// The sort field was checked against the sortable allow-list upstream,
/// so interpolating it is safe.
fn order_clause(sort: Option<&Sort>) -> String {
    match sort {
        Some(sort) => format!(
            "{} {}",
            sort.field,
            if sort.descending { "DESC" } else { "ASC" }
        ),
        None => DEFAULT_ORDER.to_string(),
    }
}
