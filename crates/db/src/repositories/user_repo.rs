//! Repository for the `users` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use plinth_core::listing::{ListQuery, Sort};

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str =
    "id, uuid, email, display_name, api_token, is_active, created_at, modified_at";

const DEFAULT_ORDER: &str = "created_at DESC";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with the given opaque API token.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUser,
        api_token: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, api_token)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(api_token)
            .fetch_one(pool)
            .await
    }

    /// Whether a user with the given email already exists.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Resolve an active user from a bearer token. Inactive users cannot
    /// authenticate.
    pub async fn find_by_api_token(
        pool: &PgPool,
        api_token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE api_token = $1 AND is_active = TRUE");
        sqlx::query_as::<_, User>(&query)
            .bind(api_token)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by external uuid.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE uuid = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// List users for the given query, returning the page rows and the
    /// total filtered count.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<(Vec<User>, i64), sqlx::Error> {
        let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_builder, query);
        let count: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users"));
        push_filters(&mut builder, query);
        builder.push(" ORDER BY ");
        builder.push(order_clause(query.sort.as_ref()));
        builder.push(" LIMIT ");
        builder.push_bind(query.page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.page.offset());

        let rows = builder.build_query_as::<User>().fetch_all(pool).await?;
        Ok((rows, count))
    }

    /// Update a user by uuid. Only non-`None` fields are applied.
    pub async fn update_by_uuid(
        pool: &PgPool,
        uuid: Uuid,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                is_active = COALESCE($3, is_active),
                modified_at = NOW()
             WHERE uuid = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(uuid)
            .bind(&input.display_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}

fn push_filters(builder: &mut QueryBuilder<Postgres>, query: &ListQuery) {
    let mut separator = " WHERE ";
    for (field, value) in &query.filters {
        if field == "is_active" {
            match value.parse::<bool>() {
                Ok(flag) => {
                    builder.push(separator);
                    builder.push("is_active = ");
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
