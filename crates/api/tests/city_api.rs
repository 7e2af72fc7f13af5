//! HTTP-level integration tests for the city endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json, seed_user};
use sqlx::PgPool;

use plinth_db::repositories::CityRepo;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_city_returns_enveloped_201(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/cities",
        Some(&token),
        serde_json::json!({"name": "Berlin"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["action_code"], "DO_NOTHING");
    assert_eq!(json["data"]["name"], "Berlin");
    assert!(json["data"]["uuid"].is_string());
    assert_eq!(json["data"]["is_deleted"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_name_is_rejected_without_inserting(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/cities",
        Some(&token),
        serde_json::json!({"name": "Berlin"}),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/cities",
        Some(&token),
        serde_json::json!({"name": "Berlin"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["action_code"], "DISPLAY_ERROR_MESSAGES");
    assert_eq!(json["data"]["name"][0], "City with this name already exists.");

    assert_eq!(CityRepo::count_all(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_name_returns_field_error(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/cities",
        Some(&token),
        serde_json::json!({"name": ""}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"][0], "This field may not be blank.");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

async fn seed_cities(pool: &PgPool, token: &str, names: &[&str]) {
    for name in names {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/cities",
            Some(token),
            serde_json::json!({"name": name}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_paginates_with_totals(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["A", "B", "C", "D", "E"]).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cities?page=2&page-size=2", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 5);
    assert_eq!(json["data"]["page"], 2);
    assert_eq!(json["data"]["page_size"], 2);
    assert_eq!(json["data"]["total_pages"], 3);
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_page_size_is_capped(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/cities?page-size=5000", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["page_size"], 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_huge_page_number_returns_empty_page(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["Berlin"]).await;

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/cities?page=9223372036854775807",
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_sort_descending_by_name(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["Amsterdam", "Zagreb", "Madrid"]).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cities?sort_by=-name", Some(&token)).await;
    let json = body_json(response).await;

    let names: Vec<&str> = json["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Zagreb", "Madrid", "Amsterdam"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_sort_field_returns_field_error(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/cities?sort_by=api_token", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["data"]["sort_by"][0], "Invalid field name for sorting.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_filter_is_ignored(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["Berlin"]).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cities?secret_flag=1", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_filter_by_is_deleted(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["Keep", "Drop"]).await;

    let app = common::build_test_app(pool.clone());
    let listing = body_json(get(app, "/api/v1/cities?sort_by=name", Some(&token)).await).await;
    let drop_uuid = listing["data"]["results"][0]["uuid"].as_str().unwrap().to_string();
    assert_eq!(listing["data"]["results"][0]["name"], "Drop");

    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/cities/{drop_uuid}"), Some(&token)).await;

    let app = common::build_test_app(pool.clone());
    let active = body_json(get(app, "/api/v1/cities?is_deleted=false", Some(&token)).await).await;
    assert_eq!(active["data"]["count"], 1);
    assert_eq!(active["data"]["results"][0]["name"], "Keep");

    let app = common::build_test_app(pool);
    let retired = body_json(get(app, "/api/v1/cities?is_deleted=true", Some(&token)).await).await;
    assert_eq!(retired["data"]["count"], 1);
    assert_eq!(retired["data"]["results"][0]["name"], "Drop");
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_table_meta_uses_explicit_columns(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/cities/table-meta", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let columns = json["data"]["columns"].as_object().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns["name"], "City Name");

    let options = json["data"]["sort_options"].as_array().unwrap();
    assert_eq!(options[0]["id"], "name");
    assert_eq!(options[0]["label"], "A to Z");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_meta_lists_writable_fields(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/cities/meta", Some(&token)).await;
    let json = body_json(response).await;

    let fields = json["data"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["name"], "name");
    assert_eq!(fields[0]["label"], "Name");
    assert_eq!(fields[0]["required"], true);
    assert!(fields[0].get("default").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_meta_prefills_current_values(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/cities",
            Some(&token),
            serde_json::json!({"name": "Lisbon"}),
        )
        .await,
    )
    .await;
    let uuid = created["data"]["uuid"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/cities/{uuid}/meta"), Some(&token)).await;
    let json = body_json(response).await;

    assert_eq!(json["data"]["fields"][0]["default"], "Lisbon");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_city_name(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/cities",
            Some(&token),
            serde_json::json!({"name": "Old"}),
        )
        .await,
    )
    .await;
    let uuid = created["data"]["uuid"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/cities/{uuid}"),
        Some(&token),
        serde_json::json!({"name": "New"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "New");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_to_duplicate_name_is_rejected(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;
    seed_cities(&pool, &token, &["First", "Second"]).await;

    let app = common::build_test_app(pool.clone());
    let listing = body_json(get(app, "/api/v1/cities?sort_by=name", Some(&token)).await).await;
    let uuid = listing["data"]["results"][0]["uuid"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/cities/{uuid}"),
        Some(&token),
        serde_json::json!({"name": "Second"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"][0], "City with this name already exists.");
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_retires_row_and_keeps_it(pool: PgPool) {
    let (user, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/cities",
            Some(&token),
            serde_json::json!({"name": "Ghent"}),
        )
        .await,
    )
    .await;
    let uuid = created["data"]["uuid"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/cities/{uuid}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert!(json["data"].is_null());

    // Row is retained with the actor stamp, not physically removed.
    let city = CityRepo::find_by_uuid(&pool, uuid.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(city.is_deleted);
    assert!(city.deleted_at.is_some());
    assert_eq!(city.deleted_by, Some(user.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_delete_is_noop_success(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/cities",
            Some(&token),
            serde_json::json!({"name": "Turin"}),
        )
        .await,
    )
    .await;
    let uuid = created["data"]["uuid"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/cities/{uuid}"), Some(&token)).await;
    let first = CityRepo::find_by_uuid(&pool, uuid.parse().unwrap())
        .await
        .unwrap()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/cities/{uuid}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The original deletion stamp survives the repeat request.
    let second = CityRepo::find_by_uuid(&pool, uuid.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.deleted_at, second.deleted_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_retired_city_answers_gone(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/cities",
            Some(&token),
            serde_json::json!({"name": "Bern"}),
        )
        .await,
    )
    .await;
    let uuid = created["data"]["uuid"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/cities/{uuid}"), Some(&token)).await;

    let app = common::build_test_app(pool.clone());
    let retrieve = get(app, &format!("/api/v1/cities/{uuid}"), Some(&token)).await;
    assert_eq!(retrieve.status(), StatusCode::GONE);

    let app = common::build_test_app(pool);
    let update = put_json(
        app,
        &format!("/api/v1/cities/{uuid}"),
        Some(&token),
        serde_json::json!({"name": "Basel"}),
    )
    .await;
    assert_eq!(update.status(), StatusCode::GONE);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_city_answers_not_found(pool: PgPool) {
    let (_, token) = seed_user(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        "/api/v1/cities/00000000-0000-0000-0000-000000000000",
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["data"]["detail"], "City not found.");

    // A non-uuid identifier cannot name a city either.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/cities/not-a-uuid", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
