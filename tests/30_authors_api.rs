mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

fn jane() -> Value {
    json!({
        "fullname": "Jane Doe",
        "country": "Ireland",
        "gender": "Female",
        "birthdate": "1970-01-01"
    })
}

fn marek() -> Value {
    json!({
        "fullname": "Marek Novak",
        "country": "Czechia",
        "gender": "Male",
        "birthdate": "1958-06-12"
    })
}

async fn create(app: &axum::Router, payload: Value) -> Result<Value> {
    let (status, body) = common::send_json(app, Method::POST, "/authors", Some(payload)).await?;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn create_returns_201_with_generated_id() -> Result<()> {
    let app = common::app();
    let (status, body) = common::send_json(&app, Method::POST, "/authors", Some(jane())).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Author created");
    let data = &body["data"];
    assert!(data["id"].as_str().is_some());
    assert_eq!(data["fullname"], "Jane Doe");
    assert_eq!(data["gender"], "Female");
    Ok(())
}

#[tokio::test]
async fn duplicate_fullname_returns_409() -> Result<()> {
    let app = common::app();
    create(&app, jane()).await?;

    let (status, body) = common::send_json(&app, Method::POST, "/authors", Some(jane())).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Fullname already exists");
    Ok(())
}

#[tokio::test]
async fn renaming_onto_another_author_is_409_and_original_is_unchanged() -> Result<()> {
    let app = common::app();
    create(&app, jane()).await?;
    let other = create(&app, marek()).await?;
    let id = other["id"].as_str().unwrap();

    let (status, _) = common::send_json(
        &app,
        Method::PUT,
        &format!("/authors/{}", id),
        Some(json!({"fullname": "Jane Doe"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = common::send_json(&app, Method::GET, &format!("/authors/{}", id), None).await?;
    assert_eq!(body["data"]["fullname"], "Marek Novak");
    Ok(())
}

#[tokio::test]
async fn validation_reports_every_missing_field() -> Result<()> {
    let app = common::app();
    let (status, body) = common::send_json(&app, Method::POST, "/authors", Some(json!({}))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 4);

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/authors",
        Some(json!({
            "fullname": "A",
            "country": "B",
            "gender": "Unknown",
            "birthdate": ""
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["gender", "birthdate"]);
    Ok(())
}

#[tokio::test]
async fn partial_update_merges_fields() -> Result<()> {
    let app = common::app();
    let created = create(&app, jane()).await?;
    let id = created["id"].as_str().unwrap();

    let (status, body) = common::send_json(
        &app,
        Method::PUT,
        &format!("/authors/{}", id),
        Some(json!({"country": "France"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["country"], "France");
    assert_eq!(body["data"]["fullname"], "Jane Doe");
    assert_eq!(body["data"]["birthdate"], "1970-01-01");
    Ok(())
}

#[tokio::test]
async fn list_filters_by_country_and_gender() -> Result<()> {
    let app = common::app();
    create(&app, jane()).await?;
    create(&app, marek()).await?;

    let (_, body) = common::send_json(&app, Method::GET, "/authors?country=Ireland", None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = common::send_json(&app, Method::GET, "/authors?gender=Male", None).await?;
    let matches = body["data"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["fullname"], "Marek Novak");

    let (_, body) = common::send_json(&app, Method::GET, "/authors", None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn delete_missing_author_is_404() -> Result<()> {
    let app = common::app();
    let (status, body) = common::send_json(
        &app,
        Method::DELETE,
        "/authors/0192b6d0-0000-7000-8000-000000000000",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    Ok(())
}

#[tokio::test]
async fn malformed_json_update_body_uses_the_error_envelope() -> Result<()> {
    let app = common::app();
    let created = create(&app, jane()).await?;
    let id = created["id"].as_str().unwrap();

    let (status, body) =
        common::send_raw(&app, Method::PUT, &format!("/authors/{}", id), "[[[").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_json");

    // record untouched
    let (_, body) = common::send_json(&app, Method::GET, &format!("/authors/{}", id), None).await?;
    assert_eq!(body["data"], created);
    Ok(())
}

#[tokio::test]
async fn malformed_identifier_never_reaches_the_store() -> Result<()> {
    let app = common::app();
    let (status, body) = common::send_json(&app, Method::GET, "/authors/42", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_identifier");
    Ok(())
}
