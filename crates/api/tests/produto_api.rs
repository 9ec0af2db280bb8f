//! HTTP-level integration tests for the product catalog routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json_auth};
use estoque_core::roles::Role;

// ---------------------------------------------------------------------------
// Create and list
// ---------------------------------------------------------------------------

/// Creating a product returns 201 and the product shows up in the listing.
#[tokio::test]
async fn test_create_and_list_produtos() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;

    let body = serde_json::json!({
        "codigo": "abc-123",
        "descricao": "Filtro de óleo",
        "valor": 35.5,
        "quantidade": 10,
        "localizacao": "b2",
    });
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    // Codes and locations are normalized to upper case on the way in.
    assert_eq!(json["data"]["codigo"], "ABC-123");
    assert_eq!(json["data"]["localizacao"], "B2");
    assert_eq!(json["data"]["quantidade"], 10);
    assert_eq!(json["data"]["status"], "ativo");

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// Registering with an initial quantity writes an opening entrada movement.
#[tokio::test]
async fn test_create_produto_writes_opening_movement() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;

    let body = serde_json::json!({
        "codigo": "ABC-123",
        "descricao": "Filtro de óleo",
        "valor": 35.5,
        "quantidade": 10,
    });
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/movimentacoes", empresa.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let movimentos = json["data"].as_array().unwrap();
    assert_eq!(movimentos.len(), 1);
    assert_eq!(movimentos[0]["tipo"], "entrada");
    assert_eq!(movimentos[0]["quantidade"], 10);
}

/// A duplicate code within the company is rejected with 409.
#[tokio::test]
async fn test_create_produto_duplicate_code() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 5).await;

    let body = serde_json::json!({
        "codigo": "abc-123",
        "descricao": "Outro filtro",
        "valor": 12.0,
    });
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Zero or negative prices fail validation.
#[tokio::test]
async fn test_create_produto_rejects_non_positive_valor() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;

    let body = serde_json::json!({
        "codigo": "ABC-123",
        "descricao": "Filtro de óleo",
        "valor": 0.0,
    });
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Lookup resolves codes case-insensitively and unwraps QR URL payloads.
#[tokio::test]
async fn test_lookup_by_code_and_qr_payload() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 5).await;

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos/lookup?codigo=abc-123", empresa.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["codigo"], "ABC-123");

    // A scanned public-product-view URL resolves like the bare code.
    let payload =
        "https%3A%2F%2Fexample.com%2Fpublic-product-view.html%3Fcode%3DABC-123";
    let response = get_auth(
        app.router.clone(),
        &format!(
            "/api/v1/empresas/{}/produtos/lookup?codigo={payload}",
            empresa.id
        ),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["codigo"], "ABC-123");
}

/// Unknown codes return 404 with the error envelope.
#[tokio::test]
async fn test_lookup_unknown_code() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos/lookup?codigo=NOPE", empresa.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PATCH /produtos/{id} applies partial updates.
#[tokio::test]
async fn test_update_produto() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    let produto = common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 5).await;

    let body = serde_json::json!({ "descricao": "Filtro novo", "valor": 42.0 });
    let response = patch_json_auth(
        app.router.clone(),
        &format!("/api/v1/produtos/{}", produto.id),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["descricao"], "Filtro novo");
    assert_eq!(json["data"]["valor"], 42.0);
    // Untouched fields survive.
    assert_eq!(json["data"]["codigo"], "ABC-123");
}

// ---------------------------------------------------------------------------
// Company access control
// ---------------------------------------------------------------------------

/// A non-admin without the company on their access list gets 403.
#[tokio::test]
async fn test_user_without_company_access_forbidden() {
    let app = common::build_test_app();
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    let outra = common::seed_empresa(app.store.as_ref(), "Filial Sul").await;
    common::seed_user(
        app.store.as_ref(),
        "maria",
        Role::User,
        vec![outra.id.clone()],
    )
    .await;
    let token = common::login(&app, "maria").await;

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The granted company works.
    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", outra.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// GET /empresas filters the listing to the user's access list.
#[tokio::test]
async fn test_empresa_listing_scoped_to_access() {
    let app = common::build_test_app();
    common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    let outra = common::seed_empresa(app.store.as_ref(), "Filial Sul").await;
    common::seed_user(
        app.store.as_ref(),
        "maria",
        Role::User,
        vec![outra.id.clone()],
    )
    .await;
    let token = common::login(&app, "maria").await;

    let response = get_auth(app.router.clone(), "/api/v1/empresas", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let empresas = json["data"].as_array().unwrap();
    assert_eq!(empresas.len(), 1);
    assert_eq!(empresas[0]["nome"], "Filial Sul");
}

// ---------------------------------------------------------------------------
// Batch import
// ---------------------------------------------------------------------------

/// validate-batch classifies pasted rows and batch creates the new ones.
#[tokio::test]
async fn test_batch_validate_then_create() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 5).await;

    let text = "ABC-123\tFiltro\t5\tR$ 10,00\tA1\nXYZ-9\tCorreia\t3\tR$ 25,00\tB2";
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos/validate-batch", empresa.id),
        &token,
        serde_json::json!({ "text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap().clone();
    assert_eq!(rows.len(), 2);

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos/batch", empresa.id),
        &token,
        serde_json::Value::Array(rows),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["criados"], 1);
    assert_eq!(json["data"]["ignorados"], 1);

    // The new product is now listed alongside the seeded one.
    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos", empresa.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
