//! HTTP-level integration tests for the pick-order (separação) routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json_auth, put_json_auth};

async fn create_separacao(
    app: &common::TestApp,
    token: &str,
    empresa_id: &str,
) -> serde_json::Value {
    let body = serde_json::json!({
        "os_numero": "OS-1001",
        "cliente": "Transportes Silva",
        "placa_veiculo": "abc-1d23",
    });
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{empresa_id}/separacoes"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Creating an order normalizes the plate and starts in "em andamento".
#[tokio::test]
async fn test_create_separacao() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;

    let separacao = create_separacao(&app, &token, &empresa.id).await;
    assert_eq!(separacao["osNumero"], "OS-1001");
    assert_eq!(separacao["placaVeiculo"], "ABC-1D23");
    assert_eq!(separacao["status"], "em andamento");
}

/// PUT items snapshots stock and location per line.
#[tokio::test]
async fn test_set_items_snapshots() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 10).await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    let rows = serde_json::json!([{ "codigo": "ABC-123", "quantidade": 4 }]);
    let response = put_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items"),
        &token,
        rows,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantidade_requerida"], 4);
    assert_eq!(items[0]["quantidade_separada"], 0);
    assert_eq!(items[0]["quantidade_estoque_inicial"], 10);
}

/// Replacing items with an unknown code rejects the whole list.
#[tokio::test]
async fn test_set_items_unknown_code() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    let rows = serde_json::json!([{ "codigo": "GHOST", "quantidade": 1 }]);
    let response = put_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items"),
        &token,
        rows,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing was written.
    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert!(json["data"]["items"].as_array().unwrap().is_empty());
}

/// Scanning a code bumps the picked quantity, appending when new.
#[tokio::test]
async fn test_scan_item() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 10).await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    for expected in 1..=2 {
        let response = post_json_auth(
            app.router.clone(),
            &format!("/api/v1/separacoes/{id}/items"),
            &token,
            serde_json::json!({ "codigo": "abc-123" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["quantidade_separada"], expected);
    }
}

/// Finalizing deducts picked quantities from stock and moves the order to
/// "aguardando entrega"; delivery then closes it.
#[tokio::test]
async fn test_finalize_and_deliver() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 10).await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    let rows = serde_json::json!([{ "codigo": "ABC-123", "quantidade": 4 }]);
    let response = put_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items"),
        &token,
        rows,
    )
    .await;
    let json = body_json(response).await;
    let item_id = json["data"][0]["id"].as_str().unwrap().to_string();

    // Mark 4 units picked.
    let response = patch_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items/{item_id}"),
        &token,
        serde_json::json!({ "quantidade_separada": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/finalize"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "aguardando entrega");
    assert!(json["data"]["dataFinalizacao"].is_string());

    // Stock went down and a saida movement was written.
    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/produtos/lookup?codigo=ABC-123", empresa.id),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["quantidade"], 6);

    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/empresas/{}/movimentacoes?tipo=saida", empresa.id),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    // Deliver.
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/deliver"),
        &token,
        serde_json::json!({ "nome_recebedor": "João" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "entregue");
    assert_eq!(json["data"]["nome_recebedor"], "João");
}

/// Finalizing fails when picked quantities exceed current stock.
#[tokio::test]
async fn test_finalize_insufficient_stock() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    common::seed_produto(app.store.as_ref(), &empresa.id, "ABC-123", 2).await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    let rows = serde_json::json!([{ "codigo": "ABC-123", "quantidade": 5 }]);
    put_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items"),
        &token,
        rows,
    )
    .await;

    let json = body_json(
        get_auth(
            app.router.clone(),
            &format!("/api/v1/separacoes/{id}"),
            &token,
        )
        .await,
    )
    .await;
    let item_id = json["data"]["items"][0]["id"].as_str().unwrap().to_string();

    patch_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/items/{item_id}"),
        &token,
        serde_json::json!({ "quantidade_separada": 5 }),
    )
    .await;

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/finalize"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_STOCK");
}

/// Delivery before finalization and double finalization are both rejected.
#[tokio::test]
async fn test_status_transitions_enforced() {
    let app = common::build_test_app();
    let token = common::admin_token(&app).await;
    let empresa = common::seed_empresa(app.store.as_ref(), "Oficina Central").await;
    let separacao = create_separacao(&app, &token, &empresa.id).await;
    let id = separacao["id"].as_str().unwrap();

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/deliver"),
        &token,
        serde_json::json!({ "nome_recebedor": "João" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/finalize"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/separacoes/{id}/finalize"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
