//! Integration tests for the pick-order workflow:
//! - item list building from pasted lines and scans
//! - finalization deducts picked quantities against live stock
//! - delivery confirmation and terminal status

mod common;

use common::{seed_empresa, seed_produto, test_env};
use estoque_core::batch::PickRow;
use estoque_core::error::CoreError;
use estoque_db::models::separacao::SeparacaoStatus;
use estoque_db::repositories::{MovimentacaoRepo, MovimentoFilters, ProdutoRepo};
use estoque_db::services::ServiceError;

fn pick(codigo: &str, quantidade: i64) -> PickRow {
    PickRow {
        codigo: codigo.to_string(),
        quantidade,
    }
}

#[tokio::test]
async fn test_set_items_snapshots_stock_and_location() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", None)
        .await
        .unwrap();

    let items = env
        .separacoes
        .set_items(&sep.id, vec![pick("ABC-1", 4)])
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantidade_requerida, 4);
    assert_eq!(items[0].quantidade_separada, 0);
    assert_eq!(items[0].quantidade_estoque_inicial, 10);
    assert_eq!(items[0].localizacao, "A1");
}

#[tokio::test]
async fn test_set_items_rejects_unknown_codes_without_writing() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", None)
        .await
        .unwrap();
    env.separacoes.set_items(&sep.id, vec![pick("ABC-1", 2)]).await.unwrap();

    let err = env
        .separacoes
        .set_items(&sep.id, vec![pick("ABC-1", 1), pick("NOPE", 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));

    // The previous list is intact.
    let (_, items) = env.separacoes.get_with_items(&sep.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantidade_requerida, 2);
}

#[tokio::test]
async fn test_scan_bumps_existing_item_or_appends() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;
    seed_produto(&env, &empresa, "XYZ-2", 5).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", None)
        .await
        .unwrap();
    env.separacoes.set_items(&sep.id, vec![pick("ABC-1", 3)]).await.unwrap();

    // Scanning the listed product bumps its picked count.
    let bumped = env.separacoes.add_item_by_code(&sep.id, "abc-1").await.unwrap();
    assert_eq!(bumped.quantidade_separada, 1);
    let bumped = env.separacoes.add_item_by_code(&sep.id, "ABC-1").await.unwrap();
    assert_eq!(bumped.quantidade_separada, 2);

    // Scanning an unlisted product appends a 1/1 line.
    let appended = env.separacoes.add_item_by_code(&sep.id, "XYZ-2").await.unwrap();
    assert_eq!(appended.quantidade_requerida, 1);
    assert_eq!(appended.quantidade_separada, 1);

    let (_, items) = env.separacoes.get_with_items(&sep.id).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_finalizar_deducts_picked_quantities() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    let abc = seed_produto(&env, &empresa, "ABC-1", 10).await;
    let xyz = seed_produto(&env, &empresa, "XYZ-2", 5).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", Some("abc1d23".to_string()))
        .await
        .unwrap();
    env.separacoes
        .set_items(&sep.id, vec![pick("ABC-1", 4), pick("XYZ-2", 2)])
        .await
        .unwrap();
    let (_, items) = env.separacoes.get_with_items(&sep.id).await.unwrap();
    env.separacoes
        .update_item_quantidade(&sep.id, &items[0].id, 4)
        .await
        .unwrap();
    // The second item stays at zero picked: no deduction, no movement.

    let finalized = env.separacoes.finalizar(&sep.id, "u1").await.unwrap();
    assert_eq!(finalized.status, SeparacaoStatus::AguardandoEntrega);
    assert!(finalized.data_finalizacao.is_some());
    assert_eq!(finalized.usuario.as_deref(), Some("u1"));

    assert_eq!(ProdutoRepo::get(env.store.as_ref(), &abc.id).await.unwrap().quantidade, 6);
    assert_eq!(ProdutoRepo::get(env.store.as_ref(), &xyz.id).await.unwrap().quantidade, 5);

    let trail = MovimentacaoRepo::list(env.store.as_ref(), &empresa, &MovimentoFilters::default())
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].produto_codigo, "ABC-1");
    assert_eq!(trail[0].quantidade, 4);
}

#[tokio::test]
async fn test_finalizar_enforces_live_stock() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", None)
        .await
        .unwrap();
    env.separacoes.set_items(&sep.id, vec![pick("ABC-1", 8)]).await.unwrap();
    let (_, items) = env.separacoes.get_with_items(&sep.id).await.unwrap();
    env.separacoes
        .update_item_quantidade(&sep.id, &items[0].id, 8)
        .await
        .unwrap();

    // Stock moved out from under the pick after the snapshot was taken.
    env.stock
        .registrar_movimentacao(&empresa, "ABC-1", estoque_core::movement::MovementKind::Saida, 5, "u1")
        .await
        .unwrap();

    let err = env.separacoes.finalizar(&sep.id, "u1").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(CoreError::InsufficientStock { available: 5, requested: 8, .. })
    ));
}

#[tokio::test]
async fn test_status_transitions_are_enforced() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;
    let sep = env
        .separacoes
        .create(&empresa, "OS-100", "Cliente A", None)
        .await
        .unwrap();

    // Delivery before finalization is rejected.
    let err = env.separacoes.confirmar_entrega(&sep.id, "João").await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));

    env.separacoes.finalizar(&sep.id, "u1").await.unwrap();

    // Finalizing twice is rejected; so is further picking.
    let err = env.separacoes.finalizar(&sep.id, "u1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));
    let err = env.separacoes.add_item_by_code(&sep.id, "ABC-1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));

    let delivered = env.separacoes.confirmar_entrega(&sep.id, "João").await.unwrap();
    assert_eq!(delivered.status, SeparacaoStatus::Entregue);
    assert_eq!(delivered.nome_recebedor.as_deref(), Some("João"));

    // Entregue is terminal.
    let err = env.separacoes.confirmar_entrega(&sep.id, "Maria").await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));
}

#[tokio::test]
async fn test_validate_pick_rows_flags_unknown_codes() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;
    seed_produto(&env, &empresa, "ABC-1", 10).await;

    let validated = env
        .separacoes
        .validate_pick_rows(&empresa, vec![pick("ABC-1", 2), pick("NOPE", 1)])
        .await
        .unwrap();
    assert!(validated[0].produto.is_some());
    assert!(validated[1].produto.is_none());
}

#[tokio::test]
async fn test_create_normalizes_placa_and_requires_fields() {
    let env = test_env();
    let empresa = seed_empresa(&env, "Oficina").await;

    let err = env.separacoes.create(&empresa, "  ", "Cliente", None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));

    let sep = env
        .separacoes
        .create(&empresa, "OS-1", "Cliente", Some(" abc1d23 ".to_string()))
        .await
        .unwrap();
    assert_eq!(sep.placa_veiculo.as_deref(), Some("ABC1D23"));
}
