use super::*;
use crate::db::DbService;
use crate::db::models::{ClientCreate, CompanyCreate, OrderCreate, OrderItem, StoreCreate};
use crate::db::repository::{ClientRepository, CompanyRepository, ServiceOrderRepository, StoreRepository};
use crate::notify::{NotificationJob, NotificationService};
use crate::utils::AppError;
use shared::models::{OrderStatus, TransitionRequest};
use tokio::sync::mpsc;

struct TestEnv {
    machine: OrderStateMachine,
    orders: ServiceOrderRepository,
    rx: mpsc::Receiver<NotificationJob>,
    store_id: String,
    client_id: String,
}

async fn setup() -> TestEnv {
    let db = DbService::new_in_memory().await.unwrap().db;

    let company = CompanyRepository::new(db.clone())
        .create(CompanyCreate {
            name: "Conserta Tudo".to_string(),
            document: None,
        })
        .await
        .unwrap();
    let store = StoreRepository::new(db.clone())
        .create(StoreCreate {
            company_id: company.id,
            name: "Loja Centro".to_string(),
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    let client = ClientRepository::new(db.clone())
        .create(ClientCreate {
            store_id: store.id.clone(),
            name: "Maria Silva".to_string(),
            phone: "11 99999-0000".to_string(),
            email: None,
        })
        .await
        .unwrap();

    let (notifier, rx) = NotificationService::new(64);
    TestEnv {
        machine: OrderStateMachine::new(db.clone(), notifier, chrono_tz::America::Sao_Paulo),
        orders: ServiceOrderRepository::new(db),
        rx,
        store_id: store.id,
        client_id: client.id,
    }
}

fn simple_item(name: &str, price: f64, quantity: i32) -> OrderItem {
    OrderItem {
        service_name: name.to_string(),
        description: None,
        unit_price: price,
        quantity,
    }
}

async fn create_order(env: &mut TestEnv) -> String {
    let order = env
        .machine
        .create_order(OrderCreate {
            store_id: env.store_id.clone(),
            client_id: env.client_id.clone(),
            created_by: "Carlos".to_string(),
            items: vec![
                simple_item("Troca de tela", 100.0, 1),
                simple_item("Película", 50.0, 2),
            ],
        })
        .await
        .unwrap();
    // Discard the creation job so later assertions see only transitions
    let _ = env.rx.try_recv();
    order.id
}

async fn transition(env: &TestEnv, order_id: &str, status: OrderStatus, reason: Option<&str>) {
    env.machine
        .request_transition(
            order_id,
            TransitionRequest {
                status,
                paused_reason: reason.map(str::to_string),
            },
        )
        .await
        .unwrap();
}

#[test]
fn order_numbers_carry_month_prefix_and_sequence() {
    let tz = chrono_tz::America::Sao_Paulo;
    let millis = 1_736_942_400_000; // 2025-01-15 UTC
    assert_eq!(format_order_number(7, millis, tz), "OS2501-0007");
}

#[tokio::test]
async fn create_order_starts_received_with_totals() {
    let mut env = setup().await;
    let order = env
        .machine
        .create_order(OrderCreate {
            store_id: env.store_id.clone(),
            client_id: env.client_id.clone(),
            created_by: "Carlos".to_string(),
            items: vec![
                simple_item("Troca de tela", 100.0, 1),
                simple_item("Película", 50.0, 2),
            ],
        })
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Received);
    assert_eq!(order.total_amount, 200.0);
    assert!(order.order_number.starts_with("OS"));
    assert!(order.order_number.ends_with("-0001"));
    assert!(!order.whatsapp_sent);
    assert!(order.finished_at.is_none());

    // Creation enqueues the RECEIVED notification
    let job = env.rx.try_recv().unwrap();
    assert_eq!(job.status, OrderStatus::Received);

    // Sequence advances per store
    let second = env
        .machine
        .create_order(OrderCreate {
            store_id: env.store_id.clone(),
            client_id: env.client_id.clone(),
            created_by: "Carlos".to_string(),
            items: vec![simple_item("Limpeza", 40.0, 1)],
        })
        .await
        .unwrap();
    assert!(second.order_number.ends_with("-0002"));
}

#[tokio::test]
async fn transition_enqueues_job_with_both_statuses() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;

    transition(&env, &order_id, OrderStatus::InProgress, None).await;

    let job = env.rx.try_recv().unwrap();
    assert_eq!(job.previous, OrderStatus::Received);
    assert_eq!(job.status, OrderStatus::InProgress);
}

#[tokio::test]
async fn finished_stamps_timestamp_only_once() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;

    transition(&env, &order_id, OrderStatus::Finished, None).await;
    let first = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    let finished_at = first.finished_at.expect("stamped on first entry");

    transition(&env, &order_id, OrderStatus::Finished, None).await;
    let second = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(second.finished_at, Some(finished_at));
}

#[tokio::test]
async fn paid_backfills_finished_at() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;

    // Straight to PAID without passing through FINISHED
    transition(&env, &order_id, OrderStatus::Paid, None).await;

    let order = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(order.paid_at.is_some());
    assert!(order.finished_at.is_some());
}

#[tokio::test]
async fn paid_is_terminal() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;
    transition(&env, &order_id, OrderStatus::Paid, None).await;

    let result = env
        .machine
        .request_transition(
            &order_id,
            TransitionRequest {
                status: OrderStatus::InProgress,
                paused_reason: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BusinessRule(_))));
    let order = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
}

#[tokio::test]
async fn paused_reason_lifecycle() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;

    transition(&env, &order_id, OrderStatus::Paused, Some("aguardando peça")).await;
    let paused = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(paused.paused_reason.as_deref(), Some("aguardando peça"));

    // Leaving PAUSED clears the reason
    transition(&env, &order_id, OrderStatus::InProgress, None).await;
    let resumed = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(resumed.paused_reason, None);

    // Re-entering without a reason clears it, not the previous text
    transition(&env, &order_id, OrderStatus::Paused, None).await;
    let repaused = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(repaused.paused_reason, None);

    // Reason given for a non-PAUSED target is ignored
    transition(&env, &order_id, OrderStatus::InProgress, Some("ignorado")).await;
    let final_state = env.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(final_state.paused_reason, None);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let env = setup().await;
    let result = env
        .machine
        .request_transition(
            "service_order:missing",
            TransitionRequest {
                status: OrderStatus::InProgress,
                paused_reason: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn replace_items_recomputes_total_until_paid() {
    let mut env = setup().await;
    let order_id = create_order(&mut env).await;

    let updated = env
        .machine
        .replace_items(&order_id, vec![simple_item("Reparo de placa", 250.0, 1)])
        .await
        .unwrap();
    assert_eq!(updated.total_amount, 250.0);
    assert_eq!(updated.items.len(), 1);

    transition(&env, &order_id, OrderStatus::Paid, None).await;

    let result = env
        .machine
        .replace_items(&order_id, vec![simple_item("Outro", 10.0, 1)])
        .await;
    assert!(matches!(result, Err(AppError::BusinessRule(_))));
}

#[tokio::test]
async fn create_order_rejects_unknown_references() {
    let env = setup().await;
    let result = env
        .machine
        .create_order(OrderCreate {
            store_id: "store:missing".to_string(),
            client_id: env.client_id.clone(),
            created_by: "Carlos".to_string(),
            items: vec![simple_item("Reparo", 10.0, 1)],
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
