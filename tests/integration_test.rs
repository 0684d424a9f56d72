use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use uuid::Uuid;

use payment_router::api::{app, AppState, ROUTER_HEADER};
use payment_router::engine::BatchDispatcher;
use payment_router::gateway::HttpPaymentGateway;
use payment_router::models::{BatchClassification, BatchResult, PaymentBatch, PaymentRequest, PaymentStatus};
use payment_router::strategies::{DispatchLimits, DispatchStrategy};

async fn serve(router: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(address)
}

/// Processor stub executing every payment below 100.
async fn start_processor() -> Result<SocketAddr> {
    let limit = Decimal::from(100);

    serve(Router::new().route("/payment/execute", post(move |Json(payment): Json<PaymentRequest>| async move {
        Json(payment.amount < limit)
    }))).await
}

async fn start_router(processor: SocketAddr) -> Result<SocketAddr> {
    let gateway = HttpPaymentGateway::new(&format!("http://{processor}"), 16)?;
    let limits = DispatchLimits {
        fixed_pool_size: 4,
        merge_max_in_flight: 8,
        cooperative_permits: 8,
        lightweight_thread_permits: 8
    };
    let dispatcher = BatchDispatcher::new(Arc::new(gateway), limits)?;

    serve(app(AppState { dispatcher: Arc::new(dispatcher) })).await
}

fn create_batch(amounts: &[&str]) -> Result<PaymentBatch> {
    let payments = amounts.iter()
        .enumerate()
        .map(|(index, amount)| -> Result<PaymentRequest> {
            Ok(PaymentRequest {
                reference: Uuid::new_v4(),
                debit_acc: format!("DEBIT-{index}"),
                credit_acc: format!("CREDIT-{index}"),
                amount: Decimal::from_str(amount)?
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PaymentBatch::new(1, payments))
}

async fn submit(router: SocketAddr, strategy: &str, batch: &PaymentBatch) -> Result<reqwest::Response> {
    Ok(reqwest::Client::new()
        .post(format!("http://{router}/payments/submit"))
        .header(ROUTER_HEADER, strategy)
        .json(batch)
        .send()
        .await?)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_strategy_classifies_batch_end_to_end() -> Result<()> {
    let processor = start_processor().await?;
    let router = start_router(processor).await?;
    let batch = create_batch(&["10.10", "20.20", "250.00", "0.05"])?;

    for strategy in DispatchStrategy::ALL {
        let response = submit(router, strategy.name(), &batch).await?;

        assert_eq!(response.status(), StatusCode::OK, "strategy {strategy}");

        let result: BatchResult = response.json().await?;

        assert_eq!(result.classification, BatchClassification::Partial, "strategy {strategy}");
        assert_eq!(result.total_amount, Decimal::from_str("30.35")?, "strategy {strategy}");
        assert_eq!(result.count(PaymentStatus::Success), 3, "strategy {strategy}");
        assert_eq!(result.count(PaymentStatus::Failure), 1, "strategy {strategy}");
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unreachable_processor_fails_every_payment() -> Result<()> {
    let closed = TcpListener::bind("127.0.0.1:0").await?.local_addr()?;
    let router = start_router(closed).await?;
    let batch = create_batch(&["1", "2"])?;

    let result: BatchResult = submit(router, "PARALLEL_NO_LIM", &batch).await?.json().await?;

    assert_eq!(result.classification, BatchClassification::None);
    assert!(result.total_amount.is_zero());
    assert_eq!(result.count(PaymentStatus::Failure), 2);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unknown_router_is_rejected_over_http() -> Result<()> {
    let processor = start_processor().await?;
    let router = start_router(processor).await?;

    let response = submit(router, "QUANTUM", &create_batch(&["1"])?).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
