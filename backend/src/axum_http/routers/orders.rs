use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use domain::value_objects::orders::CreateOrderModel;
use infra::db::postgres::postgres_connection::PgPoolSquad;
use std::sync::Arc;
use uuid::Uuid;

use super::{SharedOrderUseCase, build_order_use_case};
use crate::config::config_model::DotEnvyConfig;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    Router::new()
        .route("/", post(create_order))
        .route("/:order_id/payment-request", post(build_payment_request))
        .route("/:order_id/invoice", get(get_invoice))
        .with_state(build_order_use_case(db_pool, config))
}

pub async fn create_order(
    State(order_use_case): State<SharedOrderUseCase>,
    Json(create_order_model): Json<CreateOrderModel>,
) -> impl IntoResponse {
    match order_use_case.create_order(create_order_model).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn build_payment_request(
    State(order_use_case): State<SharedOrderUseCase>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    match order_use_case.build_payment_request(order_id).await {
        Ok(payment_request) => (StatusCode::OK, Json(payment_request)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_invoice(
    State(order_use_case): State<SharedOrderUseCase>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    match order_use_case.get_invoice(order_id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(err) => err.into_response(),
    }
}
