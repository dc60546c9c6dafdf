use axum::{Form, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use infra::db::postgres::postgres_connection::PgPoolSquad;
use std::{collections::BTreeMap, sync::Arc};

use super::{SharedOrderUseCase, build_order_use_case};
use crate::{config::config_model::DotEnvyConfig, usecases::orders::OrderError};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    Router::new()
        .route("/callback", post(handle_callback))
        .with_state(build_order_use_case(db_pool, config))
}

/// Gateway server-to-server notification. The response body is the ack
/// protocol: `1|OK` stops redelivery, anything else makes the gateway retry.
/// Always 200; the verdict travels in the body.
pub async fn handle_callback(
    State(order_use_case): State<SharedOrderUseCase>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> impl IntoResponse {
    match order_use_case.handle_callback(fields).await {
        Ok(()) => (StatusCode::OK, "1|OK".to_string()),
        Err(OrderError::Internal(_)) => (StatusCode::OK, "0|internal error".to_string()),
        Err(err) => (StatusCode::OK, format!("0|{err}")),
    }
}
