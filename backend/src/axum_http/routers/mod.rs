pub mod ecpay_webhook;
pub mod orders;

use std::sync::Arc;

use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{
        audit_logs::AuditLogPostgres, invoices::InvoicePostgres, job::JobPostgres,
        orders::OrderPostgres, plans::PlanPostgres, subscriptions::SubscriptionPostgres,
    },
};
use payments::ecpay_client::EcpayClient;

use crate::{config::config_model::DotEnvyConfig, usecases::orders::OrderUseCase};

pub type SharedOrderUseCase = Arc<
    OrderUseCase<
        OrderPostgres,
        SubscriptionPostgres,
        PlanPostgres,
        InvoicePostgres,
        JobPostgres,
        AuditLogPostgres,
        EcpayClient,
    >,
>;

pub fn build_order_use_case(
    db_pool: Arc<PgPoolSquad>,
    config: Arc<DotEnvyConfig>,
) -> SharedOrderUseCase {
    Arc::new(OrderUseCase::new(
        Arc::new(OrderPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(InvoicePostgres::new(Arc::clone(&db_pool))),
        Arc::new(JobPostgres::new(Arc::clone(&db_pool))),
        Arc::new(AuditLogPostgres::new(Arc::clone(&db_pool))),
        Arc::new(EcpayClient::new(config.ecpay.to_client_config())),
    ))
}
