use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::{invoices::InsertInvoiceEntity, orders::OrderEntity},
    repositories::reconciliation::ReconciliationRepository,
    schema::{invoices, orders, plans, subscriptions},
    value_objects::{
        enums::{
            billing_cycles::BillingCycle, order_statuses::OrderStatus,
            subscription_statuses::SubscriptionStatus,
        },
        invoices::{generate_invoice_number, tax_amount_minor},
        payment_callback::CallbackPayload,
        reconciliation::ReconcileOutcome,
    },
};

pub struct ReconciliationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReconciliationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReconciliationRepository for ReconciliationPostgres {
    async fn apply_success(&self, callback: CallbackPayload) -> Result<ReconcileOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The row lock is held until commit, so check, mutate and both
        // cascades are one unit relative to a concurrent delivery of the
        // same callback.
        let outcome = conn.transaction::<ReconcileOutcome, anyhow::Error, _>(|conn| {
            let Some(order) = lock_order(conn, &callback.merchant_trade_no)? else {
                return Ok(ReconcileOutcome::UnknownOrder);
            };

            if callback.amount_minor() != order.amount_minor as i64 {
                return Ok(ReconcileOutcome::AmountMismatch {
                    order_id: order.id,
                    expected_minor: order.amount_minor as i64,
                    received_minor: callback.amount_minor(),
                });
            }

            let status = parse_status(&order)?;
            if status == OrderStatus::Completed {
                return Ok(ReconcileOutcome::AlreadyCompleted { order_id: order.id });
            }
            if !status.can_transition_to(OrderStatus::Completed) {
                return Ok(ReconcileOutcome::TerminalState {
                    order_id: order.id,
                    status,
                });
            }

            let paid_at = Utc::now();
            diesel::update(orders::table.find(order.id))
                .set((
                    orders::status.eq(OrderStatus::Completed.to_string()),
                    orders::payment_id.eq(Some(callback.trade_no.clone())),
                    orders::payment_data.eq(serde_json::to_value(&callback.raw)?),
                    orders::paid_at.eq(Some(paid_at)),
                    orders::updated_at.eq(paid_at),
                ))
                .execute(conn)?;

            let invoice_id = ensure_invoice(conn, &order, paid_at)?;
            let subscription_id = activate_subscription(conn, &order, paid_at)?;

            Ok(ReconcileOutcome::Completed {
                order_id: order.id,
                invoice_id,
                subscription_id,
            })
        })?;

        Ok(outcome)
    }

    async fn apply_failure(&self, callback: CallbackPayload) -> Result<ReconcileOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outcome = conn.transaction::<ReconcileOutcome, anyhow::Error, _>(|conn| {
            let Some(order) = lock_order(conn, &callback.merchant_trade_no)? else {
                return Ok(ReconcileOutcome::UnknownOrder);
            };

            if callback.amount_minor() != order.amount_minor as i64 {
                return Ok(ReconcileOutcome::AmountMismatch {
                    order_id: order.id,
                    expected_minor: order.amount_minor as i64,
                    received_minor: callback.amount_minor(),
                });
            }

            let status = parse_status(&order)?;
            if !status.can_transition_to(OrderStatus::Failed) {
                return Ok(ReconcileOutcome::TerminalState {
                    order_id: order.id,
                    status,
                });
            }

            let now = Utc::now();
            diesel::update(orders::table.find(order.id))
                .set((
                    orders::status.eq(OrderStatus::Failed.to_string()),
                    orders::payment_id.eq(Some(callback.trade_no.clone())),
                    orders::payment_data.eq(serde_json::to_value(&callback.raw)?),
                    orders::updated_at.eq(now),
                ))
                .execute(conn)?;

            Ok(ReconcileOutcome::MarkedFailed { order_id: order.id })
        })?;

        Ok(outcome)
    }
}

fn lock_order(conn: &mut PgConnection, order_number: &str) -> Result<Option<OrderEntity>> {
    let order = orders::table
        .filter(orders::order_number.eq(order_number))
        .select(OrderEntity::as_select())
        .for_update()
        .first::<OrderEntity>(conn)
        .optional()?;

    Ok(order)
}

fn parse_status(order: &OrderEntity) -> Result<OrderStatus> {
    OrderStatus::from_str(&order.status).ok_or_else(|| {
        anyhow!(
            "order {} carries unrecognized status {}",
            order.order_number,
            order.status
        )
    })
}

/// One invoice per order: reuse the existing row when a retried callback
/// reaches this point again in a later transaction.
fn ensure_invoice(
    conn: &mut PgConnection,
    order: &OrderEntity,
    paid_at: DateTime<Utc>,
) -> Result<Uuid> {
    let existing = invoices::table
        .filter(invoices::order_id.eq(order.id))
        .select(invoices::id)
        .first::<Uuid>(conn)
        .optional()?;

    if let Some(invoice_id) = existing {
        return Ok(invoice_id);
    }

    let tax = tax_amount_minor(order.amount_minor);
    let insert_entity = InsertInvoiceEntity {
        invoice_number: generate_invoice_number(),
        order_id: order.id,
        user_id: order.user_id,
        amount_minor: order.amount_minor,
        tax_amount_minor: tax,
        total_amount_minor: order.amount_minor + tax,
        currency: order.currency.clone(),
        paid_at: Some(paid_at),
    };

    let invoice_id = diesel::insert_into(invoices::table)
        .values(&insert_entity)
        .returning(invoices::id)
        .get_result::<Uuid>(conn)?;

    Ok(invoice_id)
}

/// Activates the order's subscription when it has not started yet. An
/// already-active subscription is left untouched.
fn activate_subscription(
    conn: &mut PgConnection,
    order: &OrderEntity,
    paid_at: DateTime<Utc>,
) -> Result<Option<Uuid>> {
    let Some(subscription_id) = order.subscription_id else {
        return Ok(None);
    };

    let status_str = subscriptions::table
        .find(subscription_id)
        .select(subscriptions::status)
        .first::<String>(conn)?;

    let status = SubscriptionStatus::from_str(&status_str).ok_or_else(|| {
        anyhow!(
            "subscription {} carries unrecognized status {}",
            subscription_id,
            status_str
        )
    })?;
    if !status.can_activate() {
        return Ok(Some(subscription_id));
    }

    let billing_cycle_str = plans::table
        .find(order.plan_id)
        .select(plans::billing_cycle)
        .first::<String>(conn)?;
    let billing_cycle = BillingCycle::from_str(&billing_cycle_str).ok_or_else(|| {
        anyhow!(
            "plan {} carries unrecognized billing cycle {}",
            order.plan_id,
            billing_cycle_str
        )
    })?;

    let ends_at = billing_cycle.period_end(paid_at);
    diesel::update(subscriptions::table.find(subscription_id))
        .set((
            subscriptions::status.eq(SubscriptionStatus::Active.to_string()),
            subscriptions::starts_at.eq(Some(paid_at)),
            subscriptions::ends_at.eq(Some(ends_at)),
        ))
        .execute(conn)?;

    Ok(Some(subscription_id))
}
