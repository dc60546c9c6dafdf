use std::{collections::BTreeMap, sync::Arc};

use domain::{
    entities::{audit_logs::InsertAuditLogEntity, orders::InsertOrderEntity,
        subscriptions::InsertSubscriptionEntity},
    repositories::{
        audit_logs::AuditLogRepository, invoices::InvoiceRepository, job::JobRepository,
        orders::OrderRepository, plans::PlanRepository, subscriptions::SubscriptionRepository,
    },
    value_objects::{
        enums::{
            audit_actions::AuditAction, order_statuses::OrderStatus,
            payment_methods::PaymentMethod, subscription_statuses::SubscriptionStatus,
        },
        invoices::InvoiceDto,
        orders::{CreateOrderModel, OrderDto, generate_order_number},
        payment_callback::{CallbackPayload, GatewayStatus},
        reconciliation::PaymentCallbackJob,
    },
};
use payments::ecpay_client::EcpayClient;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
pub trait EcpayGateway: Send + Sync {
    fn verify_callback(&self, fields: &BTreeMap<String, String>) -> bool;

    fn build_payment_form(
        &self,
        merchant_trade_no: &str,
        total_amount: i64,
        item_name: &str,
        trade_desc: &str,
        choose_payment: &str,
    ) -> BTreeMap<String, String>;

    fn payment_url(&self) -> String;
}

impl EcpayGateway for EcpayClient {
    fn verify_callback(&self, fields: &BTreeMap<String, String>) -> bool {
        self.verify_callback(fields)
    }

    fn build_payment_form(
        &self,
        merchant_trade_no: &str,
        total_amount: i64,
        item_name: &str,
        trade_desc: &str,
        choose_payment: &str,
    ) -> BTreeMap<String, String> {
        self.build_payment_form(
            merchant_trade_no,
            total_amount,
            item_name,
            trade_desc,
            choose_payment,
        )
    }

    fn payment_url(&self) -> String {
        self.payment_url().to_string()
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("invoice not found")]
    InvoiceNotFound,
    #[error("order is not payable: {0}")]
    NotPayable(String),
    #[error("invalid callback: {0}")]
    InvalidCallback(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OrderError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            OrderError::PlanNotFound | OrderError::OrderNotFound | OrderError::InvoiceNotFound => {
                StatusCode::NOT_FOUND
            }
            OrderError::NotPayable(_) | OrderError::InvalidCallback(_) => StatusCode::BAD_REQUEST,
            OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, OrderError>;

/// Browser-side payment redirect: the client renders these fields as a
/// self-submitting form posted to the gateway's checkout page.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequestDto {
    pub action_url: String,
    pub method: &'static str,
    pub fields: BTreeMap<String, String>,
}

pub struct OrderUseCase<O, S, P, I, J, A, G>
where
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    J: JobRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    G: EcpayGateway + 'static,
{
    order_repo: Arc<O>,
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    invoice_repo: Arc<I>,
    job_repo: Arc<J>,
    audit_repo: Arc<A>,
    ecpay_gateway: Arc<G>,
}

impl<O, S, P, I, J, A, G> OrderUseCase<O, S, P, I, J, A, G>
where
    O: OrderRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    I: InvoiceRepository + Send + Sync + 'static,
    J: JobRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    G: EcpayGateway + 'static,
{
    pub fn new(
        order_repo: Arc<O>,
        subscription_repo: Arc<S>,
        plan_repo: Arc<P>,
        invoice_repo: Arc<I>,
        job_repo: Arc<J>,
        audit_repo: Arc<A>,
        ecpay_gateway: Arc<G>,
    ) -> Self {
        Self {
            order_repo,
            subscription_repo,
            plan_repo,
            invoice_repo,
            job_repo,
            audit_repo,
            ecpay_gateway,
        }
    }

    /// Creates a pending order plus its pending subscription. The subscription
    /// stays dormant until a successful callback activates it.
    pub async fn create_order(&self, model: CreateOrderModel) -> UseCaseResult<OrderDto> {
        let plan = self
            .plan_repo
            .find_active_plan_by_id(model.plan_id)
            .await
            .map_err(|err| {
                error!(plan_id = %model.plan_id, db_error = ?err, "orders: failed to load plan");
                OrderError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(plan_id = %model.plan_id, "orders: plan not found or inactive");
                OrderError::PlanNotFound
            })?;

        let subscription_id = self
            .subscription_repo
            .create_subscription(InsertSubscriptionEntity {
                user_id: model.user_id,
                plan_id: plan.id,
                status: SubscriptionStatus::Pending.to_string(),
                starts_at: None,
                ends_at: None,
                auto_renew: true,
                trial_ends_at: None,
                canceled_at: None,
            })
            .await
            .map_err(|err| {
                error!(
                    user_id = %model.user_id,
                    plan_id = %plan.id,
                    db_error = ?err,
                    "orders: failed to create pending subscription"
                );
                OrderError::Internal(err)
            })?;

        let order_number = generate_order_number();
        let order_id = self
            .order_repo
            .create_order(InsertOrderEntity {
                order_number: order_number.clone(),
                user_id: model.user_id,
                plan_id: plan.id,
                subscription_id: Some(subscription_id),
                amount_minor: plan.price_minor,
                currency: plan.currency.clone(),
                status: OrderStatus::Pending.to_string(),
                payment_method: model.payment_method.to_string(),
                payment_data: json!({}),
            })
            .await
            .map_err(|err| {
                error!(
                    user_id = %model.user_id,
                    order_number,
                    db_error = ?err,
                    "orders: failed to create order"
                );
                OrderError::Internal(err)
            })?;

        self.audit_repo
            .append(InsertAuditLogEntity {
                user_id: Some(model.user_id),
                action: AuditAction::Create.to_string(),
                resource_type: "order".to_string(),
                resource_id: order_number.clone(),
                description: format!("order created for plan {}", plan.slug),
                metadata: json!({
                    "plan_id": plan.id,
                    "amount_minor": plan.price_minor,
                    "payment_method": model.payment_method.as_str(),
                }),
            })
            .await
            .map_err(OrderError::Internal)?;

        info!(%order_id, order_number, "orders: order created");

        Ok(OrderDto {
            id: order_id,
            order_number,
            plan_id: plan.id,
            subscription_id: Some(subscription_id),
            amount_minor: plan.price_minor,
            currency: plan.currency,
            status: OrderStatus::Pending.to_string(),
            payment_method: model.payment_method.to_string(),
        })
    }

    /// Signed gateway form for an order awaiting payment. Only pending orders
    /// can be sent to checkout.
    pub async fn build_payment_request(&self, order_id: Uuid) -> UseCaseResult<PaymentRequestDto> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::OrderNotFound)?;

        let status = OrderStatus::from_str(&order.status)
            .ok_or_else(|| OrderError::NotPayable(format!("unknown status {}", order.status)))?;
        if status != OrderStatus::Pending {
            warn!(
                %order_id,
                status = %order.status,
                "orders: payment request for non-pending order"
            );
            return Err(OrderError::NotPayable(format!(
                "order status is {status}, expected pending"
            )));
        }

        let payment_method = PaymentMethod::from_str(&order.payment_method).ok_or_else(|| {
            OrderError::NotPayable(format!("unknown payment method {}", order.payment_method))
        })?;

        let plan = self
            .plan_repo
            .find_active_plan_by_id(order.plan_id)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::PlanNotFound)?;

        // The gateway takes whole currency units.
        let total_amount = i64::from(order.amount_minor) / 100;
        let fields = self.ecpay_gateway.build_payment_form(
            &order.order_number,
            total_amount,
            &plan.name,
            "subscription order",
            payment_method.gateway_choose_payment(),
        );

        info!(%order_id, order_number = %order.order_number, "orders: payment form built");

        Ok(PaymentRequestDto {
            action_url: self.ecpay_gateway.payment_url(),
            method: "POST",
            fields,
        })
    }

    /// Gateway callback intake. Verifies the signature, checks the order is
    /// known and the result code interpretable, then queues the actual state
    /// change for the reconciliation worker. Ok here means "ack with 1|OK";
    /// the heavy lifting is deliberately not done on the webhook thread.
    pub async fn handle_callback(&self, fields: BTreeMap<String, String>) -> UseCaseResult<()> {
        let callback = CallbackPayload::from_fields(fields.clone()).map_err(|err| {
            warn!(error = %err, "orders: callback missing required fields");
            OrderError::InvalidCallback(err.to_string())
        })?;

        if !self.ecpay_gateway.verify_callback(&fields) {
            self.audit_callback_rejection(&callback, "signature verification failed")
                .await?;
            return Err(OrderError::InvalidCallback(
                "signature verification failed".to_string(),
            ));
        }

        if callback.status() == GatewayStatus::Unknown {
            self.audit_callback_rejection(
                &callback,
                &format!("unrecognized gateway result code {}", callback.rtn_code),
            )
            .await?;
            return Err(OrderError::InvalidCallback(format!(
                "unrecognized gateway result code {}",
                callback.rtn_code
            )));
        }

        let Some(order) = self
            .order_repo
            .find_by_order_number(&callback.merchant_trade_no)
            .await
            .map_err(OrderError::Internal)?
        else {
            self.audit_callback_rejection(&callback, "no matching order")
                .await?;
            warn!(
                merchant_trade_no = %callback.merchant_trade_no,
                "orders: callback for unknown order"
            );
            return Err(OrderError::OrderNotFound);
        };

        // Early reject; the reconciliation transaction re-checks this under
        // the row lock and stays the authoritative guard.
        if callback.amount_minor() != i64::from(order.amount_minor) {
            self.audit_callback_rejection(
                &callback,
                &format!(
                    "callback amount {} disagrees with order amount {}",
                    callback.amount_minor(),
                    order.amount_minor
                ),
            )
            .await?;
            warn!(
                merchant_trade_no = %callback.merchant_trade_no,
                received_minor = callback.amount_minor(),
                expected_minor = order.amount_minor,
                "orders: callback amount mismatch"
            );
            return Err(OrderError::InvalidCallback("amount mismatch".to_string()));
        }

        let job_id = self
            .job_repo
            .enqueue_payment_callback_job(PaymentCallbackJob {
                order_number: callback.merchant_trade_no.clone(),
                fields,
            })
            .await
            .map_err(OrderError::Internal)?;

        self.audit_repo
            .append(InsertAuditLogEntity {
                user_id: None,
                action: AuditAction::Payment.to_string(),
                resource_type: "order".to_string(),
                resource_id: callback.merchant_trade_no.clone(),
                description: "payment callback accepted and queued".to_string(),
                metadata: json!({
                    "trade_no": callback.trade_no,
                    "rtn_code": callback.rtn_code,
                    "job_id": job_id,
                }),
            })
            .await
            .map_err(OrderError::Internal)?;

        info!(
            merchant_trade_no = %callback.merchant_trade_no,
            job_id,
            "orders: callback verified and queued"
        );

        Ok(())
    }

    pub async fn get_invoice(&self, order_id: Uuid) -> UseCaseResult<InvoiceDto> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::OrderNotFound)?;

        let invoice = self
            .invoice_repo
            .find_by_order_id(order.id)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::InvoiceNotFound)?;

        Ok(InvoiceDto {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            order_id: invoice.order_id,
            amount_minor: invoice.amount_minor,
            tax_amount_minor: invoice.tax_amount_minor,
            total_amount_minor: invoice.total_amount_minor,
            currency: invoice.currency,
            issued_at: invoice.issued_at,
            paid_at: invoice.paid_at,
        })
    }

    async fn audit_callback_rejection(
        &self,
        callback: &CallbackPayload,
        reason: &str,
    ) -> UseCaseResult<()> {
        self.audit_repo
            .append(InsertAuditLogEntity {
                user_id: None,
                action: AuditAction::Payment.to_string(),
                resource_type: "order".to_string(),
                resource_id: callback.merchant_trade_no.clone(),
                description: format!("payment callback rejected: {reason}"),
                metadata: json!({
                    "trade_no": callback.trade_no,
                    "rtn_code": callback.rtn_code,
                }),
            })
            .await
            .map_err(OrderError::Internal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::entities::{invoices::InvoiceEntity, orders::OrderEntity, plans::PlanEntity};
    use domain::repositories::{
        audit_logs::MockAuditLogRepository, invoices::MockInvoiceRepository,
        job::MockJobRepository, orders::MockOrderRepository, plans::MockPlanRepository,
        subscriptions::MockSubscriptionRepository,
    };

    fn plan() -> PlanEntity {
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Premium".to_string(),
            slug: "premium".to_string(),
            price_minor: 99_000,
            currency: "TWD".to_string(),
            billing_cycle: "monthly".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn order(status: &str) -> OrderEntity {
        OrderEntity {
            id: Uuid::new_v4(),
            order_number: "250101120000ABC123".to_string(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            subscription_id: Some(Uuid::new_v4()),
            amount_minor: 99_000,
            currency: "TWD".to_string(),
            status: status.to_string(),
            payment_method: "credit_card".to_string(),
            payment_id: None,
            payment_data: json!({}),
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn callback_fields() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("MerchantTradeNo".to_string(), "250101120000ABC123".to_string()),
            ("TradeNo".to_string(), "2501011200001234".to_string()),
            ("TradeAmt".to_string(), "990".to_string()),
            ("RtnCode".to_string(), "1".to_string()),
            ("RtnMsg".to_string(), "Succeeded".to_string()),
            ("CheckMacValue".to_string(), "ABCDEF".to_string()),
        ])
    }

    struct Mocks {
        orders: MockOrderRepository,
        subscriptions: MockSubscriptionRepository,
        plans: MockPlanRepository,
        invoices: MockInvoiceRepository,
        jobs: MockJobRepository,
        audits: MockAuditLogRepository,
        gateway: MockEcpayGateway,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                orders: MockOrderRepository::new(),
                subscriptions: MockSubscriptionRepository::new(),
                plans: MockPlanRepository::new(),
                invoices: MockInvoiceRepository::new(),
                jobs: MockJobRepository::new(),
                audits: MockAuditLogRepository::new(),
                gateway: MockEcpayGateway::new(),
            }
        }

        fn into_use_case(
            self,
        ) -> OrderUseCase<
            MockOrderRepository,
            MockSubscriptionRepository,
            MockPlanRepository,
            MockInvoiceRepository,
            MockJobRepository,
            MockAuditLogRepository,
            MockEcpayGateway,
        > {
            OrderUseCase::new(
                Arc::new(self.orders),
                Arc::new(self.subscriptions),
                Arc::new(self.plans),
                Arc::new(self.invoices),
                Arc::new(self.jobs),
                Arc::new(self.audits),
                Arc::new(self.gateway),
            )
        }
    }

    #[tokio::test]
    async fn create_order_returns_pending_order() {
        let plan = plan();
        let plan_id = plan.id;
        let order_id = Uuid::new_v4();
        let subscription_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_find_active_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .subscriptions
            .expect_create_subscription()
            .withf(|sub| sub.status == "pending" && sub.starts_at.is_none())
            .returning(move |_| Ok(subscription_id));
        mocks
            .orders
            .expect_create_order()
            .withf(|order| order.status == "pending" && order.amount_minor == 99_000)
            .returning(move |_| Ok(order_id));
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        let dto = mocks
            .into_use_case()
            .create_order(CreateOrderModel {
                user_id: Uuid::new_v4(),
                plan_id,
                payment_method: PaymentMethod::CreditCard,
            })
            .await
            .unwrap();

        assert_eq!(dto.id, order_id);
        assert_eq!(dto.status, "pending");
        assert_eq!(dto.subscription_id, Some(subscription_id));
        assert_eq!(dto.order_number.len(), 18);
    }

    #[tokio::test]
    async fn create_order_rejects_unknown_plan() {
        let mut mocks = Mocks::new();
        mocks
            .plans
            .expect_find_active_plan_by_id()
            .returning(|_| Ok(None));
        mocks.subscriptions.expect_create_subscription().never();
        mocks.orders.expect_create_order().never();

        let err = mocks
            .into_use_case()
            .create_order(CreateOrderModel {
                user_id: Uuid::new_v4(),
                plan_id: Uuid::new_v4(),
                payment_method: PaymentMethod::Atm,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn payment_request_only_for_pending_orders() {
        let completed = order("completed");
        let order_id = completed.id;

        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));
        mocks.gateway.expect_build_payment_form().never();

        let err = mocks
            .into_use_case()
            .build_payment_request(order_id)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::NotPayable(_)));
    }

    #[tokio::test]
    async fn payment_request_builds_signed_form() {
        let pending = order("pending");
        let order_id = pending.id;
        let plan = plan();

        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(pending.clone())));
        mocks
            .plans
            .expect_find_active_plan_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        mocks
            .gateway
            .expect_build_payment_form()
            .withf(|trade_no, amount, _, _, choose| {
                trade_no == "250101120000ABC123" && *amount == 990 && choose == "Credit"
            })
            .returning(|_, _, _, _, _| {
                BTreeMap::from([("CheckMacValue".to_string(), "SIGNED".to_string())])
            });
        mocks
            .gateway
            .expect_payment_url()
            .returning(|| "https://payment-stage.ecpay.com.tw/Cashier/AioCheckOut/V5".to_string());

        let dto = mocks
            .into_use_case()
            .build_payment_request(order_id)
            .await
            .unwrap();

        assert_eq!(dto.method, "POST");
        assert!(dto.fields.contains_key("CheckMacValue"));
    }

    #[tokio::test]
    async fn callback_with_valid_signature_is_queued() {
        let known = order("pending");

        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| true);
        mocks
            .orders
            .expect_find_by_order_number()
            .returning(move |_| Ok(Some(known.clone())));
        mocks
            .jobs
            .expect_enqueue_payment_callback_job()
            .withf(|job| job.order_number == "250101120000ABC123")
            .times(1)
            .returning(|_| Ok(7));
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        mocks
            .into_use_case()
            .handle_callback(callback_fields())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn callback_with_bad_signature_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| false);
        mocks.jobs.expect_enqueue_payment_callback_job().never();
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        let err = mocks
            .into_use_case()
            .handle_callback(callback_fields())
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidCallback(_)));
    }

    #[tokio::test]
    async fn callback_missing_fields_is_rejected_before_verification() {
        let mut fields = callback_fields();
        fields.remove("TradeNo");

        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().never();
        mocks.jobs.expect_enqueue_payment_callback_job().never();

        let err = mocks
            .into_use_case()
            .handle_callback(fields)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidCallback(_)));
    }

    #[tokio::test]
    async fn callback_with_unknown_rtn_code_is_rejected() {
        let mut fields = callback_fields();
        fields.insert("RtnCode".to_string(), "800".to_string());

        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| true);
        mocks.jobs.expect_enqueue_payment_callback_job().never();
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        let err = mocks
            .into_use_case()
            .handle_callback(fields)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidCallback(_)));
    }

    #[tokio::test]
    async fn callback_failure_code_is_still_accepted() {
        let known = order("pending");

        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| true);
        mocks
            .orders
            .expect_find_by_order_number()
            .returning(move |_| Ok(Some(known.clone())));
        mocks
            .jobs
            .expect_enqueue_payment_callback_job()
            .times(1)
            .returning(|_| Ok(8));
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        let mut fields = callback_fields();
        fields.insert("RtnCode".to_string(), "10100058".to_string());

        mocks.into_use_case().handle_callback(fields).await.unwrap();
    }

    #[tokio::test]
    async fn callback_with_wrong_amount_is_rejected() {
        let known = order("pending");

        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| true);
        mocks
            .orders
            .expect_find_by_order_number()
            .returning(move |_| Ok(Some(known.clone())));
        mocks.jobs.expect_enqueue_payment_callback_job().never();
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        // Order is 99_000 minor; 999 whole units would be 99_900.
        let mut fields = callback_fields();
        fields.insert("TradeAmt".to_string(), "999".to_string());

        let err = mocks
            .into_use_case()
            .handle_callback(fields)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InvalidCallback(_)));
    }

    #[tokio::test]
    async fn callback_for_unknown_order_is_rejected() {
        let mut mocks = Mocks::new();
        mocks.gateway.expect_verify_callback().returning(|_| true);
        mocks
            .orders
            .expect_find_by_order_number()
            .returning(|_| Ok(None));
        mocks.jobs.expect_enqueue_payment_callback_job().never();
        mocks.audits.expect_append().times(1).returning(|_| Ok(()));

        let err = mocks
            .into_use_case()
            .handle_callback(callback_fields())
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::OrderNotFound));
    }

    #[tokio::test]
    async fn invoice_lookup_maps_entity_to_dto() {
        let known = order("completed");
        let order_id = known.id;
        let invoice = InvoiceEntity {
            id: Uuid::new_v4(),
            invoice_number: "INV25010112000012345".to_string(),
            order_id,
            user_id: known.user_id,
            amount_minor: 99_000,
            tax_amount_minor: 4_950,
            total_amount_minor: 103_950,
            currency: "TWD".to_string(),
            issued_at: Utc::now(),
            paid_at: Some(Utc::now()),
        };
        let invoice_id = invoice.id;

        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(known.clone())));
        mocks
            .invoices
            .expect_find_by_order_id()
            .returning(move |_| Ok(Some(invoice.clone())));

        let dto = mocks.into_use_case().get_invoice(order_id).await.unwrap();
        assert_eq!(dto.id, invoice_id);
        assert_eq!(dto.total_amount_minor, 103_950);
    }

    #[tokio::test]
    async fn invoice_missing_for_unpaid_order() {
        let known = order("pending");
        let order_id = known.id;

        let mut mocks = Mocks::new();
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(known.clone())));
        mocks
            .invoices
            .expect_find_by_order_id()
            .returning(|_| Ok(None));

        let err = mocks
            .into_use_case()
            .get_invoice(order_id)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvoiceNotFound));
    }
}
