pub mod audit_actions;
pub mod billing_cycles;
pub mod order_statuses;
pub mod payment_methods;
pub mod subscription_statuses;
