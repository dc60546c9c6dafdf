pub mod audit_logs;
pub mod invoices;
pub mod job;
pub mod orders;
pub mod plans;
pub mod reconciliation;
pub mod subscriptions;
