pub mod audit_logs;
pub mod invoices;
pub mod jobs;
pub mod orders;
pub mod plans;
pub mod subscriptions;
