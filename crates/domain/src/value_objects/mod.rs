pub mod enums;
pub mod invoices;
pub mod orders;
pub mod payment_callback;
pub mod reconciliation;
