use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::invoices;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i32,
    pub tax_amount_minor: i32,
    pub total_amount_minor: i32,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub struct InsertInvoiceEntity {
    pub invoice_number: String,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i32,
    pub tax_amount_minor: i32,
    pub total_amount_minor: i32,
    pub currency: String,
    pub paid_at: Option<DateTime<Utc>>,
}
