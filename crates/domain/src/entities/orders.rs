use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::orders;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = orders)]
pub struct OrderEntity {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub payment_data: Value,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct InsertOrderEntity {
    pub order_number: String,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub payment_data: Value,
}
