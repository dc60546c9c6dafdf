use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price_minor: i32,
    pub currency: String,
    pub billing_cycle: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
