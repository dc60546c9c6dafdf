use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::audit_logs;

/// Append-only; the table is written by the usecases and read by operators,
/// so only the insert side is modeled.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub struct InsertAuditLogEntity {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub description: String,
    pub metadata: Value,
}
