use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::audit_logs::InsertAuditLogEntity;

/// Append-only forensic trail. Every state-changing operation in the billing
/// core records one entry, including rejected callbacks.
#[automock]
#[async_trait]
pub trait AuditLogRepository {
    async fn append(&self, entry: InsertAuditLogEntity) -> Result<()>;
}
