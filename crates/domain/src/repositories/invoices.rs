use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::invoices::InvoiceEntity;

#[automock]
#[async_trait]
pub trait InvoiceRepository {
    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Option<InvoiceEntity>>;
}
