use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::orders::{InsertOrderEntity, OrderEntity};

#[automock]
#[async_trait]
pub trait OrderRepository {
    async fn create_order(&self, order: InsertOrderEntity) -> Result<Uuid>;

    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderEntity>>;

    async fn find_by_order_number(&self, order_number: &str) -> Result<Option<OrderEntity>>;
}
