use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::subscriptions::InsertSubscriptionEntity;

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create_subscription(&self, subscription: InsertSubscriptionEntity) -> Result<Uuid>;

    /// Marks active subscriptions whose period has ended as expired and
    /// returns how many rows changed. Driven by the worker's periodic sweep.
    async fn expire_overdue(&self) -> Result<usize>;
}
