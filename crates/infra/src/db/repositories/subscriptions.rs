use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    repositories::subscriptions::SubscriptionRepository,
    schema::subscriptions,
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create_subscription(&self, subscription: InsertSubscriptionEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription_id = diesel::insert_into(subscriptions::table)
            .values(&subscription)
            .returning(subscriptions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(subscription_id)
    }

    async fn expire_overdue(&self) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let changed = diesel::update(subscriptions::table)
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscriptions::ends_at.lt(Some(Utc::now())))
            .set(subscriptions::status.eq(SubscriptionStatus::Expired.to_string()))
            .execute(&mut conn)?;

        Ok(changed)
    }
}
