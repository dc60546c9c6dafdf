use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::audit_logs::InsertAuditLogEntity, repositories::audit_logs::AuditLogRepository,
    schema::audit_logs,
};

pub struct AuditLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AuditLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogPostgres {
    async fn append(&self, entry: InsertAuditLogEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::insert_into(audit_logs::table)
            .values(&entry)
            .execute(&mut conn)?;

        Ok(())
    }
}
