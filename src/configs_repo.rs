use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;

use crate::configs::{DeploymentConfig, StoredConfig};
use crate::db::PgPool;
use crate::schema::user_configs;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = user_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ConfigRow {
    id: i32,
    user_id: Option<i32>,
    name: Option<String>,
    config: JsonValue,
    created_at: DateTime<Utc>,
}

impl From<ConfigRow> for StoredConfig {
    fn from(row: ConfigRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            config: row.config,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct ConfigRepository {
    pool: PgPool,
}

impl ConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Save a deployment configuration and return its id
    ///
    /// The whole payload, user id and name included, is kept in the `config`
    /// column.
    pub async fn insert(&self, config: DeploymentConfig) -> Result<i32> {
        let pool = self.pool.clone();
        let payload = serde_json::to_value(&config)?;

        tokio::task::spawn_blocking(move || -> Result<i32> {
            let mut conn = pool.get()?;
            let id = diesel::insert_into(user_configs::table)
                .values((
                    user_configs::user_id.eq(config.user_id),
                    user_configs::name.eq(config.name.as_deref()),
                    user_configs::config.eq(&payload),
                ))
                .returning(user_configs::id)
                .get_result(&mut conn)?;
            Ok(id)
        })
        .await?
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<StoredConfig>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<StoredConfig>> {
            let mut conn = pool.get()?;
            let row = user_configs::table
                .filter(user_configs::id.eq(id))
                .select(ConfigRow::as_select())
                .first(&mut conn)
                .optional()?;
            Ok(row.map(StoredConfig::from))
        })
        .await?
    }
}
