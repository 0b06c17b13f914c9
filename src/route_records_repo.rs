use anyhow::Result;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;

use crate::db::PgPool;
use crate::route_records::{NewRouteRecord, StoredRouteRecord};
use crate::schema::collected_data;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = collected_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct RouteRecordRow {
    id: i32,
    config_id: Option<i32>,
    geojson: JsonValue,
    step_m: f64,
    metadata: JsonValue,
    created_at: DateTime<Utc>,
}

impl From<RouteRecordRow> for StoredRouteRecord {
    fn from(row: RouteRecordRow) -> Self {
        Self {
            id: row.id,
            config_id: row.config_id,
            geojson: row.geojson,
            step_m: row.step_m,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = collected_data)]
struct NewRouteRecordRow {
    config_id: Option<i32>,
    geojson: JsonValue,
    step_m: f64,
    metadata: JsonValue,
}

impl From<NewRouteRecord> for NewRouteRecordRow {
    fn from(record: NewRouteRecord) -> Self {
        Self {
            config_id: record.config_id,
            geojson: record.geojson,
            step_m: record.step_m,
            metadata: record.metadata,
        }
    }
}

#[derive(Clone)]
pub struct RouteRecordRepository {
    pool: PgPool,
}

impl RouteRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a route record and return its id
    pub async fn insert(&self, record: NewRouteRecord) -> Result<i32> {
        let pool = self.pool.clone();
        let row = NewRouteRecordRow::from(record);

        tokio::task::spawn_blocking(move || -> Result<i32> {
            let mut conn = pool.get()?;
            let id = diesel::insert_into(collected_data::table)
                .values(&row)
                .returning(collected_data::id)
                .get_result(&mut conn)?;
            Ok(id)
        })
        .await?
    }

    /// Get a route record by id
    pub async fn get_by_id(&self, id: i32) -> Result<Option<StoredRouteRecord>> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<StoredRouteRecord>> {
            let mut conn = pool.get()?;
            let row = collected_data::table
                .filter(collected_data::id.eq(id))
                .select(RouteRecordRow::as_select())
                .first(&mut conn)
                .optional()?;
            Ok(row.map(StoredRouteRecord::from))
        })
        .await?
    }
}
