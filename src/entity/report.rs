//! Report entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    /// UUIDv7 in simple (hyphenless) form
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Weekly index name, e.g. `.reporting-2026-10-18`
    pub report_index: String,
    pub jobtype: String,
    /// NULL for reports created with security disabled
    pub created_by: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: JsonValue,
    #[sea_orm(column_type = "JsonBinary")]
    pub meta: JsonValue,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub timeout_ms: i64,
    pub browser_timezone: Option<String>,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub output: Option<JsonValue>,
    pub created_at: DateTimeUtc,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
