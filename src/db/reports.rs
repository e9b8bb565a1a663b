//! PostgreSQL-backed [`ReportingStore`].

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde_json::Value as JsonValue;

use crate::entity::report::{self, ActiveModel, Entity as ReportEntity};
use crate::models::{Report, ReportMeta, ReportOutput, ReportStatus};
use crate::store::{ListReportsQuery, ReportingStore, StoreError, index_name};

use super::DbPool;

/// Reports persisted in the `reports` table.
#[derive(Clone)]
pub struct DbReportStore {
    pool: DbPool,
    index_prefix: String,
}

impl DbReportStore {
    pub fn new(pool: DbPool, index_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            index_prefix: index_prefix.into(),
        }
    }
}

fn corrupt(id: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn to_json<T: serde::Serialize>(id: &str, value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| corrupt(id, e))
}

impl TryFrom<report::Model> for Report {
    type Error = StoreError;

    fn try_from(model: report::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let status = ReportStatus::parse(&model.status)
            .ok_or_else(|| corrupt(&id, format!("unknown status '{}'", model.status)))?;
        let payload = match model.payload {
            JsonValue::Object(map) => map,
            other => return Err(corrupt(&id, format!("payload is not an object: {}", other))),
        };
        let meta: ReportMeta = serde_json::from_value(model.meta).map_err(|e| corrupt(&id, e))?;
        let output: Option<ReportOutput> = model
            .output
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| corrupt(&id, e))?;

        Ok(Report {
            id,
            index: model.report_index,
            jobtype: model.jobtype,
            created_at: model.created_at,
            created_by: model.created_by,
            payload,
            meta,
            status,
            attempts: model.attempts,
            max_attempts: model.max_attempts,
            timeout: model.timeout_ms,
            browser_timezone: model.browser_timezone,
            kibana_name: model.kibana_name,
            kibana_id: model.kibana_id,
            started_at: model.started_at,
            completed_at: model.completed_at,
            output,
        })
    }
}

fn to_active_model(report: &Report) -> Result<ActiveModel, StoreError> {
    let output = report
        .output
        .as_ref()
        .map(|o| to_json(&report.id, o))
        .transpose()?;

    Ok(ActiveModel {
        id: Set(report.id.clone()),
        report_index: Set(report.index.clone()),
        jobtype: Set(report.jobtype.clone()),
        created_by: Set(report.created_by.clone()),
        payload: Set(JsonValue::Object(report.payload.clone())),
        meta: Set(to_json(&report.id, &report.meta)?),
        status: Set(report.status.as_str().to_string()),
        attempts: Set(report.attempts),
        max_attempts: Set(report.max_attempts),
        timeout_ms: Set(report.timeout),
        browser_timezone: Set(report.browser_timezone.clone()),
        kibana_name: Set(report.kibana_name.clone()),
        kibana_id: Set(report.kibana_id.clone()),
        output: Set(output),
        created_at: Set(report.created_at),
        started_at: Set(report.started_at),
        completed_at: Set(report.completed_at),
    })
}

/// Owner filter; `None` selects anonymous reports.
fn owner_condition(user: Option<&str>) -> Condition {
    match user {
        Some(user) => Condition::all().add(report::Column::CreatedBy.eq(user)),
        None => Condition::all().add(report::Column::CreatedBy.is_null()),
    }
}

#[async_trait]
impl ReportingStore for DbReportStore {
    async fn add_report(&self, mut report: Report) -> Result<Report, StoreError> {
        let conn = self.pool.connection();

        if ReportEntity::find_by_id(report.id.clone())
            .one(conn)
            .await?
            .is_some()
        {
            return Err(StoreError::Conflict(report.id));
        }

        report.index = index_name(&self.index_prefix, report.created_at);
        let stored = to_active_model(&report)?.insert(conn).await?;
        Report::try_from(stored)
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>, StoreError> {
        ReportEntity::find_by_id(id.to_string())
            .one(self.pool.connection())
            .await?
            .map(Report::try_from)
            .transpose()
    }

    async fn list_reports(&self, query: &ListReportsQuery) -> Result<Vec<Report>, StoreError> {
        let mut select = ReportEntity::find().filter(owner_condition(query.user.as_deref()));
        if let Some(ids) = &query.ids {
            select = select.filter(report::Column::Id.is_in(ids.iter().cloned()));
        }

        select
            .order_by_desc(report::Column::CreatedAt)
            .order_by_desc(report::Column::Id)
            .offset(query.page.saturating_mul(query.size))
            .limit(query.size)
            .all(self.pool.connection())
            .await?
            .into_iter()
            .map(Report::try_from)
            .collect()
    }

    async fn count_reports(&self, user: Option<&str>) -> Result<u64, StoreError> {
        let count = ReportEntity::find()
            .filter(owner_condition(user))
            .count(self.pool.connection())
            .await?;
        Ok(count)
    }

    async fn delete_report(&self, id: &str) -> Result<bool, StoreError> {
        let result = ReportEntity::delete_by_id(id.to_string())
            .exec(self.pool.connection())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
