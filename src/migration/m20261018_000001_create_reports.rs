//! Migration: Create reports table.
//!
//! One row per report job; payload, meta and output are JSONB documents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE reports (
                    id VARCHAR(32) PRIMARY KEY, -- UUIDv7, simple form
                    report_index VARCHAR(255) NOT NULL,
                    jobtype VARCHAR(64) NOT NULL,
                    created_by VARCHAR(255),

                    payload JSONB NOT NULL,
                    meta JSONB NOT NULL DEFAULT '{}'::jsonb,

                    status VARCHAR(32) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'processing', 'completed', 'completed_with_warnings', 'failed')),
                    attempts INTEGER NOT NULL DEFAULT 0,
                    max_attempts INTEGER NOT NULL,
                    timeout_ms BIGINT NOT NULL,

                    browser_timezone VARCHAR(64),
                    kibana_name VARCHAR(255),
                    kibana_id VARCHAR(255),

                    -- content_type, size, content, error
                    output JSONB,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    started_at TIMESTAMPTZ,
                    completed_at TIMESTAMPTZ
                );

                -- Jobs list: caller's reports, newest first
                CREATE INDEX idx_reports_created_by_created_at ON reports(created_by, created_at DESC);

                CREATE INDEX idx_reports_status ON reports(status);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS reports;")
            .await?;

        Ok(())
    }
}
