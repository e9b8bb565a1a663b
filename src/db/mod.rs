//! Database module providing connection management, migrations, and the
//! PostgreSQL report store.

mod reports;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

pub use reports::DbReportStore;

/// Upper bound on pooled connections.
const MAX_CONNECTIONS: u32 = 10;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect to the database at `database_url`.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options
            .max_connections(MAX_CONNECTIONS)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Get the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))
    }
}
