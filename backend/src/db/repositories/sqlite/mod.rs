//! SQLite repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures (pool exhaustion, locked database)
//! - Embedded schema migrations, run once on construction
//!
//! Connection settings come from [`SqliteConfig`].

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::config::SqliteConfig;
use crate::db::repository::{
    ErrorContext, ProfileRepository, RepositoryError, RepositoryResult, SalesRepository,
};
use crate::models::{HyperparameterProfile, Observation};

mod models;
mod schema;

use models::*;
use schema::*;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/sqlite/migrations");

/// Rows per INSERT statement; 3 bound values each keeps us under 999.
const INSERT_CHUNK: usize = 300;

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Per-connection pragmas applied when the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for SQLite.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl SqliteRepository {
    /// Open the database and run pending migrations.
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);

        let (max_size, idle_timeout) = if config.is_in_memory() {
            (1, None)
        } else {
            (config.max_pool_size.max(1), Some(Duration::from_secs(600)))
        };

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(idle_timeout)
            .max_lifetime(if config.is_in_memory() {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout_ms: config.busy_timeout_ms,
            }))
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("database_url={}", config.database_url)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        log::info!(
            "SQLite repository ready at {} (pool size {})",
            config.database_url,
            max_size
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Migration failed: {}", e),
                context: ErrorContext::new("run_migrations"),
            }
        })?;
        Ok(())
    }

    /// Execute a database operation on a blocking thread, retrying transient
    /// failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("Retrying SQLite operation after: {}", e);
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            max_size: self.pool.max_size(),
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }
}

#[async_trait]
impl SalesRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn load_history(&self) -> RepositoryResult<Vec<Observation>> {
        self.with_conn(|conn| {
            let rows = sales_data::table
                .order((sales_data::date.asc(), sales_data::id.asc()))
                .select(SalesRow::as_select())
                .load::<SalesRow>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("load_history"))?;
            Ok(rows.into_iter().map(Observation::from).collect())
        })
        .await
    }

    async fn save_history(&self, rows: &[Observation]) -> RepositoryResult<usize> {
        let rows = rows.to_vec();
        self.with_conn(move |conn| {
            conn.immediate_transaction::<_, RepositoryError, _>(|tx| {
                diesel::delete(sales_data::table).execute(tx)?;
                let mut written = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    let batch: Vec<NewSalesRow<'_>> = chunk.iter().map(NewSalesRow::from).collect();
                    written += diesel::insert_into(sales_data::table)
                        .values(&batch)
                        .execute(tx)?;
                }
                Ok(written)
            })
            .map_err(|e| e.with_operation("save_history"))
        })
        .await
    }

    async fn count_observations(&self) -> RepositoryResult<usize> {
        self.with_conn(|conn| {
            let count: i64 = sales_data::table
                .count()
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("count_observations"))?;
            Ok(count.max(0) as usize)
        })
        .await
    }
}

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn load_active_profile(&self) -> RepositoryResult<HyperparameterProfile> {
        self.with_conn(|conn| {
            let row = settings::table
                .find(ACTIVE_SETTINGS_ID)
                .select(SettingsRow::as_select())
                .first::<SettingsRow>(conn)
                .optional()
                .map_err(|e| RepositoryError::from(e).with_operation("load_active_profile"))?;
            match row {
                Some(row) => row.into_profile(),
                None => Ok(HyperparameterProfile::default()),
            }
        })
        .await
    }

    async fn save_profile(&self, profile: &HyperparameterProfile) -> RepositoryResult<()> {
        let row = SettingsRow::from_profile(profile)?;
        self.with_conn(move |conn| {
            diesel::replace_into(settings::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("save_profile"))?;
            Ok(())
        })
        .await
    }
}
