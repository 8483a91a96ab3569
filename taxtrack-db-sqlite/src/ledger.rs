use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use taxtrack_core::{
    IncomeId, IncomeRecord, IncomeType, LedgerError, LedgerStore, NewIncomeRecord,
};
use tracing::{debug, info};

use crate::decimal::{decimal_to_text, get_decimal};

const IN_MEMORY: &str = ":memory:";

pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open the database named by `target`.
    ///
    /// * `":memory:"`: a private in-memory database. The pool is pinned to
    ///   one connection that is never recycled, since every new connection
    ///   would see a different, empty database.
    /// * `sqlite:...`: a sqlx connection URL, used as is.
    /// * anything else: a file path, created if missing.
    pub async fn open(target: &str) -> Result<Self> {
        let connected = if target == IN_MEMORY || target == "sqlite::memory:" {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
        } else {
            let options = if target.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(target)
                    .with_context(|| format!("Invalid SQLite URL: {}", target))?
            } else {
                SqliteConnectOptions::new().filename(target)
            };
            SqlitePoolOptions::new()
                .connect_with(options.create_if_missing(true))
                .await
        };
        let pool =
            connected.with_context(|| format!("Failed to connect to database: {}", target))?;

        info!(database = target, "opened sqlite ledger");
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: sqlx::Error) -> LedgerError {
    LedgerError::Database(e.to_string())
}

fn row_to_income(row: &sqlx::sqlite::SqliteRow) -> Result<IncomeRecord, LedgerError> {
    let income_type: String = row.try_get("income_type").map_err(db_error)?;
    let income_type = IncomeType::parse(&income_type).ok_or_else(|| {
        LedgerError::Database(format!("Invalid income type: {}", income_type))
    })?;

    Ok(IncomeRecord {
        id: row.try_get("id").map_err(db_error)?,
        job_name: row.try_get("job_name").map_err(db_error)?,
        amount: get_decimal(row, "amount")?,
        federal_amount: get_decimal(row, "federal_amount")?,
        date: row
            .try_get::<NaiveDate, _>("date")
            .map_err(|e| LedgerError::Database(format!("Failed to get date: {}", e)))?,
        income_type,
    })
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn insert(
        &self,
        record: NewIncomeRecord,
    ) -> Result<IncomeRecord, LedgerError> {
        let result = sqlx::query(
            "INSERT INTO incomes (job_name, amount, federal_amount, date, income_type)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.job_name())
        .bind(decimal_to_text(record.amount()))
        .bind(decimal_to_text(record.federal_amount()))
        .bind(record.date())
        .bind(record.income_type().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let id = result.last_insert_rowid();
        debug!(id, "income record stored in sqlite");
        Ok(record.into_record(id))
    }

    async fn remove(
        &self,
        id: IncomeId,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound(id));
        }

        debug!(id, "income record removed from sqlite");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<IncomeRecord>, LedgerError> {
        let rows = sqlx::query(
            "SELECT id, job_name, amount, federal_amount, date, income_type
             FROM incomes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(row_to_income).collect()
    }
}
