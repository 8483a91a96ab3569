use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{Row, TypeInfo, ValueRef};
use taxtrack_core::LedgerError;

/// Get a decimal value from a row.
///
/// Amounts are written as TEXT so they round-trip exactly; INTEGER and REAL
/// are accepted too, for rows written by hand or by older tooling.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, LedgerError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| LedgerError::Database(format!("Column '{}' not found: {}", column, e)))?;

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "TEXT" => {
            let val: String = row.try_get(column).map_err(|e| {
                LedgerError::Database(format!("Failed to get TEXT from '{}': {}", column, e))
            })?;
            Decimal::from_str(val.trim()).map_err(|e| {
                LedgerError::Database(format!(
                    "Failed to parse decimal '{}' in '{}': {}",
                    val, column, e
                ))
            })
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                LedgerError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                LedgerError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                LedgerError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        _ => Err(LedgerError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Text form used when writing a decimal column.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE test_decimals (
                id INTEGER PRIMARY KEY,
                value
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch_value(
        pool: &SqlitePool,
        literal: &str,
    ) -> Result<Decimal, LedgerError> {
        sqlx::query(&format!("INSERT INTO test_decimals (id, value) VALUES (1, {literal})"))
            .execute(pool)
            .await
            .expect("Failed to insert test data");

        let row = sqlx::query("SELECT value FROM test_decimals WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row");

        get_decimal(&row, "value")
    }

    #[tokio::test]
    async fn test_get_decimal_from_text() {
        let pool = setup_test_db().await;

        let result = fetch_value(&pool, "'1234.56'").await;

        assert_eq!(result, Ok(dec!(1234.56)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_integer() {
        let pool = setup_test_db().await;

        let result = fetch_value(&pool, "12345").await;

        assert_eq!(result, Ok(dec!(12345)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_real() {
        let pool = setup_test_db().await;

        let result = fetch_value(&pool, "99.5").await;

        assert_eq!(result, Ok(dec!(99.5)));
    }

    #[tokio::test]
    async fn test_get_decimal_rejects_garbage_text() {
        let pool = setup_test_db().await;

        let result = fetch_value(&pool, "'twelve'").await;

        assert!(matches!(result, Err(LedgerError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_decimal_rejects_null() {
        let pool = setup_test_db().await;

        let result = fetch_value(&pool, "NULL").await;

        assert!(matches!(result, Err(LedgerError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_decimal_missing_column() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_decimals (id, value) VALUES (1, 1)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");
        let row = sqlx::query("SELECT value FROM test_decimals WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row");

        let result = get_decimal(&row, "nonexistent");

        assert!(matches!(result, Err(LedgerError::Database(_))));
    }

    #[test]
    fn decimal_to_text_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(1500.50)), "1500.5");
        assert_eq!(decimal_to_text(dec!(0.00)), "0");
    }
}
