//! Database module
//!
//! Database connection and schema utilities.

use sqlx::PgPool;

/// Tables the ledger store reads and writes
const REQUIRED_TABLES: &[&str] = &["clientes", "transacoes"];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist and clients are provisioned.
/// The schema itself lives in migrations/ and is applied out-of-band.
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clientes")
        .fetch_one(pool)
        .await?;

    if clients == 0 {
        tracing::error!("No clients provisioned. Please run database seed.");
        return Ok(false);
    }

    tracing::info!(clients, "Provisioned clients verified");
    Ok(true)
}
