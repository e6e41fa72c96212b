use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Check PostgreSQL database health
///
/// Executes a `SELECT 1` query to verify the connection is working.
/// Useful for readiness and liveness probes.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    let row = db.query_one_raw(stmt).await?;
    if row.is_none() {
        return Err(DatabaseError::HealthCheckFailed(
            "SELECT 1 returned no rows".to_string(),
        ));
    }

    debug!("PostgreSQL health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, MockDatabase, RuntimeErr, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_check_health_passes_when_query_returns_a_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("?column?", Value::from(1))])]])
            .into_connection();

        assert!(check_health(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_health_surfaces_query_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
                "connection refused".to_string(),
            ))])
            .into_connection();

        let err = check_health(&db).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Postgres(_)));
    }
}
