//! Event store backed by SQLx and PostgreSQL

use crate::error::{AppError, Result};
use crate::models::{MetricEvent, Severity};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{error, info};

/// Connection pool and raw-event persistence operations.
///
/// This is the "event source collaborator" of the aggregation engine:
/// it supplies the complete set of events inside a time window, and the
/// engine does the rest in memory. Store failures propagate unmodified;
/// the engine never returns a partial result.
#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Create a new database connection pool
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        info!("Database connection pool established");
        Ok(Self { pool })
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the events table and its window index if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS metric_events (
                id UUID PRIMARY KEY,
                service_name TEXT NOT NULL,
                severity TEXT NOT NULL,
                occurred_at TIMESTAMPTZ NOT NULL,
                response_time_ms DOUBLE PRECISION NOT NULL,
                status_code INT NOT NULL,
                request_count BIGINT NOT NULL,
                cpu_usage_pct DOUBLE PRECISION,
                mem_usage_pct DOUBLE PRECISION
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_metric_events_occurred_at
             ON metric_events (occurred_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Batch insert events for better performance
    pub async fn insert_events_batch(&self, events: &[MetricEvent]) -> Result<usize> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for event in events {
            match sqlx::query(
                r#"
                INSERT INTO metric_events (
                    id, service_name, severity, occurred_at,
                    response_time_ms, status_code, request_count,
                    cpu_usage_pct, mem_usage_pct
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(event.id)
            .bind(&event.service_name)
            .bind(severity_to_string(event.severity))
            .bind(event.timestamp)
            .bind(event.response_time_ms)
            .bind(event.status_code as i32)
            .bind(event.request_count as i64)
            .bind(event.cpu_usage_pct)
            .bind(event.mem_usage_pct)
            .execute(&mut *tx)
            .await
            {
                Ok(_) => inserted += 1,
                Err(e) => {
                    error!(error = %e, event_id = %event.id, "Failed to insert event");
                }
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Fetch every event inside the optional time window.
    ///
    /// Service/severity filtering happens in the engine; the store only
    /// narrows by time so the window index does the heavy lifting.
    pub async fn fetch_events(
        &self,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<MetricEvent>> {
        let (start, end) = match window {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        let rows = sqlx::query(
            r#"
            SELECT id, service_name, severity, occurred_at,
                   response_time_ms, status_code, request_count,
                   cpu_usage_pct, mem_usage_pct
            FROM metric_events
            WHERE ($1::timestamptz IS NULL OR occurred_at >= $1)
              AND ($2::timestamptz IS NULL OR occurred_at < $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_event).collect())
    }

    /// Get the most recent raw events
    pub async fn get_recent_events(&self, limit: i64) -> Result<Vec<MetricEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, service_name, severity, occurred_at,
                   response_time_ms, status_code, request_count,
                   cpu_usage_pct, mem_usage_pct
            FROM metric_events
            ORDER BY occurred_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_event).collect())
    }

    /// Manually prune old raw events
    pub async fn prune_old_events(&self, older_than_days: i32) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM metric_events
             WHERE occurred_at < NOW() - make_interval(days => $1)",
        )
        .bind(older_than_days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn row_to_event(row: sqlx::postgres::PgRow) -> MetricEvent {
    MetricEvent {
        id: row.get("id"),
        service_name: row.get("service_name"),
        severity: string_to_severity(row.get("severity")),
        timestamp: row.get("occurred_at"),
        response_time_ms: row.get("response_time_ms"),
        status_code: row.get::<i32, _>("status_code") as u16,
        request_count: row.get::<i64, _>("request_count") as u64,
        cpu_usage_pct: row.get("cpu_usage_pct"),
        mem_usage_pct: row.get("mem_usage_pct"),
    }
}

/// Convert Severity to database string
fn severity_to_string(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}

/// Convert database string to Severity
fn string_to_severity(s: &str) -> Severity {
    match s {
        "low" => Severity::Low,
        "medium" => Severity::Medium,
        "high" => Severity::High,
        "critical" => Severity::Critical,
        _ => Severity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip() {
        for severity in [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            assert_eq!(string_to_severity(severity_to_string(severity)), severity);
        }
    }

    #[test]
    fn test_unknown_severity_defaults_to_low() {
        assert_eq!(string_to_severity("bogus"), Severity::Low);
    }
}
