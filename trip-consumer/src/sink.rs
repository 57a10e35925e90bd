use async_trait::async_trait;
use metrics::counter;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::content::PlanRecord;
use crate::error::SinkError;

/// Persistence boundary: one create call per successfully decoded record,
/// no update or upsert path.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn create_plan(&self, record: PlanRecord) -> Result<(), SinkError>;
}

/// Sink that only logs records. Useful for local runs without a database.
pub struct PrintSink {}

#[async_trait]
impl RecordSink for PrintSink {
    async fn create_plan(&self, record: PlanRecord) -> Result<(), SinkError> {
        info!("plan record: {:?}", record);
        counter!("trip_records_created_total").increment(1);

        Ok(())
    }
}

/// Sink writing plan records to the `plan_contents` table.
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, SinkError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|error| SinkError::ConnectionError { error })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordSink for PostgresSink {
    async fn create_plan(&self, record: PlanRecord) -> Result<(), SinkError> {
        sqlx::query(
            r#"
INSERT INTO plan_contents (plan_date, plan_list, state)
VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.plan_date)
        .bind(&record.plan_list)
        .bind(&record.state)
        .execute(&self.pool)
        .await
        .map_err(|error| SinkError::QueryError {
            command: "INSERT".to_owned(),
            error,
        })?;

        counter!("trip_records_created_total").increment(1);

        Ok(())
    }
}
