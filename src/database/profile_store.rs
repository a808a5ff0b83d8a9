use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::{self, DatabaseError, ServicePool};
use crate::database::models::{ProfileUpdate, UserRecord, USER_COLUMNS};

/// Writes profile changes with service-level privilege.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Apply the update to the row with `id`. `Ok(None)` when no row matched.
    async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<UserRecord>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Profile writes against the `users` table through the service-tier pool.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: ServicePool,
}

impl PgProfileStore {
    pub fn new(pool: ServicePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn update_user(&self, id: Uuid, update: &ProfileUpdate) -> Result<Option<UserRecord>, DatabaseError> {
        let values = update.text_values()?;
        let sql = build_update_sql(update);

        let mut query = sqlx::query_as::<_, UserRecord>(&sql);
        for (_, value) in values {
            query = query.bind(value);
        }

        let row = query
            .bind(update.updated_at())
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(row)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        manager::ping(self.pool.pool()).await
    }
}

/// Column names come from the fixed allow-list, never from the request.
fn build_update_sql(update: &ProfileUpdate) -> String {
    let columns = update.columns();
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("\"{}\" = ${}", column, i + 1))
        .collect();

    format!(
        "UPDATE users SET {} WHERE id = ${} RETURNING {}",
        assignments.join(", "),
        columns.len() + 1,
        USER_COLUMNS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ProfileChanges;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn update_sql_binds_fields_then_timestamp_then_id() {
        let body = json!({ "display_name": "Alice", "header_url": "https://x/h.png" });
        let update = ProfileChanges::from_body(body.as_object().unwrap()).stamped(Utc::now());

        assert_eq!(
            build_update_sql(&update),
            format!(
                "UPDATE users SET \"display_name\" = $1, \"header_url\" = $2, \"updated_at\" = $3 WHERE id = $4 RETURNING {}",
                USER_COLUMNS
            )
        );
    }
}
