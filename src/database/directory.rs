use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::{self, DatabaseError, UserPool};

/// Resolves a verified address to the internal user id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Case-insensitive lookup. `Ok(None)` when no row matches; an error when
    /// the lookup fails or more than one row matches.
    async fn find_user_by_address(&self, address: &str) -> Result<Option<Uuid>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Lookup against the `users` table through the user-tier pool.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: UserPool,
}

impl PgUserDirectory {
    pub fn new(pool: UserPool) -> Self {
        Self { pool }
    }
}

const FIND_BY_ADDRESS: &str = r#"SELECT id FROM users WHERE address ILIKE $1 ESCAPE '\' LIMIT 2"#;

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_address(&self, address: &str) -> Result<Option<Uuid>, DatabaseError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(FIND_BY_ADDRESS)
            .bind(escape_like(address))
            .fetch_all(self.pool.pool())
            .await?;

        match ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(DatabaseError::AmbiguousAddress(address.to_string())),
        }
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        manager::ping(self.pool.pool()).await
    }
}

/// Escape LIKE metacharacters so ILIKE acts as case-insensitive equality.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
