use std::{str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::{debug, warn};

use super::{StoreBackend, StoreError, UserStore};
use crate::users::repo_types::User;

/// Opens sqlx pools against a Postgres server.
pub struct PgBackend {
    url: String,
    database: Option<String>,
    max_connections: u32,
    connect_timeout: Duration,
}

impl PgBackend {
    pub fn new(
        url: &str,
        database: Option<&str>,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Self {
        Self {
            url: url.to_string(),
            database: database.map(str::to_string),
            max_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        }
    }
}

#[async_trait]
impl StoreBackend for PgBackend {
    async fn connect(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        let mut options = PgConnectOptions::from_str(&self.url).map_err(StoreError::Connect)?;
        if let Some(db) = &self.database {
            options = options.database(db);
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            warn!(error = %e, "migration failed; continuing");
        }

        debug!(store = %self.describe(), "postgres pool ready");
        Ok(Arc::new(PgStore { pool }))
    }

    fn describe(&self) -> String {
        let (scheme, rest) = self.url.split_once("://").unwrap_or(("postgres", self.url.as_str()));
        // drop user:password@
        let host = rest.rsplit_once('@').map_or(rest, |(_, h)| h);
        let host = host.split('?').next().unwrap_or(host);
        match &self.database {
            Some(db) => format!("{scheme}://{host} (database {db})"),
            None => format!("{scheme}://{host}"),
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            e => StoreError::Database(e),
        })
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_without_credentials_or_db_override() {
        let backend = PgBackend::new("postgres://localhost:5432/signup?sslmode=disable", None, 1, 1);
        assert_eq!(backend.describe(), "postgres://localhost:5432/signup");
    }

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let backend = PgBackend::new("not a url", None, 1, 1);
        let err = backend.connect().await.err().expect("connect should fail");
        assert!(matches!(err, StoreError::Connect(_)));
    }
}
