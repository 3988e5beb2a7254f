//! Contact message repository
//!
//! Contact submissions are append-only: the application stores them and
//! lists them, nothing else.

use super::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::ContactMessage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage>;
    async fn list(&self) -> Result<Vec<ContactMessage>>;
}

pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, message: &ContactMessage) -> Result<ContactMessage> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => create_sqlite(pool, message).await,
            Backend::Mysql(pool) => create_mysql(pool, message).await,
        }
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => list_sqlite(pool).await,
            Backend::Mysql(pool) => list_mysql(pool).await,
        }
    }
}

const INSERT_CONTACT: &str =
    "INSERT INTO contacts (name, email, phone_num, msg, date) VALUES (?, ?, ?, ?, ?)";
const SELECT_CONTACTS: &str =
    "SELECT sno, name, email, phone_num, msg, date FROM contacts ORDER BY sno ASC";

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, message: &ContactMessage) -> Result<ContactMessage> {
    let result = sqlx::query(INSERT_CONTACT)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone_num)
        .bind(&message.msg)
        .bind(&message.date)
        .execute(pool)
        .await
        .context("Failed to store contact message")?;

    Ok(ContactMessage {
        sno: result.last_insert_rowid(),
        ..message.clone()
    })
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<ContactMessage>> {
    let rows = sqlx::query(SELECT_CONTACTS)
        .fetch_all(pool)
        .await
        .context("Failed to list contact messages")?;
    Ok(rows
        .iter()
        .map(|row| ContactMessage {
            sno: row.get("sno"),
            name: row.get("name"),
            email: row.get("email"),
            phone_num: row.get("phone_num"),
            msg: row.get("msg"),
            date: row.get("date"),
        })
        .collect())
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, message: &ContactMessage) -> Result<ContactMessage> {
    let result = sqlx::query(INSERT_CONTACT)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone_num)
        .bind(&message.msg)
        .bind(&message.date)
        .execute(pool)
        .await
        .context("Failed to store contact message")?;

    Ok(ContactMessage {
        sno: result.last_insert_id() as i64,
        ..message.clone()
    })
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<ContactMessage>> {
    let rows = sqlx::query(SELECT_CONTACTS)
        .fetch_all(pool)
        .await
        .context("Failed to list contact messages")?;
    Ok(rows
        .iter()
        .map(|row| ContactMessage {
            sno: row.get("sno"),
            name: row.get("name"),
            email: row.get("email"),
            phone_num: row.get("phone_num"),
            msg: row.get("msg"),
            date: row.get("date"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        let repo = SqlxContactRepository::new(pool);

        let message = ContactMessage {
            sno: 0,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_num: "5550100".to_string(),
            msg: "Nice blog".to_string(),
            date: "2024-03-01 12:00:00".to_string(),
        };

        let stored = repo.create(&message).await.expect("Failed to store");
        assert!(stored.sno > 0);

        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![stored]);
    }
}
