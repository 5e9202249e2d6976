use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::guide::Subscriber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub title: String,
    pub added_at: String,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                viewer TEXT NOT NULL,
                title TEXT NOT NULL,
                added_at TEXT NOT NULL,
                PRIMARY KEY (viewer, title)
            );
            "#,
        )?;
        Ok(())
    }

    /// Returns `false` when the viewer already follows `title`.
    pub fn subscribe(&self, viewer: &str, title: &str) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO subscriptions (viewer, title, added_at) VALUES (?1, ?2, ?3)",
            params![viewer, title, now],
        )?;
        Ok(inserted > 0)
    }

    pub fn unsubscribe(&self, viewer: &str, title: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM subscriptions WHERE viewer = ?1 AND title = ?2",
            params![viewer, title],
        )?;
        Ok(deleted > 0)
    }

    pub fn list_subscriptions(&self, viewer: &str) -> Result<Vec<SubscriptionEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, added_at FROM subscriptions WHERE viewer = ?1 ORDER BY title ASC",
        )?;
        let rows = stmt.query_map(params![viewer], |row| {
            Ok(SubscriptionEntry {
                title: row.get(0)?,
                added_at: row.get(1)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn subscriber(&self, viewer: &str) -> Result<Subscriber> {
        let titles = self
            .list_subscriptions(viewer)?
            .into_iter()
            .map(|entry| entry.title)
            .collect();
        Ok(Subscriber::new(viewer, titles))
    }
}
