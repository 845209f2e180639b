// ABOUTME: SQLite implementation of the camp repository over a sqlx connection pool
// ABOUTME: Handles schema migration, camp/talk queries and transactional commit of change sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite repository implementation
//!
//! `save_changes` applies a request-scoped [`ChangeSet`] inside a single
//! transaction. Foreign keys are enabled so deleting a camp cascades to its
//! talks.

use super::{CampRepository, ChangeSet, StagedChange};
use crate::errors::{AppError, AppResult};
use crate::models::{Camp, Talk, TalkLevel};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// Date format used for the `event_date` column
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed camp repository
#[derive(Clone)]
pub struct SqliteCampRepository {
    pool: SqlitePool,
}

impl SqliteCampRepository {
    /// Connect to the database at `database_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool
    /// cannot be established.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // In-memory databases exist per connection, so the pool is pinned to
        // one connection that is never reaped.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        Ok(Self { pool })
    }

    /// Run database migrations to set up the schema
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_camps().await?;
        self.migrate_talks().await?;
        Ok(())
    }

    async fn migrate_camps(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS camps (
                moniker TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                event_date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create camps table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_camps_event_date ON camps(event_date)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create camps index: {e}")))?;

        Ok(())
    }

    async fn migrate_talks(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS talks (
                id TEXT PRIMARY KEY,
                camp_moniker TEXT NOT NULL
                    REFERENCES camps(moniker) ON DELETE CASCADE,
                title TEXT NOT NULL,
                abstract_text TEXT NOT NULL,
                level TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create talks table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_talks_camp ON talks(camp_moniker)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create talks index: {e}")))?;

        Ok(())
    }

    /// Load talks for a set of camps in one query and attach them in place
    async fn attach_talks(&self, camps: &mut [Camp]) -> AppResult<()> {
        if camps.is_empty() {
            return Ok(());
        }

        let rows = sqlx::query(
            r"
            SELECT camp_moniker, id, title, abstract_text, level
            FROM talks
            ORDER BY title
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load talks: {e}")))?;

        let mut by_camp: HashMap<String, Vec<Talk>> = HashMap::new();
        for row in &rows {
            let moniker: String = row
                .try_get("camp_moniker")
                .map_err(|e| AppError::database(format!("Failed to read talk row: {e}")))?;
            by_camp.entry(moniker).or_default().push(row_to_talk(row)?);
        }

        for camp in camps {
            camp.talks = by_camp.remove(&camp.moniker).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl CampRepository for SqliteCampRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    async fn get_all_camps(&self, include_talks: bool) -> AppResult<Vec<Camp>> {
        let rows = sqlx::query(
            r"
            SELECT moniker, name, location, event_date
            FROM camps
            ORDER BY moniker
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list camps: {e}")))?;

        let mut camps = rows
            .iter()
            .map(row_to_camp)
            .collect::<AppResult<Vec<_>>>()?;

        if include_talks {
            self.attach_talks(&mut camps).await?;
        }
        Ok(camps)
    }

    async fn get_camp(&self, moniker: &str) -> AppResult<Option<Camp>> {
        let row = sqlx::query(
            r"
            SELECT moniker, name, location, event_date
            FROM camps
            WHERE moniker = $1
            ",
        )
        .bind(moniker)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get camp: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut camp = row_to_camp(&row)?;
        camp.talks = self.get_talks(moniker).await?;
        Ok(Some(camp))
    }

    async fn get_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> AppResult<Vec<Camp>> {
        let rows = sqlx::query(
            r"
            SELECT moniker, name, location, event_date
            FROM camps
            WHERE event_date = $1
            ORDER BY moniker
            ",
        )
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search camps by date: {e}")))?;

        let mut camps = rows
            .iter()
            .map(row_to_camp)
            .collect::<AppResult<Vec<_>>>()?;

        if include_talks {
            self.attach_talks(&mut camps).await?;
        }
        Ok(camps)
    }

    async fn get_talks(&self, moniker: &str) -> AppResult<Vec<Talk>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, abstract_text, level
            FROM talks
            WHERE camp_moniker = $1
            ORDER BY title
            ",
        )
        .bind(moniker)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list talks: {e}")))?;

        rows.iter().map(row_to_talk).collect()
    }

    async fn get_talk(&self, moniker: &str, talk_id: Uuid) -> AppResult<Option<Talk>> {
        let row = sqlx::query(
            r"
            SELECT id, title, abstract_text, level
            FROM talks
            WHERE camp_moniker = $1 AND id = $2
            ",
        )
        .bind(moniker)
        .bind(talk_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get talk: {e}")))?;

        row.as_ref().map(row_to_talk).transpose()
    }

    async fn save_changes(&self, changes: ChangeSet) -> AppResult<bool> {
        let changes = changes.into_changes();
        if changes.is_empty() {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        for change in changes {
            match change {
                StagedChange::AddCamp(camp) => {
                    sqlx::query(
                        r"
                        INSERT INTO camps (moniker, name, location, event_date)
                        VALUES ($1, $2, $3, $4)
                        ",
                    )
                    .bind(&camp.moniker)
                    .bind(&camp.name)
                    .bind(&camp.location)
                    .bind(camp.event_date.format(DATE_FORMAT).to_string())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to insert camp: {e}")))?;

                    for talk in &camp.talks {
                        insert_talk(&mut tx, &camp.moniker, talk).await?;
                    }
                }
                StagedChange::DeleteCamp(moniker) => {
                    sqlx::query("DELETE FROM camps WHERE moniker = $1")
                        .bind(&moniker)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::database(format!("Failed to delete camp: {e}"))
                        })?;
                }
                StagedChange::AddTalk { moniker, talk } => {
                    insert_talk(&mut tx, &moniker, &talk).await?;
                }
                StagedChange::DeleteTalk { moniker, talk_id } => {
                    sqlx::query("DELETE FROM talks WHERE camp_moniker = $1 AND id = $2")
                        .bind(&moniker)
                        .bind(talk_id.to_string())
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            AppError::database(format!("Failed to delete talk: {e}"))
                        })?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit changes: {e}")))?;

        Ok(true)
    }
}

async fn insert_talk(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    moniker: &str,
    talk: &Talk,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO talks (id, camp_moniker, title, abstract_text, level)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(talk.id.to_string())
    .bind(moniker)
    .bind(&talk.title)
    .bind(&talk.abstract_text)
    .bind(talk.level.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert talk: {e}")))?;
    Ok(())
}

fn row_to_camp(row: &SqliteRow) -> AppResult<Camp> {
    let event_date: String = row
        .try_get("event_date")
        .map_err(|e| AppError::database(format!("Failed to read camp row: {e}")))?;
    let event_date = NaiveDate::parse_from_str(&event_date, DATE_FORMAT)
        .map_err(|e| AppError::database(format!("Invalid event date in store: {e}")))?;

    Ok(Camp {
        moniker: row
            .try_get("moniker")
            .map_err(|e| AppError::database(format!("Failed to read camp row: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to read camp row: {e}")))?,
        location: row
            .try_get("location")
            .map_err(|e| AppError::database(format!("Failed to read camp row: {e}")))?,
        event_date,
        talks: Vec::new(),
    })
}

fn row_to_talk(row: &SqliteRow) -> AppResult<Talk> {
    let id: String = row
        .try_get("id")
        .map_err(|e| AppError::database(format!("Failed to read talk row: {e}")))?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| AppError::database(format!("Invalid talk id in store: {e}")))?;
    let level: String = row
        .try_get("level")
        .map_err(|e| AppError::database(format!("Failed to read talk row: {e}")))?;

    Ok(Talk {
        id,
        title: row
            .try_get("title")
            .map_err(|e| AppError::database(format!("Failed to read talk row: {e}")))?,
        abstract_text: row
            .try_get("abstract_text")
            .map_err(|e| AppError::database(format!("Failed to read talk row: {e}")))?,
        level: TalkLevel::parse(&level),
    })
}
