// ABOUTME: Repository abstraction for the camps API persistence layer
// ABOUTME: Defines the CampRepository trait and the request-scoped ChangeSet of staged mutations
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository abstraction over the backing store
//!
//! All route handlers talk to the store through [`CampRepository`]. Reads
//! execute immediately; mutations are staged into a [`ChangeSet`] the handler
//! owns and are only applied when `save_changes` commits the batch in a
//! single transaction. Each request builds its own change set, so concurrent
//! requests cannot observe or commit each other's staged work.

use crate::errors::AppResult;
use crate::models::{Camp, Talk};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub mod sqlite;

pub use sqlite::SqliteCampRepository;

/// A mutation staged for commit
#[derive(Debug, Clone)]
pub(crate) enum StagedChange {
    AddCamp(Camp),
    DeleteCamp(String),
    AddTalk { moniker: String, talk: Talk },
    DeleteTalk { moniker: String, talk_id: Uuid },
}

/// A batch of staged mutations scoped to one request
///
/// Nothing touches the store until the batch is handed to
/// [`CampRepository::save_changes`].
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<StagedChange>,
}

impl ChangeSet {
    /// Create an empty change set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a camp (and its talks) for insertion
    pub fn add_camp(&mut self, camp: Camp) {
        self.changes.push(StagedChange::AddCamp(camp));
    }

    /// Stage a camp (and its talks, via cascade) for deletion
    pub fn delete_camp(&mut self, moniker: &str) {
        self.changes
            .push(StagedChange::DeleteCamp(moniker.to_owned()));
    }

    /// Stage a talk for insertion under a camp
    pub fn add_talk(&mut self, moniker: &str, talk: Talk) {
        self.changes.push(StagedChange::AddTalk {
            moniker: moniker.to_owned(),
            talk,
        });
    }

    /// Stage a talk for deletion
    pub fn delete_talk(&mut self, moniker: &str, talk_id: Uuid) {
        self.changes.push(StagedChange::DeleteTalk {
            moniker: moniker.to_owned(),
            talk_id,
        });
    }

    /// Whether any mutations are staged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub(crate) fn into_changes(self) -> Vec<StagedChange> {
        self.changes
    }
}

/// Core repository trait for camps and their talks
#[async_trait]
pub trait CampRepository: Send + Sync {
    /// Check that the backing store is reachable
    async fn ping(&self) -> AppResult<()>;

    // ================================
    // Camp queries
    // ================================

    /// Get all camps, ordered by moniker
    async fn get_all_camps(&self, include_talks: bool) -> AppResult<Vec<Camp>>;

    /// Get a single camp by its moniker, with its talks loaded
    async fn get_camp(&self, moniker: &str) -> AppResult<Option<Camp>>;

    /// Get all camps whose event date matches, ordered by moniker
    async fn get_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> AppResult<Vec<Camp>>;

    // ================================
    // Talk queries
    // ================================

    /// Get all talks for a camp, ordered by title
    async fn get_talks(&self, moniker: &str) -> AppResult<Vec<Talk>>;

    /// Get a single talk by camp moniker and talk id
    async fn get_talk(&self, moniker: &str, talk_id: Uuid) -> AppResult<Option<Talk>>;

    // ================================
    // Commit
    // ================================

    /// Commit a change set in one transaction
    ///
    /// Returns `Ok(true)` when staged work was applied, `Ok(false)` when the
    /// change set was empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    async fn save_changes(&self, changes: ChangeSet) -> AppResult<bool>;
}
