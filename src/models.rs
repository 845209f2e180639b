// ABOUTME: Core persistence entities for the camps API
// ABOUTME: Defines Camp, Talk and TalkLevel as stored by the repository layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! Persistence entities for camps and talks. These are the shapes the
//! repository layer reads and writes; the wire projections (`CampModel`,
//! `TalkModel`) live with the route handlers and convert via `From`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A code camp event, keyed by its unique moniker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camp {
    /// Unique human-readable identifier, used as the external key and route parameter
    pub moniker: String,
    /// Display name of the camp
    pub name: String,
    /// Where the camp takes place
    pub location: String,
    /// Calendar date of the event
    pub event_date: NaiveDate,
    /// Talks scheduled at this camp; empty unless loaded with `include_talks`
    #[serde(default)]
    pub talks: Vec<Talk>,
}

/// A talk given at a camp
///
/// A talk is owned by exactly one camp and is deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Talk {
    /// Unique identifier
    pub id: Uuid,
    /// Talk title
    pub title: String,
    /// Abstract describing the talk
    pub abstract_text: String,
    /// Audience level
    pub level: TalkLevel,
}

/// Audience level for a talk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TalkLevel {
    /// Suitable for newcomers to the topic
    #[default]
    Introductory,
    /// Assumes working knowledge of the topic
    Intermediate,
    /// Deep dives for practitioners
    Advanced,
}

impl TalkLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Introductory => "introductory",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Introductory,
        }
    }
}
