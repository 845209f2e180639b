// ABOUTME: Route handlers for the Camps REST API
// ABOUTME: Provides list, get, search-by-date, create and delete operations over camps
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Camps routes
//!
//! The camps resource handler. Create enforces the one real invariant of the
//! API: a moniker must be unique across all camps, checked by lookup before
//! the new camp is staged. Successful creates answer 201 with a `Location`
//! header resolved from the get-by-moniker route.

use crate::{
    database::ChangeSet,
    errors::{AppError, ErrorCode},
    models::{Camp, Talk, TalkLevel},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use http::{header, StatusCode, Uri};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Deserialize query parameters, mapping rejections into the standard JSON
/// error envelope instead of axum's plain-text response
pub(crate) fn parse_query<T: DeserializeOwned>(uri: &Uri) -> Result<T, AppError> {
    Query::<T>::try_from_uri(uri)
        .map(|Query(query)| query)
        .map_err(|e| AppError::invalid_input(format!("Invalid query parameters: {e}")))
}

/// Wire projection of a camp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampModel {
    /// Unique human-readable identifier
    pub moniker: String,
    /// Display name of the camp
    pub name: String,
    /// Where the camp takes place
    #[serde(default)]
    pub location: String,
    /// Calendar date of the event
    pub event_date: NaiveDate,
    /// Talks scheduled at this camp
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub talks: Vec<TalkModel>,
}

/// Wire projection of a talk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkModel {
    /// Unique identifier; assigned by the server on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Talk title
    pub title: String,
    /// Abstract describing the talk
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    /// Audience level
    #[serde(default)]
    pub level: TalkLevel,
}

impl From<Camp> for CampModel {
    fn from(camp: Camp) -> Self {
        Self {
            moniker: camp.moniker,
            name: camp.name,
            location: camp.location,
            event_date: camp.event_date,
            talks: camp.talks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CampModel> for Camp {
    fn from(model: CampModel) -> Self {
        Self {
            moniker: model.moniker.trim().to_owned(),
            name: model.name,
            location: model.location,
            event_date: model.event_date,
            talks: model.talks.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Talk> for TalkModel {
    fn from(talk: Talk) -> Self {
        Self {
            id: Some(talk.id),
            title: talk.title,
            abstract_text: talk.abstract_text,
            level: talk.level,
        }
    }
}

impl From<TalkModel> for Talk {
    fn from(model: TalkModel) -> Self {
        Self {
            id: model.id.unwrap_or_else(Uuid::new_v4),
            title: model.title,
            abstract_text: model.abstract_text,
            level: model.level,
        }
    }
}

/// Query parameters for listing camps
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListCampsQuery {
    /// Load the talks sub-collection for each camp
    #[serde(default)]
    pub include_talks: bool,
}

/// Query parameters for searching camps by event date
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCampsQuery {
    /// Event date to match (required)
    pub the_date: NaiveDate,
    /// Load the talks sub-collection for each camp
    #[serde(default)]
    pub include_talks: bool,
}

/// Camps routes handler
pub struct CampsRoutes;

impl CampsRoutes {
    /// Create all camps routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/camps", get(Self::handle_list))
            .route("/api/camps", post(Self::handle_create))
            .route("/api/camps/search", get(Self::handle_search))
            .route("/api/camps/:moniker", get(Self::handle_get))
            .route("/api/camps/:moniker", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /api/camps - List all camps
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let query: ListCampsQuery = parse_query(&uri)?;
        let camps = resources
            .repository
            .get_all_camps(query.include_talks)
            .await?;

        let models: Vec<CampModel> = camps.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(models)).into_response())
    }

    /// Handle GET /api/camps/:moniker - Get a single camp
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(moniker): Path<String>,
    ) -> Result<Response, AppError> {
        let camp = resources
            .repository
            .get_camp(&moniker)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Camp {moniker}")))?;

        let model: CampModel = camp.into();
        Ok((StatusCode::OK, Json(model)).into_response())
    }

    /// Handle GET /api/camps/search - Search camps by event date
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        uri: Uri,
    ) -> Result<Response, AppError> {
        let query: SearchCampsQuery = parse_query(&uri)?;
        let camps = resources
            .repository
            .get_camps_by_event_date(query.the_date, query.include_talks)
            .await?;

        if camps.is_empty() {
            return Err(AppError::new(
                ErrorCode::ResourceNotFound,
                format!("No camps found on {}", query.the_date),
            ));
        }

        let models: Vec<CampModel> = camps.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(models)).into_response())
    }

    /// Handle POST /api/camps - Create a new camp
    ///
    /// Steps, in order: reject a moniker already in use, resolve the Location
    /// path for the new resource, stage the entity, commit. Every outcome is
    /// an explicit branch.
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(model): Json<CampModel>,
    ) -> Result<Response, AppError> {
        let moniker = model.moniker.trim().to_owned();
        if moniker.is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "Moniker is required",
            ));
        }

        if resources.repository.get_camp(&moniker).await?.is_some() {
            return Err(AppError::moniker_in_use(moniker));
        }

        let location = resources
            .links
            .camp_path(&moniker)
            .ok_or_else(|| AppError::unresolvable_location(&moniker))?;

        let camp: Camp = model.into();
        let mut changes = ChangeSet::new();
        changes.add_camp(camp.clone());

        if resources.repository.save_changes(changes).await? {
            tracing::info!(moniker = %camp.moniker, "camp created");
            let created: CampModel = camp.into();
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(created),
            )
                .into_response())
        } else {
            Err(AppError::commit_failure("Camp was not persisted"))
        }
    }

    /// Handle DELETE /api/camps/:moniker - Delete a camp and its talks
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(moniker): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.repository.get_camp(&moniker).await?.is_none() {
            return Err(AppError::not_found(format!("Camp {moniker}")));
        }

        let mut changes = ChangeSet::new();
        changes.delete_camp(&moniker);

        if resources.repository.save_changes(changes).await? {
            tracing::info!(moniker = %moniker, "camp deleted");
            Ok(StatusCode::OK.into_response())
        } else {
            Err(AppError::commit_failure("Failed to delete camp"))
        }
    }
}
