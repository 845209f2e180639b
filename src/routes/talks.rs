// ABOUTME: Route handlers for talks nested under their owning camp
// ABOUTME: Mirrors the camps resource handler scoped to a camp's talks collection
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Talks routes
//!
//! Talks live under their owning camp: `/api/camps/:moniker/talks`. The
//! handlers mirror the camps handler shape; every operation first resolves
//! the owning camp and answers 404 when it is absent.

use crate::{
    database::ChangeSet,
    errors::{AppError, ErrorCode},
    models::Talk,
    routes::camps::TalkModel,
    server::ServerResources,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use http::{header, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

/// Talks routes handler
pub struct TalksRoutes;

impl TalksRoutes {
    /// Create all talks routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/camps/:moniker/talks", get(Self::handle_list))
            .route("/api/camps/:moniker/talks", post(Self::handle_create))
            .route("/api/camps/:moniker/talks/:id", get(Self::handle_get))
            .route("/api/camps/:moniker/talks/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Answer 404 unless the owning camp exists
    async fn require_camp(resources: &Arc<ServerResources>, moniker: &str) -> Result<(), AppError> {
        if resources.repository.get_camp(moniker).await?.is_none() {
            return Err(AppError::not_found(format!("Camp {moniker}")));
        }
        Ok(())
    }

    /// Handle GET /api/camps/:moniker/talks - List a camp's talks
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(moniker): Path<String>,
    ) -> Result<Response, AppError> {
        Self::require_camp(&resources, &moniker).await?;

        let talks = resources.repository.get_talks(&moniker).await?;
        let models: Vec<TalkModel> = talks.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(models)).into_response())
    }

    /// Handle GET /api/camps/:moniker/talks/:id - Get a single talk
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path((moniker, talk_id)): Path<(String, Uuid)>,
    ) -> Result<Response, AppError> {
        let talk = resources
            .repository
            .get_talk(&moniker, talk_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Talk {talk_id}")))?;

        let model: TalkModel = talk.into();
        Ok((StatusCode::OK, Json(model)).into_response())
    }

    /// Handle POST /api/camps/:moniker/talks - Add a talk to a camp
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Path(moniker): Path<String>,
        Json(model): Json<TalkModel>,
    ) -> Result<Response, AppError> {
        if model.title.trim().is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "Title is required",
            ));
        }

        Self::require_camp(&resources, &moniker).await?;

        let talk: Talk = model.into();
        let location = resources
            .links
            .talk_path(&moniker, talk.id)
            .ok_or_else(|| AppError::unresolvable_location(&moniker))?;

        let mut changes = ChangeSet::new();
        changes.add_talk(&moniker, talk.clone());

        if resources.repository.save_changes(changes).await? {
            tracing::info!(moniker = %moniker, talk_id = %talk.id, "talk created");
            let created: TalkModel = talk.into();
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(created),
            )
                .into_response())
        } else {
            Err(AppError::commit_failure("Talk was not persisted"))
        }
    }

    /// Handle DELETE /api/camps/:moniker/talks/:id - Remove a talk
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path((moniker, talk_id)): Path<(String, Uuid)>,
    ) -> Result<Response, AppError> {
        if resources
            .repository
            .get_talk(&moniker, talk_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(format!("Talk {talk_id}")));
        }

        let mut changes = ChangeSet::new();
        changes.delete_talk(&moniker, talk_id);

        if resources.repository.save_changes(changes).await? {
            tracing::info!(moniker = %moniker, talk_id = %talk_id, "talk deleted");
            Ok(StatusCode::OK.into_response())
        } else {
            Err(AppError::commit_failure("Failed to delete talk"))
        }
    }
}
