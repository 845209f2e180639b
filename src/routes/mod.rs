// ABOUTME: Route module declarations for the camps API
// ABOUTME: Camps, talks and health route handlers live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP route handlers

/// Camps resource routes and transfer models
pub mod camps;

/// Health check route
pub mod health;

/// Talks routes nested under camps
pub mod talks;

pub use camps::CampsRoutes;
pub use health::HealthRoutes;
pub use talks::TalksRoutes;
