// ABOUTME: Library root for the camps REST API
// ABOUTME: Exposes configuration, repository, routes and server assembly modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Camps REST API
//!
//! A minimal REST API exposing camps and talks via CRUD endpoints, backed by
//! a repository abstraction over SQLite. Route handlers orchestrate three
//! collaborators per request: the repository, the model conversions at the
//! wire boundary, and the location resolver for created resources.

/// Server configuration from environment variables
pub mod config;

/// Repository abstraction and SQLite implementation
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Location resolution for created resources
pub mod links;

/// Logging configuration and structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Core data models
pub mod models;

/// HTTP route handlers
pub mod routes;

/// Server resources and serve loop
pub mod server;
