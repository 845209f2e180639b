// ABOUTME: HTTP middleware for the camps API
// ABOUTME: Currently CORS configuration; tracing is layered directly in the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP middleware

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;
