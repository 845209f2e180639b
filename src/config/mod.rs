// ABOUTME: Configuration module for the camps API
// ABOUTME: Environment-based server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server configuration

/// Environment-based configuration management
pub mod environment;

pub use environment::ServerConfig;
