// ABOUTME: Canonical URL path generation for created resources
// ABOUTME: Resolves the Location header value for camps and talks from their route parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Location resolution for created resources
//!
//! The create handlers need a canonical path for the `Location` header,
//! pointing at the get-by-moniker route of the new resource. Resolution can
//! fail: a moniker that cannot form a path segment yields `None`, which the
//! handler surfaces as a 400.

use uuid::Uuid;

/// Route prefix for the camps resource
pub const CAMPS_PREFIX: &str = "/api/camps";

/// Generates canonical resource paths for the API's routes
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkGenerator;

impl LinkGenerator {
    /// Create a new link generator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve the canonical path for a camp's get-by-moniker route
    ///
    /// Returns `None` when the moniker is empty or whitespace-only and thus
    /// cannot form a route parameter.
    #[must_use]
    pub fn camp_path(&self, moniker: &str) -> Option<String> {
        let moniker = moniker.trim();
        if moniker.is_empty() {
            return None;
        }
        Some(format!("{CAMPS_PREFIX}/{}", urlencoding::encode(moniker)))
    }

    /// Resolve the canonical path for a talk under its owning camp
    #[must_use]
    pub fn talk_path(&self, moniker: &str, talk_id: Uuid) -> Option<String> {
        self.camp_path(moniker)
            .map(|camp| format!("{camp}/talks/{talk_id}"))
    }
}
