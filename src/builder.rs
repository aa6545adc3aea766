//! Index builder for flexible configuration
//!
//! This module turns a raw organization list into a [`ClusterIndex`]:
//! records without an identifier are dropped, coordinates are validated
//! according to the configured policy, duplicates are removed, and the
//! survivors are put in a canonical order before clustering.

use crate::compute::validation::validate_organization;
use crate::config::{ClusterConfig, InvalidCoordinatePolicy};
use crate::error::{FieldmapError, Result};
use crate::index::ClusterIndex;
use fieldmap_types::organization::Organization;
use rustc_hash::FxHashSet;

/// Outcome of one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Records placed in the index
    pub accepted: usize,
    /// Records skipped for unusable coordinates, including latitudes past ±85°
    /// that no viewport can reach
    pub excluded_invalid: usize,
    /// Records with neither a maps link nor usable coordinates
    pub excluded_unidentified: usize,
    /// Later records sharing an identifier with an earlier one
    pub duplicates: usize,
}

impl BuildReport {
    pub fn excluded(&self) -> usize {
        self.excluded_invalid + self.excluded_unidentified + self.duplicates
    }
}

/// Builder for cluster indexes with a custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndexBuilder {
    config: ClusterConfig,
}

impl ClusterIndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clustering configuration (radius, zoom range, minimum points, ...).
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for switching the invalid-coordinate policy.
    pub fn invalid_coordinates(mut self, policy: InvalidCoordinatePolicy) -> Self {
        self.config.invalid_coordinates = policy;
        self
    }

    /// Build the index. Input order does not affect the result.
    pub fn build(&self, organizations: &[Organization]) -> Result<ClusterIndex> {
        self.config.validate().map_err(FieldmapError::InvalidConfig)?;

        let mut report = BuildReport::default();
        let mut seen = FxHashSet::default();
        let mut accepted: Vec<(String, Organization)> = Vec::with_capacity(organizations.len());

        for org in organizations {
            let Some(identifier) = org.identifier() else {
                log::warn!(
                    "Skipping organization '{}': no maps link and no usable coordinates",
                    org.name
                );
                report.excluded_unidentified += 1;
                continue;
            };

            if let Err(e) = validate_organization(org) {
                match self.config.invalid_coordinates {
                    InvalidCoordinatePolicy::Reject => return Err(e),
                    InvalidCoordinatePolicy::Exclude => {
                        log::warn!("Skipping organization: {}", e);
                        report.excluded_invalid += 1;
                        continue;
                    }
                }
            }

            let identifier = identifier.into_owned();
            if !seen.insert(identifier.clone()) {
                log::debug!("Skipping duplicate organization {}", identifier);
                report.duplicates += 1;
                continue;
            }

            accepted.push((identifier, org.clone()));
        }

        accepted.sort_by(|a, b| a.0.cmp(&b.0));
        report.accepted = accepted.len();

        log::debug!(
            "Building cluster index: {} accepted, {} excluded",
            report.accepted,
            report.excluded()
        );

        let organizations = accepted.into_iter().map(|(_, org)| org).collect();
        Ok(ClusterIndex::from_parts(self.config.clone(), organizations, report))
    }
}
