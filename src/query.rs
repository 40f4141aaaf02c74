//! Read side of the registry, as consumed by the HTTP layer and the CLI.
//!
//! Every call takes a fresh look at the registry. Returned datasources are
//! shared snapshots: a reload after the call does not change them.

use std::sync::Arc;

use serde::Serialize;

use crate::datasource::{Datasource, Record, Registry, find_by_id};

/// One row of the datasource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasourceSummary {
    /// Public name the datasource is served under.
    pub endpoint: String,
    /// File the datasource was loaded from.
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct Datasources {
    registry: Arc<Registry>,
}

impl Datasources {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Every current datasource, ordered by source path.
    pub fn list_datasources(&self) -> Vec<DatasourceSummary> {
        self.registry
            .snapshot()
            .iter()
            .map(|ds| DatasourceSummary {
                endpoint: ds.public_name().to_string(),
                source: ds.identity().display().to_string(),
            })
            .collect()
    }

    /// The whole datasource served under `public_name`.
    pub fn get_all(&self, public_name: &str) -> Option<Arc<Datasource>> {
        self.registry.find_by_public_name(public_name)
    }

    /// The first record with the given id in the datasource served under `public_name`.
    pub fn get_by_id(&self, public_name: &str, id: &str) -> Option<Record> {
        let datasource = self.registry.find_by_public_name(public_name)?;
        find_by_id(&datasource, id).map(|record| record.into_owned())
    }
}
