use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::crm::ProjectSource;
use crate::error::Error;
use crate::projects::{DisplayList, fallback_projects};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOrigin {
    Crm,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedProjects {
    pub display: DisplayList,
    pub origin: ProjectOrigin,
}

impl LoadedProjects {
    pub fn fallback() -> Self {
        Self {
            display: DisplayList::tripled(fallback_projects()),
            origin: ProjectOrigin::Fallback,
        }
    }
}

/// Loads the canonical projects and triples them for display.
///
/// Any failure, a timeout, or an empty result degrades to the built-in
/// fallback set; this never returns an empty list.
pub async fn load<S: ProjectSource>(source: &S, limit: Duration) -> LoadedProjects {
    let result = match timeout(limit, source.load_projects()).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(limit)),
    };
    match result {
        Ok(projects) if projects.is_empty() => {
            warn!("CRM returned no projects; using fallback set");
            LoadedProjects::fallback()
        }
        Ok(projects) => {
            info!(count = projects.len(), "loaded projects from CRM");
            LoadedProjects {
                display: DisplayList::tripled(projects),
                origin: ProjectOrigin::Crm,
            }
        }
        Err(err) => {
            warn!(error = %err, "project load failed; using fallback set");
            LoadedProjects::fallback()
        }
    }
}
