//! ERPNext project source.
//!
//! Only the slice of the CRM the gallery consumes lives here: listing projects,
//! fetching one project, and resolving image paths to absolute URLs.

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrmConfig;
use crate::error::{Error, Result};
use crate::projects::Project;

const DEFAULT_TITLE: &str = "MM Projekt";
const DEFAULT_CATEGORY: &str = "Event";
const DEFAULT_LOCATION: &str = "Exklusiv-Location";
const DEFAULT_DATE: &str = "In Planung";
const DEFAULT_DESCRIPTION: &str = "Ein maßgeschneidertes Event-Konzept von MM EVENT.";
const DEFAULT_HIGHLIGHTS: &[&str] = &["Premium Service", "Individuelle Planung"];

/// Anything that can produce the canonical project list.
pub trait ProjectSource {
    fn load_projects(&self) -> impl Future<Output = Result<Vec<Project>>> + Send;
}

/// A project as ERPNext returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub expected_end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope<T> {
    #[serde(default)]
    data: Option<T>,
}

/// Formats an ISO date the way German locales print it (`14.10.2023`, `5.1.2024`).
fn format_german_date(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()?;
    Some(date.format("%-d.%-m.%Y").to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl ProjectRecord {
    /// Maps the record at response position `idx` into a gallery [`Project`].
    ///
    /// `image_url` is the already-resolved absolute image URL, if any.
    pub fn into_project(self, idx: usize, image_url: Option<String>) -> Project {
        let url =
            image_url.unwrap_or_else(|| format!("https://picsum.photos/1600/900?random={}", idx + 50));
        let date = non_empty(self.expected_end_date.as_deref())
            .and_then(format_german_date)
            .unwrap_or_else(|| DEFAULT_DATE.to_string());
        Project {
            id: u32::try_from(idx + 1).unwrap_or(u32::MAX),
            url,
            title: non_empty(self.project_name.as_deref())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            category: non_empty(self.status.as_deref())
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            location: Some(DEFAULT_LOCATION.to_string()),
            date: Some(date),
            description: Some(
                non_empty(self.notes.as_deref())
                    .unwrap_or(DEFAULT_DESCRIPTION)
                    .to_string(),
            ),
            highlights: DEFAULT_HIGHLIGHTS.iter().map(|h| h.to_string()).collect(),
            additional_images: Vec::new(),
        }
    }
}

/// Thin REST client for the ERPNext resource API.
#[derive(Debug, Clone)]
pub struct ErpNextClient {
    base_url: Url,
    http: reqwest::Client,
    fields: Vec<String>,
    fetch_images: bool,
}

impl ErpNextClient {
    pub fn new(cfg: &CrmConfig) -> Result<Self> {
        let base_url = Url::parse(&cfg.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self {
            base_url,
            http,
            fields: cfg.fields.clone(),
            fetch_images: cfg.fetch_images,
        })
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base(), endpoint);
        debug!(%url, "crm request");
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                text
            };
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Lists projects with the configured fields.
    pub async fn get_projects(&self) -> Result<Vec<ProjectRecord>> {
        let fields = serde_json::to_string(&self.fields)?;
        let mut endpoint = Url::parse("http://placeholder/api/resource/Project")?;
        endpoint.query_pairs_mut().append_pair("fields", &fields);
        let query = endpoint.query().unwrap_or_default();
        let envelope: ListEnvelope<ProjectRecord> = self
            .request(&format!("/api/resource/Project?{query}"))
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetches a single project with all of its fields, including `image`.
    pub async fn get_project(&self, name: &str) -> Result<Option<ProjectRecord>> {
        let mut endpoint = Url::parse("http://placeholder/api/resource/Project/")?;
        endpoint
            .path_segments_mut()
            .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(name);
        let envelope: SingleEnvelope<ProjectRecord> = self.request(endpoint.path()).await?;
        Ok(envelope.data)
    }

    /// Resolves image URLs for several projects concurrently.
    ///
    /// A failed lookup yields `None` for that project and never aborts the batch.
    pub async fn project_images(&self, names: &[String]) -> HashMap<String, Option<String>> {
        let lookups = names.iter().map(|name| async move {
            match self.get_project(name).await {
                Ok(project) => {
                    let url = project.and_then(|p| self.image_url(p.image.as_deref()));
                    (name.clone(), url)
                }
                Err(err) => {
                    warn!(project = %name, error = %err, "could not fetch project image");
                    (name.clone(), None)
                }
            }
        });
        join_all(lookups).await.into_iter().collect()
    }

    /// Turns an ERPNext file path into an absolute URL.
    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        let path = non_empty(path)?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        Some(format!("{}{}", self.base(), path))
    }
}

impl ProjectSource for ErpNextClient {
    fn load_projects(&self) -> impl Future<Output = Result<Vec<Project>>> + Send {
        async move {
            let records = self.get_projects().await?;
            let images = if self.fetch_images {
                let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
                self.project_images(&names).await
            } else {
                HashMap::new()
            };
            let projects = records
                .into_iter()
                .enumerate()
                .map(|(idx, record)| {
                    let image = match images.get(&record.name) {
                        Some(resolved) => resolved.clone(),
                        None => self.image_url(record.image.as_deref()),
                    };
                    record.into_project(idx, image)
                })
                .collect();
            Ok(projects)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ErpNextClient {
        let cfg = CrmConfig {
            base_url: base.to_string(),
            ..CrmConfig::default()
        };
        ErpNextClient::new(&cfg).unwrap()
    }

    #[test]
    fn maps_record_with_all_fields() {
        let record = ProjectRecord {
            name: "PROJ-0001".into(),
            project_name: Some("Sommerfest".into()),
            expected_end_date: Some("2024-07-05".into()),
            status: Some("Completed".into()),
            notes: Some("Open air".into()),
            image: None,
        };
        let p = record.into_project(0, Some("https://cdn.example/a.jpg".into()));
        assert_eq!(p.id, 1);
        assert_eq!(p.url, "https://cdn.example/a.jpg");
        assert_eq!(p.title, "Sommerfest");
        assert_eq!(p.category, "Completed");
        assert_eq!(p.date.as_deref(), Some("5.7.2024"));
        assert_eq!(p.description.as_deref(), Some("Open air"));
        assert_eq!(p.highlights.len(), 2);
    }

    #[test]
    fn fills_defaults_for_sparse_record() {
        let record = ProjectRecord {
            name: "PROJ-0002".into(),
            ..ProjectRecord::default()
        };
        let p = record.into_project(3, None);
        assert_eq!(p.id, 4);
        assert_eq!(p.url, "https://picsum.photos/1600/900?random=53");
        assert_eq!(p.title, DEFAULT_TITLE);
        assert_eq!(p.category, DEFAULT_CATEGORY);
        assert_eq!(p.location.as_deref(), Some(DEFAULT_LOCATION));
        assert_eq!(p.date.as_deref(), Some(DEFAULT_DATE));
        assert_eq!(p.description.as_deref(), Some(DEFAULT_DESCRIPTION));
    }

    #[test]
    fn unparsable_date_reads_as_planned() {
        let record = ProjectRecord {
            name: "x".into(),
            expected_end_date: Some("soon".into()),
            ..ProjectRecord::default()
        };
        assert_eq!(record.into_project(0, None).date.as_deref(), Some(DEFAULT_DATE));
    }

    #[test]
    fn german_date_accepts_datetime_suffix() {
        assert_eq!(
            format_german_date("2023-10-14 00:00:00").as_deref(),
            Some("14.10.2023")
        );
    }

    #[test]
    fn image_url_resolution() {
        let c = client("https://erp.example.com/");
        assert_eq!(c.image_url(None), None);
        assert_eq!(c.image_url(Some("  ")), None);
        assert_eq!(
            c.image_url(Some("https://cdn.example/x.png")).as_deref(),
            Some("https://cdn.example/x.png")
        );
        assert_eq!(
            c.image_url(Some("http://cdn.example/x.png")).as_deref(),
            Some("http://cdn.example/x.png")
        );
        assert_eq!(
            c.image_url(Some("/files/gala.jpg")).as_deref(),
            Some("https://erp.example.com/files/gala.jpg")
        );
    }

    #[test]
    fn api_error_message_includes_status() {
        let err = Error::Api {
            status: 403,
            body: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "CRM API error (403): Forbidden");
    }
}
