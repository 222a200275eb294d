//! Project records and the tripled display list that backs the carousel.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// One gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub url: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
}

const FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1511795409834-ef04bbd61622?q=80&w=2069&auto=format&fit=crop";

/// Built-in projects shown when the CRM cannot deliver any. Never empty.
pub fn fallback_projects() -> Vec<Project> {
    vec![Project {
        id: 1,
        url: FALLBACK_IMAGE.to_string(),
        title: "Golden Gala Night".to_string(),
        category: "Gala".to_string(),
        location: Some("Palais Ferstel, Wien".to_string()),
        date: Some("14. Oktober 2023".to_string()),
        description: Some(
            "Ein Abend voller Glanz und Glamour. Für dieses exklusive Gala-Dinner verwandelten \
             wir den historischen Ballsaal in ein goldenes Lichtermeer."
                .to_string(),
        ),
        highlights: vec![
            "5-Gänge Sterne-Menü".to_string(),
            "Live Jazz-Bigband".to_string(),
            "Maßgeschneidertes Lichtdesign".to_string(),
        ],
        additional_images: vec![FALLBACK_IMAGE.to_string()],
    }]
}

/// Number of back-to-back copies of the canonical list in a [`DisplayList`].
pub const COPIES: usize = 3;

/// The canonical project list concatenated three times.
///
/// The middle copy is where the autoscroll keeps the viewport; the outer copies
/// exist so the wraparound jump is invisible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayList {
    items: Vec<Project>,
    canonical_len: usize,
}

impl DisplayList {
    /// Triples `canonical`. An empty input is replaced by [`fallback_projects`].
    pub fn tripled(canonical: Vec<Project>) -> Self {
        let canonical = if canonical.is_empty() {
            fallback_projects()
        } else {
            canonical
        };
        let canonical_len = canonical.len();
        let mut items = Vec::with_capacity(canonical_len * COPIES);
        for _ in 0..COPIES {
            items.extend(canonical.iter().cloned());
        }
        Self {
            items,
            canonical_len,
        }
    }

    pub fn fallback() -> Self {
        Self::tripled(fallback_projects())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Length of one copy.
    pub fn canonical_len(&self) -> usize {
        self.canonical_len
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.items.get(index)
    }

    /// Maps a display index to its position in the canonical list.
    pub fn canonical_index(&self, index: usize) -> Option<usize> {
        (index < self.items.len()).then(|| index % self.canonical_len)
    }

    /// Index of the last entry.
    pub fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.items.iter()
    }
}

impl Index<usize> for DisplayList {
    type Output = Project;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}
