// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub(crate) const DEFAULT_QUERY: &str = "nature";
pub(crate) const DEFAULT_PER_PAGE: u32 = 10;
pub(crate) const MAX_PER_PAGE: u32 = 80;

pub(crate) type PhotoId = u64;

/// Image URLs for each size the search API renders.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Sources {
    pub(crate) original: String,
    pub(crate) large2x: String,
    pub(crate) large: String,
    pub(crate) medium: String,
    pub(crate) small: String,
    pub(crate) portrait: String,
    pub(crate) landscape: String,
    pub(crate) tiny: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Photo {
    pub(crate) id: PhotoId,
    #[serde(default)]
    pub(crate) width: u32,
    #[serde(default)]
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) url: String,
    pub(crate) photographer: String,
    pub(crate) photographer_url: String,
    #[serde(default)]
    pub(crate) photographer_id: Option<u64>,
    #[serde(default)]
    pub(crate) avg_color: Option<String>,
    #[serde(default)]
    pub(crate) alt: Option<String>,
    #[serde(default)]
    pub(crate) liked: bool,
    pub(crate) src: Sources,
}

impl Photo {
    pub(crate) fn photographer_name(&self) -> &str {
        if self.photographer.is_empty() {
            "Unknown Photographer"
        } else {
            &self.photographer
        }
    }

    pub(crate) fn title(&self) -> &str {
        match self.alt.as_deref() {
            Some(alt) if !alt.is_empty() => alt,
            _ => "Untitled",
        }
    }
}

/// One page of search results. The pagination links are carried along but
/// nothing follows them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchResponse {
    pub(crate) photos: Vec<Photo>,
    #[serde(default)]
    pub(crate) page: u32,
    #[serde(default)]
    pub(crate) per_page: u32,
    #[serde(default)]
    pub(crate) total_results: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) next_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) prev_page: Option<String>,
}

/// Something that can run a photo search.
#[async_trait]
pub(crate) trait Search: Send + Sync {
    async fn search_photos(&self, query: &str, per_page: u32) -> Result<SearchResponse>;
}
