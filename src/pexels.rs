// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::debug;
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{self, Result},
    metadata,
    photos::{Search, SearchResponse},
};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.pexels.com/v1/";

const SEARCH_ENDPOINT: &str = "search";

/// Pexels API client. The API key goes out verbatim in the `Authorization`
/// header of every request.
pub(crate) struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub(crate) fn new(base_url: Url, api_key: &SecretString) -> Result<Self> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(error::Api::MissingKey.into());
        }

        let mut authorization = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| error::Api::InvalidKey)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(header::AUTHORIZATION, authorization);
        let _ = headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .default_headers(headers)
            .build()
            .map_err(error::Error::Http)?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn search_url(&self, query: &str, per_page: u32) -> Result<Url> {
        let mut url = self.base_url.join(SEARCH_ENDPOINT)?;
        let _ = url
            .query_pairs_mut()
            .append_pair("query", query)
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error::Api::RequestFailed(status.as_u16()).into());
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Search for Client {
    async fn search_photos(&self, query: &str, per_page: u32) -> Result<SearchResponse> {
        self.request(self.search_url(query, per_page)?).await
    }
}

// `Url::join` drops the last path segment unless it ends in a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
