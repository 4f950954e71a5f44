// SPDX-FileCopyrightText: 2022 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    error::{self, Result},
    gallery::{Activation, Entry, Gallery, Options, Page},
    metadata,
    navigation::Route,
    photos::{self, PhotoId},
};

/// Show a page of photos from the search API.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The text to search for.
    #[arg(long, short, default_value = photos::DEFAULT_QUERY)]
    query: String,

    /// The number of photos to request.
    #[arg(
        long,
        short = 'n',
        default_value_t = photos::DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(photos::MAX_PER_PAGE))
    )]
    per_page: u32,

    /// Only list photos that are liked.
    #[arg(long)]
    liked: bool,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            query: photos::DEFAULT_QUERY.to_owned(),
            per_page: photos::DEFAULT_PER_PAGE,
            liked: false,
        }
    }
}

#[derive(Tabled)]
struct Row<'entry> {
    #[tabled(rename = "")]
    star: &'static str,
    #[tabled(rename = "ID")]
    id: PhotoId,
    #[tabled(rename = "Photographer")]
    photographer: &'entry str,
    #[tabled(rename = "Title")]
    title: &'entry str,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Colour", display_with = "format_color")]
    color: Option<&'entry str>,
    #[tabled(rename = "Portfolio")]
    portfolio: &'entry str,
}

fn format_color(color: &Option<&str>) -> String {
    color.unwrap_or("-").to_owned()
}

impl<'entry> From<&'entry Entry> for Row<'entry> {
    fn from(entry: &'entry Entry) -> Self {
        let photo = &entry.photo;
        Self {
            star: if entry.liked { "★" } else { "☆" },
            id: photo.id,
            photographer: photo.photographer_name(),
            title: photo.title(),
            size: format!("{}×{}", photo.width, photo.height),
            color: photo.avg_color.as_deref(),
            portfolio: &photo.photographer_url,
        }
    }
}

/// Renders a gallery page as text. A failed page comes back as `Err` so the
/// caller can report it and exit unsuccessfully.
pub(crate) fn render(page: &Page, liked_only: bool) -> std::result::Result<String, String> {
    match page {
        Page::Loading => Ok("Loading...".to_owned()),
        Page::Failed(message) => Err(format!("{message}\nRun the command again to retry.")),
        Page::Photos(entries) => {
            let mut out = format!("{}\n\nAll photos", *metadata::CLIENT_DISPLAY_NAME);

            let rows: Vec<Row<'_>> = entries
                .iter()
                .filter(|entry| !liked_only || entry.liked)
                .map(Row::from)
                .collect();
            if !rows.is_empty() {
                out.push('\n');
                out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
            }
            Ok(out)
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, context: &mut super::Context) -> Result<Option<Route>> {
        // Don't bother building a client for someone who would be turned away.
        if !context.session.is_authenticated() {
            return Ok(Some(Route::SignIn));
        }

        let options = Options {
            query: self.query,
            per_page: self.per_page,
        };
        let gallery = Gallery::mount(
            context.search_client()?,
            std::sync::Arc::clone(&context.storage),
            options,
        )
        .await;

        if let Activation::Redirect(route) = gallery.activate(&context.session).await {
            return Ok(Some(route));
        }

        match render(&gallery.page().await, self.liked) {
            Ok(text) => {
                println!("{text}");
                Ok(None)
            }
            Err(text) => {
                eprintln!("{text}");
                Err(error::Error::Command)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        photos::{Photo, Search, SearchResponse, Sources},
        session::Session,
        storage::{self, Memory},
    };

    // Answers every search with `Some` page, or a network error for `None`.
    struct Canned(Option<SearchResponse>);

    #[async_trait]
    impl Search for Canned {
        async fn search_photos(&self, _query: &str, _per_page: u32) -> Result<SearchResponse> {
            match &self.0 {
                Some(response) => Ok(response.clone()),
                None => Err(io::Error::new(io::ErrorKind::Other, "Network error").into()),
            }
        }
    }

    async fn rendered(api: Canned) -> std::result::Result<String, String> {
        let memory = Memory::new();
        let mut session = Session::new(storage::shared(memory.clone()));
        assert!(session.login("ada@example.com", "pw").await.unwrap());

        let gallery = Gallery::mount(api, storage::shared(memory), Options::default()).await;
        assert_ne!(gallery.activate(&session).await, Activation::Skipped);
        render(&gallery.page().await, false)
    }

    fn entry(id: PhotoId, liked: bool) -> Entry {
        Entry {
            photo: Photo {
                id,
                width: 640,
                height: 480,
                url: String::new(),
                photographer: "Ada".to_owned(),
                photographer_url: "https://www.pexels.com/@ada".to_owned(),
                photographer_id: None,
                avg_color: Some("#978E82".to_owned()),
                alt: None,
                liked,
                src: Sources::default(),
            },
            liked,
        }
    }

    #[test]
    fn single_photo_page() {
        let text = render(&Page::Photos(vec![entry(1, false)]), false).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(metadata::CLIENT_DISPLAY_NAME.as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("All photos"));

        let rows: Vec<&str> = lines.filter(|line| line.contains("https://www.pexels.com/@ada")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains('☆'));
        assert!(rows[0].contains("Untitled"));
        assert!(rows[0].contains("#978E82"));
        assert!(rows[0].contains("640×480"));
    }

    #[test]
    fn liked_only_hides_unliked_photos() {
        let text = render(&Page::Photos(vec![entry(1, false), entry(2, true)]), true).unwrap();
        let rows: Vec<&str> = text.lines().filter(|line| line.contains("@ada")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains('★'));
    }

    #[test]
    fn empty_page_still_has_header() {
        let text = render(&Page::Photos(vec![]), false).unwrap();
        assert!(text.ends_with("All photos"));
    }

    #[test]
    fn failed_page_is_an_error() {
        let text = render(
            &Page::Failed(
                "Failed to load photos. Please try again. Error: IO operation failed: Network error"
                    .to_owned(),
            ),
            false,
        )
        .unwrap_err();
        assert!(text.contains("Failed to load photos"));
        assert!(text.contains("Network error"));
    }

    #[tokio::test]
    async fn gallery_with_one_search_result() {
        let response = SearchResponse {
            photos: vec![entry(1, false).photo],
            page: 1,
            per_page: 10,
            total_results: 1,
            next_page: None,
            prev_page: None,
        };
        let text = rendered(Canned(Some(response))).await.unwrap();

        assert!(text.starts_with(metadata::CLIENT_DISPLAY_NAME.as_str()));
        assert!(text.contains("All photos"));
        assert_eq!(text.matches("https://www.pexels.com/@ada").count(), 1);
    }

    #[tokio::test]
    async fn gallery_with_network_error() {
        let text = rendered(Canned(None)).await.unwrap_err();
        assert!(text.contains("Failed to load photos"));
        assert!(text.contains("Network error"));
    }

    #[test]
    fn loading_page() {
        assert_eq!(render(&Page::Loading, false).as_deref(), Ok("Loading..."));
    }
}
