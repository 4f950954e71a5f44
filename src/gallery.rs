// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicBool, Ordering},
};

use futures_util::lock::Mutex;
use log::{debug, error, info};

use crate::{
    navigation::Route,
    photos::{self, Photo, PhotoId, Search},
    session::Session,
    storage::{self, Storage as _},
};

pub(crate) const LIKED_PHOTOS_KEY: &str = "liked_photos";

/// Keeps a setup hook that may be invoked more than once from issuing more
/// than one request.
///
/// A request may only start when none is in flight and none has completed.
/// The in-flight flag is cleared when the returned [`InFlight`] is dropped, so
/// it never outlives the request. The completed flag is never cleared.
#[derive(Debug, Default)]
pub(crate) struct FetchGuard {
    in_flight: AtomicBool,
    completed: AtomicBool,
}

impl FetchGuard {
    pub(crate) fn try_begin(&self) -> Option<InFlight<'_>> {
        if self.completed.load(Ordering::Acquire) {
            return None;
        }
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(InFlight { guard: self })
    }

    #[cfg(test)]
    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }
}

pub(crate) struct InFlight<'guard> {
    guard: &'guard FetchGuard,
}

impl InFlight<'_> {
    pub(crate) fn complete(self) {
        self.guard.completed.store(true, Ordering::Release);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Options {
    pub(crate) query: String,
    pub(crate) per_page: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            query: photos::DEFAULT_QUERY.to_owned(),
            per_page: photos::DEFAULT_PER_PAGE,
        }
    }
}

/// Result of activating the gallery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Activation {
    Redirect(Route),
    /// A fetch is already running or has already succeeded.
    Skipped,
    Loaded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) photo: Photo,
    pub(crate) liked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Page {
    Loading,
    Failed(String),
    Photos(Vec<Entry>),
}

#[derive(Debug)]
struct View {
    loading: bool,
    photos: Vec<Photo>,
    error: Option<String>,
}

/// The locally liked photo ids, saved as a JSON array on every change.
pub(crate) struct Likes {
    storage: storage::Shared,
    ids: BTreeSet<PhotoId>,
}

impl Likes {
    pub(crate) const fn new(storage: storage::Shared) -> Self {
        Self {
            storage,
            ids: BTreeSet::new(),
        }
    }

    pub(crate) async fn load(storage: storage::Shared) -> Self {
        let mut likes = Self::new(storage);
        likes.reload().await;
        likes
    }

    /// Replaces the in-memory set with the saved one. Anything unreadable
    /// counts as no likes; the saved record is left alone.
    pub(crate) async fn reload(&mut self) {
        self.ids = Self::read(&self.storage).await;
    }

    async fn read(storage: &storage::Shared) -> BTreeSet<PhotoId> {
        let stored = match storage.lock().await.get(LIKED_PHOTOS_KEY).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                error!("Error loading liked photos from storage: {}", e);
                return BTreeSet::new();
            }
        };

        match serde_json::from_str::<Vec<PhotoId>>(&stored) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                error!("Error loading liked photos from storage: {}", e);
                BTreeSet::new()
            }
        }
    }

    /// Flips the like on `id` and saves the whole set. Returns whether the
    /// photo is now in the set. A failed save is logged; the in-memory set
    /// keeps the change.
    pub(crate) async fn toggle(&mut self, id: PhotoId) -> bool {
        let now_liked = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id)
        };

        let ids: Vec<PhotoId> = self.ids.iter().copied().collect();
        match serde_json::to_string(&ids) {
            Ok(record) => {
                if let Err(e) = self.storage.lock().await.set(LIKED_PHOTOS_KEY, &record).await {
                    error!("Error saving liked photos to storage: {}", e);
                }
            }
            Err(e) => error!("Error saving liked photos to storage: {}", e),
        }

        now_liked
    }

    pub(crate) fn contains(&self, id: PhotoId) -> bool {
        self.ids.contains(&id)
    }

    pub(crate) const fn ids(&self) -> &BTreeSet<PhotoId> {
        &self.ids
    }
}

pub(crate) struct Gallery<A> {
    api: A,
    options: Options,
    guard: FetchGuard,
    view: Mutex<View>,
    likes: Likes,
}

impl<A: Search> Gallery<A> {
    /// Creates the gallery in its loading state and reads the saved likes.
    pub(crate) async fn mount(api: A, storage: storage::Shared, options: Options) -> Self {
        let mut gallery = Self {
            api,
            options,
            guard: FetchGuard::default(),
            view: Mutex::new(View {
                loading: true,
                photos: Vec::new(),
                error: None,
            }),
            likes: Likes::new(storage),
        };
        gallery.load_liked_set().await;
        gallery
    }

    pub(crate) async fn load_liked_set(&mut self) {
        self.likes.reload().await;
    }

    pub(crate) fn check_access(&self, session: &Session) -> Option<Route> {
        (!session.is_authenticated()).then_some(Route::SignIn)
    }

    pub(crate) async fn activate(&self, session: &Session) -> Activation {
        if let Some(route) = self.check_access(session) {
            debug!("Not signed in, redirecting to {}", route);
            return Activation::Redirect(route);
        }
        self.fetch_once().await
    }

    pub(crate) async fn fetch_once(&self) -> Activation {
        let Some(in_flight) = self.guard.try_begin() else {
            debug!("Photos are already loaded or loading");
            return Activation::Skipped;
        };

        self.view.lock().await.loading = true;
        let result = self
            .api
            .search_photos(&self.options.query, self.options.per_page)
            .await;

        let mut view = self.view.lock().await;
        view.loading = false;
        match result {
            Ok(response) => {
                info!(
                    "Loaded {} of {} photos for {:?}",
                    response.photos.len(),
                    response.total_results,
                    self.options.query
                );
                view.photos = response.photos;
                view.error = None;
                in_flight.complete();
                Activation::Loaded
            }
            Err(e) => {
                error!("Failed to load photos: {}", e);
                view.error = Some(format!(
                    "Failed to load photos. Please try again. Error: {e}"
                ));
                Activation::Failed
            }
        }
    }

    pub(crate) async fn toggle_like(&mut self, id: PhotoId) -> bool {
        self.likes.toggle(id).await
    }

    /// A photo the API already marks as liked stays liked whatever the local
    /// set says.
    pub(crate) fn is_liked(&self, photo: &Photo) -> bool {
        photo.liked || self.likes.contains(photo.id)
    }

    #[cfg(test)]
    pub(crate) const fn guard(&self) -> &FetchGuard {
        &self.guard
    }

    pub(crate) async fn page(&self) -> Page {
        let view = self.view.lock().await;
        if view.loading {
            Page::Loading
        } else if let Some(message) = &view.error {
            Page::Failed(message.clone())
        } else {
            Page::Photos(
                view.photos
                    .iter()
                    .map(|photo| Entry {
                        liked: self.is_liked(photo),
                        photo: photo.clone(),
                    })
                    .collect(),
            )
        }
    }
}
