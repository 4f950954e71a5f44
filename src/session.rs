// SPDX-FileCopyrightText: 2022 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    storage::{self, Storage as _},
};

pub(crate) const USER_KEY: &str = "user";

// Sign-in is simulated, so every identity shares the same id.
const PLACEHOLDER_ID: &str = "1";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    id: String,
    email: String,
    #[serde(rename = "name")]
    display_name: String,
}

impl Identity {
    fn from_email(email: &str) -> Self {
        let display_name = email.split_once('@').map_or(email, |(local, _)| local);
        Self {
            id: PLACEHOLDER_ID.to_owned(),
            email: email.to_owned(),
            display_name: display_name.to_owned(),
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// The signed-in identity and its persisted copy.
///
/// A session starts logged out. [`Session::restore`] may pick up an identity
/// saved by an earlier run; afterwards only [`Session::login`] and
/// [`Session::logout`] change it.
pub(crate) struct Session {
    storage: storage::Shared,
    identity: Option<Identity>,
}

impl Session {
    pub(crate) const fn new(storage: storage::Shared) -> Self {
        Self {
            storage,
            identity: None,
        }
    }

    /// Loads the saved identity, if any. A record that does not parse is
    /// deleted.
    pub(crate) async fn restore(&mut self) {
        let mut storage = self.storage.lock().await;
        let saved = match storage.get(USER_KEY).await {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(e) => {
                warn!("Could not read the saved session: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Identity>(&saved) {
            Ok(identity) => {
                debug!("Restored session for {}", identity.email);
                self.identity = Some(identity);
            }
            Err(e) => {
                warn!("Discarding the saved session because it is malformed: {}", e);
                if let Err(e) = storage.remove(USER_KEY).await {
                    warn!("Could not remove the malformed session: {}", e);
                }
            }
        }
    }

    /// Accepts any pair of non-blank credentials. Returns `Ok(false)` without
    /// touching the session otherwise.
    pub(crate) async fn login(&mut self, email: &str, password: &str) -> Result<bool> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Ok(false);
        }

        let identity = Identity::from_email(email);
        let record = serde_json::to_string(&identity)?;
        self.identity = Some(identity);
        self.storage.lock().await.set(USER_KEY, &record).await?;
        Ok(true)
    }

    pub(crate) async fn logout(&mut self) -> Result<()> {
        self.identity = None;
        self.storage.lock().await.remove(USER_KEY).await
    }

    pub(crate) const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub(crate) const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
