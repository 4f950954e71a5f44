// SPDX-FileCopyrightText: 2022 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::SecretString;
use url::Url;

use crate::{
    error::{self, Result},
    navigation::Route,
    password, pexels,
    session::Session,
    storage,
};

pub(crate) mod like;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod photos;
pub(crate) mod whoami;

/// Everything a command may need, built once in `main`.
pub(crate) struct Context {
    pub(crate) session: Session,
    pub(crate) storage: storage::Shared,
    pub(crate) prompt: Box<dyn password::Prompt>,
    api_key: Option<SecretString>,
    base_url: Url,
}

impl Context {
    pub(crate) fn new(
        session: Session,
        storage: storage::Shared,
        prompt: Box<dyn password::Prompt>,
        api_key: Option<SecretString>,
        base_url: Url,
    ) -> Self {
        Self {
            session,
            storage,
            prompt,
            api_key,
            base_url,
        }
    }

    pub(crate) fn search_client(&self) -> Result<pexels::Client> {
        let api_key = self.api_key.as_ref().ok_or(error::Api::MissingKey)?;
        pexels::Client::new(self.base_url.clone(), api_key)
    }
}

/// A command returns the route to follow next, if any.
#[async_trait]
pub(crate) trait Command {
    async fn execute(self, context: &mut Context) -> Result<Option<Route>>;
}
