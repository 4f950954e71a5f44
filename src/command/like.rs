// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, gallery::Likes, navigation::Route, photos::PhotoId};

/// Toggle the like on one or more photos. Without any IDs, list the liked
/// photos instead.
///
/// Only likes kept on this device change. A photo the API itself reports as
/// liked still shows as liked after its local like is removed.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The IDs of the photos to toggle.
    #[clap()]
    ids: Vec<PhotoId>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, context: &mut super::Context) -> Result<Option<Route>> {
        if !context.session.is_authenticated() {
            return Ok(Some(Route::SignIn));
        }

        let mut likes = Likes::load(Arc::clone(&context.storage)).await;
        if self.ids.is_empty() {
            for id in likes.ids() {
                println!("★ {id}");
            }
            return Ok(None);
        }

        for id in self.ids {
            if likes.toggle(id).await {
                println!("★ {id} liked");
            } else {
                println!("☆ {id} local like removed");
            }
        }
        Ok(None)
    }
}
