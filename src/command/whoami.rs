// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, navigation::Route};

/// Show who is signed in.
#[derive(Debug, Parser)]
pub(crate) struct Command;

#[async_trait]
impl super::Command for Command {
    async fn execute(self, context: &mut super::Context) -> Result<Option<Route>> {
        match context.session.identity() {
            Some(identity) => {
                println!(
                    "{} <{}> (id {})",
                    identity.display_name(),
                    identity.email(),
                    identity.id()
                );
                Ok(None)
            }
            None => Ok(Some(Route::SignIn)),
        }
    }
}
