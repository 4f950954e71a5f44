// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, navigation::Route};

/// Sign out and forget the saved session. Likes are kept.
#[derive(Debug, Parser)]
pub(crate) struct Command;

#[async_trait]
impl super::Command for Command {
    async fn execute(self, context: &mut super::Context) -> Result<Option<Route>> {
        context.session.logout().await?;
        println!("Signed out");
        Ok(None)
    }
}
