// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod command;
mod error;
mod gallery;
mod metadata;
mod navigation;
mod password;
mod pexels;
mod photos;
mod session;
mod sign_in;
mod storage;

use std::{path::PathBuf, process};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use command::Context;
use error::Result;
use log::{debug, error, warn};
use navigation::Route;
use secrecy::SecretString;
use session::Session;
use storage::IsPersistent as _;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Logout(command::logout::Command),
    Whoami(command::whoami::Command),
    Photos(command::photos::Command),
    Like(command::like::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, context: &mut Context) -> Result<Option<Route>> {
        match self {
            Self::Login(cmd) => cmd.execute(context).await,
            Self::Logout(cmd) => cmd.execute(context).await,
            Self::Whoami(cmd) => cmd.execute(context).await,
            Self::Photos(cmd) => cmd.execute(context).await,
            Self::Like(cmd) => cmd.execute(context).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The Pexels API key sent with every photo search.
    #[arg(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The base URL of the Pexels API.
    #[arg(long, env = "SNAPGALLERY_BASE_URL", default_value = pexels::DEFAULT_BASE_URL, value_parser = Url::parse)]
    base_url: Url,

    /// Where to keep the session and liked photos. Defaults to the
    /// platform's data directory.
    #[arg(long, env = "SNAPGALLERY_DATA_DIR", value_hint = clap::ValueHint::DirPath)]
    data_dir: Option<PathBuf>,

    /// Keep the session and liked photos in memory only.
    #[arg(long, conflicts_with = "data_dir")]
    no_persist: bool,

    /// The path to the Pinentry program to use when asking for a password.
    #[arg(long, value_hint = clap::ValueHint::ExecutablePath)]
    pinentry_program: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

fn get_storage(args: &Args) -> storage::Shared {
    if !args.no_persist {
        if let Some(dir) = &args.data_dir {
            return storage::shared(storage::File::new_in(dir));
        }

        if let Some(file_storage) = storage::File::new() {
            return storage::shared(file_storage);
        }

        warn!("We need to fall back to in-memory storage because no data directory is available; nothing will be saved");
    }

    storage::shared(storage::Memory::new())
}

async fn run(args: Args) -> Result<()> {
    let prompt: Vec<Box<dyn password::Prompt>> = vec![
        Box::new(args.pinentry_program.clone().map_or_else(
            password::PinentryPrompt::new,
            password::PinentryPrompt::new_with_executable,
        )),
        Box::new(password::RpasswordPrompt),
    ];

    let storage = get_storage(&args);
    if !storage.lock().await.is_persistent() {
        debug!("Session and likes will be forgotten on exit");
    }

    let mut session = Session::new(std::sync::Arc::clone(&storage));
    session.restore().await;

    let mut context = Context::new(
        session,
        storage,
        Box::new(prompt),
        args.api_key.map(SecretString::new),
        args.base_url,
    );

    let route = command::Command::execute(args.command, &mut context).await?;
    follow(route, &mut context).await
}

/// Keeps moving between screens until one of them has nothing further to do.
async fn follow(mut route: Option<Route>, context: &mut Context) -> Result<()> {
    while let Some(next) = route.take() {
        debug!("Navigating to {}", next);
        match next {
            Route::Photos => {
                route =
                    command::Command::execute(command::photos::Command::default(), context)
                        .await?;
            }
            Route::SignIn => {
                eprintln!(
                    "Sign in with `{} login <email>` to continue.",
                    *metadata::CLIENT_TYPE_ID
                );
                return Err(error::Error::Unauthenticated);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("SNAPGALLERY_LOG", "warn")
        .write_style("SNAPGALLERY_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
