// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use secrecy::SecretString;

use crate::{
    error::{self, Result},
    navigation::Route,
    password::Request,
    sign_in,
};

const MAX_PROMPTS: usize = 3;

/// Sign in and show the gallery. Any non-empty password is accepted.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The password to sign in with. When omitted, you are prompted for it.
    #[arg(long, env = "SNAPGALLERY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// The email address to sign in as.
    #[clap()]
    email: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, context: &mut super::Context) -> Result<Option<Route>> {
        if let Some(password) = self.password {
            let password = SecretString::new(password);
            return match sign_in::submit(&mut context.session, &self.email, &password).await {
                Ok(route) => Ok(Some(route)),
                Err(errors) => {
                    eprintln!("{errors}");
                    Err(error::Error::Command)
                }
            };
        }

        let mut req = Request::new(&self.email);
        for _ in 0..MAX_PROMPTS {
            let password = context
                .prompt
                .prompt(req.clone())
                .await?
                .ok_or(error::Password::NoPrompt)?;

            match sign_in::submit(&mut context.session, &self.email, &password).await {
                Ok(route) => return Ok(Some(route)),
                // Only a password problem can be fixed by asking again.
                Err(errors) if errors.email.is_none() => {
                    if let Some(message) = &errors.password {
                        req = Request::new(&self.email).with_error(message);
                    }
                }
                Err(errors) => {
                    eprintln!("{errors}");
                    return Err(error::Error::Command);
                }
            }
        }

        error!("Giving up after {} attempts", MAX_PROMPTS);
        Err(error::Error::Command)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use url::Url;

    use super::*;
    use crate::{
        command::{Command as _, Context},
        password::Prompt,
        pexels,
        session::Session,
        storage::{self, testing::Failing, Memory},
    };

    // Hands out the given answers in order and remembers the error shown with
    // each request.
    struct Scripted {
        answers: Mutex<Vec<&'static str>>,
        shown_errors: Arc<Mutex<Vec<Option<String>>>>,
    }

    #[async_trait]
    impl Prompt for Scripted {
        async fn prompt(&self, req: Request) -> Result<Option<SecretString>> {
            self.shown_errors
                .lock()
                .unwrap()
                .push(req.error().map(str::to_owned));
            let mut answers = self.answers.lock().unwrap();
            Ok((!answers.is_empty()).then(|| SecretString::new(answers.remove(0).to_owned())))
        }
    }

    fn context(
        storage: storage::Shared,
        answers: Vec<&'static str>,
    ) -> (Context, Arc<Mutex<Vec<Option<String>>>>) {
        let shown_errors = Arc::new(Mutex::new(Vec::new()));
        let prompt = Scripted {
            answers: Mutex::new(answers),
            shown_errors: Arc::clone(&shown_errors),
        };
        let context = Context::new(
            Session::new(Arc::clone(&storage)),
            storage,
            Box::new(prompt),
            None,
            Url::parse(pexels::DEFAULT_BASE_URL).unwrap(),
        );
        (context, shown_errors)
    }

    fn login(email: &str, password: Option<&str>) -> Command {
        Command {
            password: password.map(str::to_owned),
            email: email.to_owned(),
        }
    }

    #[tokio::test]
    async fn prompted_password_signs_in() {
        let (mut context, shown_errors) = context(storage::shared(Memory::new()), vec!["pw"]);

        let route = login("ada@example.com", None)
            .execute(&mut context)
            .await
            .unwrap();
        assert_eq!(route, Some(Route::Photos));
        assert!(context.session.is_authenticated());
        assert_eq!(*shown_errors.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn blank_password_asks_again() {
        let (mut context, shown_errors) =
            context(storage::shared(Memory::new()), vec!["  ", "pw"]);

        let route = login("ada@example.com", None)
            .execute(&mut context)
            .await
            .unwrap();
        assert_eq!(route, Some(Route::Photos));
        assert_eq!(
            *shown_errors.lock().unwrap(),
            vec![None, Some("Password is required".to_owned())]
        );
    }

    #[tokio::test]
    async fn gives_up_after_repeated_blank_passwords() {
        let (mut context, shown_errors) =
            context(storage::shared(Memory::new()), vec![""; MAX_PROMPTS]);

        let result = login("ada@example.com", None).execute(&mut context).await;
        assert!(matches!(result, Err(error::Error::Command)));
        assert_eq!(shown_errors.lock().unwrap().len(), MAX_PROMPTS);
        assert!(!context.session.is_authenticated());
    }

    #[tokio::test]
    async fn storage_failure_stops_without_asking_again() {
        let (mut context, shown_errors) = context(storage::shared(Failing), vec!["pw", "pw"]);

        let result = login("ada@example.com", None).execute(&mut context).await;
        assert!(matches!(result, Err(error::Error::Command)));
        assert_eq!(shown_errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_email_is_not_prompted_again() {
        let (mut context, shown_errors) = context(storage::shared(Memory::new()), vec!["pw"]);

        let result = login("ada", None).execute(&mut context).await;
        assert!(matches!(result, Err(error::Error::Command)));
        assert_eq!(shown_errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn password_option_skips_the_prompt() {
        let (mut context, shown_errors) = context(storage::shared(Memory::new()), vec![]);

        let route = login("ada@example.com", Some("pw"))
            .execute(&mut context)
            .await
            .unwrap();
        assert_eq!(route, Some(Route::Photos));
        assert!(shown_errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_prompt_available() {
        let (mut context, _) = context(storage::shared(Memory::new()), vec![]);

        let result = login("ada@example.com", None).execute(&mut context).await;
        assert!(matches!(
            result,
            Err(error::Error::Password(error::Password::NoPrompt))
        ));
    }
}
