// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Where the user should be sent next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    SignIn,
    Photos,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignIn => write!(f, "sign-in"),
            Self::Photos => write!(f, "photos"),
        }
    }
}
