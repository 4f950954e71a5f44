// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::error::Result;

use super::{IsPersistent, Memory, Storage};

/// Wraps [`Memory`] and remembers every `set` it sees.
#[derive(Clone, Default)]
pub(crate) struct Recording {
    inner: Memory,
    writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl Recording {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl IsPersistent for Recording {
    fn is_persistent(&self) -> bool {
        false
    }
}

#[async_trait]
impl Storage for Recording {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        self.inner.set(key, value).await
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }
}

/// Every operation fails.
pub(crate) struct Failing;

impl IsPersistent for Failing {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl Storage for Failing {
    async fn get(&mut self, _key: &str) -> Result<Option<String>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is locked").into())
    }

    async fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into())
    }

    async fn remove(&mut self, _key: &str) -> Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is locked").into())
    }
}
