// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod file;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::lock::Mutex;

use crate::error::Result;

pub(crate) use file::File;
pub(crate) use memory::Memory;

/// Storage handle shared by the session and the gallery.
pub(crate) type Shared = Arc<Mutex<Box<dyn Storage>>>;

pub(crate) fn shared<S: Storage + 'static>(storage: S) -> Shared {
    Arc::new(Mutex::new(Box::new(storage)))
}

pub(crate) trait IsPersistent {
    fn is_persistent(&self) -> bool;
}

impl<T: IsPersistent + ?Sized> IsPersistent for Box<T> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}

/// A string-to-string key-value store. Removing a key that is not present
/// succeeds.
#[async_trait]
pub(crate) trait Storage: Send + Sync + IsPersistent {
    async fn get(&mut self, key: &str) -> Result<Option<String>>;
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;
    async fn remove(&mut self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Box<T> {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
