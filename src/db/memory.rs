// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process account store.
//!
//! Each update runs while holding the map's write lock for that entry, so
//! updates to one account are serialized.

use crate::error::AppError;
use crate::models::UserAccount;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryDb {
    accounts: Arc<DashMap<String, UserAccount>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_account(&self, username: &str) -> Option<UserAccount> {
        self.accounts.get(username).map(|entry| entry.clone())
    }

    pub fn create_account(&self, account: &UserAccount) -> Result<(), AppError> {
        match self.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Username {} is already taken",
                account.username
            ))),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                Ok(())
            }
        }
    }

    pub fn update_account<F, T>(&self, username: &str, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut UserAccount) -> T,
    {
        let mut entry = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;
        Ok(apply(entry.value_mut()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
