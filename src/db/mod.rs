//! Database layer (Firestore or in-memory).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::UserAccount;

/// Collection names as constants.
pub mod collections {
    /// User accounts (keyed by URL-encoded username)
    pub const USERS: &str = "users";
}

/// Account storage, selected by `STORAGE_BACKEND`.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    /// Connect the configured backend.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Firestore => Ok(Self::Firestore(
                FirestoreDb::new(&config.gcp_project_id).await?,
            )),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory account storage; data is lost on restart");
                Ok(Self::Memory(MemoryDb::new()))
            }
        }
    }

    pub async fn get_account(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        match self {
            Self::Firestore(db) => db.get_account(username).await,
            Self::Memory(db) => Ok(db.get_account(username)),
        }
    }

    pub async fn create_account(&self, account: &UserAccount) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.create_account(account).await,
            Self::Memory(db) => db.create_account(account),
        }
    }

    /// Apply `apply` to the stored account as one atomic read-modify-write.
    ///
    /// Returns `NotFound` if the account does not exist. `apply` may be
    /// called more than once if a Firestore transaction has to be retried.
    pub async fn update_account<F, T>(&self, username: &str, apply: F) -> Result<T, AppError>
    where
        F: Fn(&mut UserAccount) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        match self {
            Self::Firestore(db) => db.update_account(username, apply).await,
            Self::Memory(db) => db.update_account(username, apply),
        }
    }
}
