// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed account operations.

use crate::db::collections;
use crate::error::AppError;
use crate::models::UserAccount;
use firestore::errors::{BackoffError, FirestoreError};
use firestore::FirestoreTransactionOptions;
use std::sync::Arc;

/// Upper bound on how long a contended account update keeps retrying.
const TRANSACTION_RETRY_SECS: i64 = 30;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Document ID for a username. Firestore IDs may not contain `/`.
fn account_doc_id(username: &str) -> String {
    urlencoding::encode(username).into_owned()
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator needs no credentials; avoid picking up local ones.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Get an account by username.
    pub async fn get_account(&self, username: &str) -> Result<Option<UserAccount>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&account_doc_id(username))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an account. Fails with `Conflict` if the username is taken.
    pub async fn create_account(&self, account: &UserAccount) -> Result<(), AppError> {
        if self.get_account(&account.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {} is already taken",
                account.username
            )));
        }

        let result: Result<UserAccount, _> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(account_doc_id(&account.username))
            .object(account)
            .execute()
            .await;

        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent signup for the same name
            Err(FirestoreError::DataConflictError(_)) => Err(
                AppError::Conflict(format!("Username {} is already taken", account.username)),
            ),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    // ─── Atomic Account Update ───────────────────────────────────

    /// Read-modify-write an account inside a Firestore transaction.
    ///
    /// The read goes through the transaction, so a concurrent commit to the
    /// same account aborts this one. Aborted attempts are retried with a fresh
    /// read, which means `apply` may run more than once; only the result of
    /// the attempt that commits is returned.
    pub async fn update_account<F, T>(&self, username: &str, apply: F) -> Result<T, AppError>
    where
        F: Fn(&mut UserAccount) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        let client = self.get_client()?;
        let doc_id = account_doc_id(username);
        let apply = Arc::new(apply);

        let options = FirestoreTransactionOptions::new()
            .with_max_elapsed_time(chrono::Duration::seconds(TRANSACTION_RETRY_SECS));

        let updated = client
            .run_transaction_with_options(
                |db, transaction| {
                    let doc_id = doc_id.clone();
                    let apply = Arc::clone(&apply);
                    Box::pin(async move {
                        let current: Option<UserAccount> = db
                            .fluent()
                            .select()
                            .by_id_in(collections::USERS)
                            .obj()
                            .one(&doc_id)
                            .await
                            .map_err(into_backoff)?;

                        let Some(mut account) = current else {
                            return Ok(None);
                        };

                        let result = apply(&mut account);

                        db.fluent()
                            .update()
                            .in_col(collections::USERS)
                            .document_id(&doc_id)
                            .object(&account)
                            .add_to_transaction(transaction)
                            .map_err(into_backoff)?;

                        Ok::<_, BackoffError<FirestoreError>>(Some(result))
                    })
                },
                options,
            )
            .await
            .map_err(|e| AppError::Database(format!("Account transaction failed: {}", e)))?;

        match updated {
            Some(result) => {
                tracing::debug!(username, "Account updated atomically");
                Ok(result)
            }
            None => Err(AppError::NotFound(format!("User {} not found", username))),
        }
    }
}

/// Contention and unavailability are worth another attempt; anything else
/// ends the transaction.
fn into_backoff(err: FirestoreError) -> BackoffError<FirestoreError> {
    match err {
        FirestoreError::DatabaseError(ref db_err) if db_err.retry_possible => {
            BackoffError::transient(err)
        }
        other => BackoffError::permanent(other),
    }
}
