//! Account service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::AccountError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Stored profile of a registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub address: Option<String>,
}

/// Trait for identity and profile operations.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account and its profile.
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AccountError>;

    /// Checks credentials and returns the matching profile.
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AccountError>;

    /// Fetches a profile.
    async fn get_profile(&self, uid: &UserId) -> Result<UserProfile, AccountError>;

    /// Applies a profile update and returns the result.
    async fn update_profile(
        &self,
        uid: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AccountError>;

    /// Deletes the profile and the credentials behind it.
    async fn delete_account(&self, uid: &UserId) -> Result<(), AccountError>;
}

#[async_trait]
impl<T: AccountService + ?Sized> AccountService for Arc<T> {
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AccountError> {
        (**self).register(email, password, display_name).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        (**self).sign_in(email, password).await
    }

    async fn get_profile(&self, uid: &UserId) -> Result<UserProfile, AccountError> {
        (**self).get_profile(uid).await
    }

    async fn update_profile(
        &self,
        uid: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AccountError> {
        (**self).update_profile(uid, update).await
    }

    async fn delete_account(&self, uid: &UserId) -> Result<(), AccountError> {
        (**self).delete_account(uid).await
    }
}

#[derive(Debug)]
struct Account {
    profile: UserProfile,
    password_hash: String,
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    accounts: HashMap<UserId, Account>,
    by_email: HashMap<String, UserId>,
}

/// In-memory account service with bcrypt-hashed passwords.
#[derive(Debug, Clone)]
pub struct InMemoryAccountService {
    state: Arc<RwLock<InMemoryAccountState>>,
    cost: u32,
}

impl Default for InMemoryAccountService {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl InMemoryAccountService {
    /// Creates an empty account service using the default bcrypt cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty account service with a specific bcrypt cost.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            state: Arc::default(),
            cost,
        }
    }

    /// Returns the number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.state.read().map(|s| s.accounts.len()).unwrap_or(0)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn poisoned() -> AccountError {
    AccountError::Unavailable("account lock poisoned".to_string())
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    #[tracing::instrument(skip(self, password))]
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AccountError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(AccountError::InvalidInput("email address is malformed".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = bcrypt::hash(password, self.cost)?;

        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.by_email.contains_key(&email) {
            return Err(AccountError::EmailTaken(email));
        }

        let uid = UserId::new(uuid::Uuid::new_v4().simple().to_string());
        let profile = UserProfile {
            uid: uid.clone(),
            email: email.clone(),
            display_name: display_name.unwrap_or_default().trim().to_string(),
            address: String::new(),
            created_at: Utc::now(),
        };

        state.by_email.insert(email, uid.clone());
        state.accounts.insert(
            uid,
            Account {
                profile: profile.clone(),
                password_hash,
            },
        );

        tracing::info!(uid = %profile.uid, "account registered");
        Ok(profile)
    }

    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        let (profile, password_hash) = {
            let state = self.state.read().map_err(|_| poisoned())?;
            let account = state
                .by_email
                .get(&normalize_email(email))
                .and_then(|uid| state.accounts.get(uid))
                .ok_or(AccountError::InvalidCredentials)?;
            (account.profile.clone(), account.password_hash.clone())
        };

        if bcrypt::verify(password, &password_hash)? {
            Ok(profile)
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    async fn get_profile(&self, uid: &UserId) -> Result<UserProfile, AccountError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        state
            .accounts
            .get(uid)
            .map(|a| a.profile.clone())
            .ok_or_else(|| AccountError::NotFound(uid.clone()))
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_profile(
        &self,
        uid: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AccountError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let account = state
            .accounts
            .get_mut(uid)
            .ok_or_else(|| AccountError::NotFound(uid.clone()))?;

        if let Some(display_name) = update.display_name {
            account.profile.display_name = display_name.trim().to_string();
        }
        if let Some(address) = update.address {
            account.profile.address = address.trim().to_string();
        }

        Ok(account.profile.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_account(&self, uid: &UserId) -> Result<(), AccountError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let account = state
            .accounts
            .remove(uid)
            .ok_or_else(|| AccountError::NotFound(uid.clone()))?;
        state.by_email.remove(&account.profile.email);

        tracing::info!(%uid, "account deleted");
        Ok(())
    }
}
