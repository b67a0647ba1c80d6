//! Cart and wishlist membership
//!
//! Every account owns two lists of product ids. [`MembershipService::toggle`]
//! flips whether a product is in one of them: a present id is removed, an
//! absent id is appended, and the new membership is returned. The account is
//! read and written back as two separate statements with no compare-and-set,
//! so two concurrent toggles of the same item on the same account can lose an
//! update or append the id twice.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{Account, Collection, SessionUser};

/// Storage the membership service reads and writes accounts through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load an account by its (normalized) email
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;

    /// Overwrite one collection of an account
    ///
    /// Returns `false` when the account no longer exists.
    async fn save_collection(
        &self,
        account_id: Uuid,
        collection: Collection,
        items: &[Uuid],
    ) -> anyhow::Result<bool>;
}

/// Errors raised by membership operations
#[derive(Debug, Error)]
pub enum MembershipError {
    /// No session identity was supplied
    #[error("Not logged in")]
    Unauthenticated,

    /// The item id is not a well-formed product id
    #[error("Invalid product id: {0}")]
    InvalidArgument(String),

    /// The session's account does not exist (anymore)
    #[error("Account not found")]
    NotFound,

    /// Reading or writing the account failed
    #[error("Storage failure: {0}")]
    StorageFailure(anyhow::Error),
}

/// A validated toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub email: String,
    pub collection: Collection,
    pub item_id: Uuid,
}

impl ToggleRequest {
    /// Check the caller is logged in and the item id is well-formed
    ///
    /// Authentication is checked first, so an anonymous caller never learns
    /// whether an id would have been accepted.
    pub fn parse(
        identity: Option<&SessionUser>,
        collection: Collection,
        item_id: &str,
    ) -> Result<Self, MembershipError> {
        let user = identity.ok_or(MembershipError::Unauthenticated)?;
        let item_id = parse_item_id(item_id)?;

        Ok(Self {
            email: user.email.clone(),
            collection,
            item_id,
        })
    }
}

/// Parse a product id
pub fn parse_item_id(raw: &str) -> Result<Uuid, MembershipError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MembershipError::InvalidArgument("empty id".to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| MembershipError::InvalidArgument(raw.to_string()))
}

/// Flip membership of `item` in `items`, returning whether it is now present
pub fn toggle_item(items: &mut Vec<Uuid>, item: Uuid) -> bool {
    match items.iter().position(|id| *id == item) {
        Some(idx) => {
            items.remove(idx);
            false
        }
        None => {
            items.push(item);
            true
        }
    }
}

/// Cart/wishlist operations over an [`AccountStore`]
#[derive(Clone)]
pub struct MembershipService<S> {
    store: S,
}

impl<S: AccountStore> MembershipService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Flip membership of an item in one of the caller's collections
    pub async fn toggle(
        &self,
        identity: Option<&SessionUser>,
        collection: Collection,
        item_id: &str,
    ) -> Result<bool, MembershipError> {
        let request = ToggleRequest::parse(identity, collection, item_id)?;
        self.apply(&request).await
    }

    /// Execute an already validated toggle
    pub async fn apply(&self, request: &ToggleRequest) -> Result<bool, MembershipError> {
        let mut account = self.load(&request.email).await?;

        let member = toggle_item(account.collection_mut(request.collection), request.item_id);
        self.persist(&account, request.collection).await?;

        info!(
            account = %account.id,
            collection = request.collection.column(),
            item = %request.item_id,
            member,
            "Toggled collection membership"
        );

        Ok(member)
    }

    /// Product ids in one of the caller's collections, in insertion order
    pub async fn items(
        &self,
        identity: Option<&SessionUser>,
        collection: Collection,
    ) -> Result<Vec<Uuid>, MembershipError> {
        let user = identity.ok_or(MembershipError::Unauthenticated)?;
        let account = self.load(&user.email).await?;
        Ok(account.collection(collection).to_vec())
    }

    /// Empty one of the caller's collections
    pub async fn clear(
        &self,
        identity: Option<&SessionUser>,
        collection: Collection,
    ) -> Result<(), MembershipError> {
        let user = identity.ok_or(MembershipError::Unauthenticated)?;
        let mut account = self.load(&user.email).await?;

        account.collection_mut(collection).clear();
        self.persist(&account, collection).await?;

        info!(account = %account.id, collection = collection.column(), "Cleared collection");
        Ok(())
    }

    async fn load(&self, email: &str) -> Result<Account, MembershipError> {
        self.store
            .find_by_email(email)
            .await
            .map_err(MembershipError::StorageFailure)?
            .ok_or(MembershipError::NotFound)
    }

    async fn persist(&self, account: &Account, collection: Collection) -> Result<(), MembershipError> {
        let saved = self
            .store
            .save_collection(account.id, collection, account.collection(collection))
            .await
            .map_err(MembershipError::StorageFailure)?;

        if saved {
            Ok(())
        } else {
            Err(MembershipError::NotFound)
        }
    }
}
