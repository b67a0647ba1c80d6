//! Account model and the per-account item collections

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Account entity
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cart: Vec<Uuid>,
    pub wishlist: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Items referenced by the given collection
    pub fn collection(&self, collection: Collection) -> &[Uuid] {
        match collection {
            Collection::Cart => &self.cart,
            Collection::Wishlist => &self.wishlist,
        }
    }

    pub fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Uuid> {
        match collection {
            Collection::Cart => &mut self.cart,
            Collection::Wishlist => &mut self.wishlist,
        }
    }
}

/// New account creation payload, already validated
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// The two item collections an account owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Cart,
    Wishlist,
}

impl Collection {
    /// Column holding the collection in the `accounts` table
    pub fn column(self) -> &'static str {
        match self {
            Collection::Cart => "cart",
            Collection::Wishlist => "wishlist",
        }
    }

    /// JSON field reporting membership after a toggle
    pub fn membership_field(self) -> &'static str {
        match self {
            Collection::Cart => "inCart",
            Collection::Wishlist => "heart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            username: "anna".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            cart: vec![Uuid::new_v4()],
            wishlist: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(account()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "anna@example.com");
    }

    #[test]
    fn test_collection_accessors_pick_the_right_list() {
        let mut account = account();
        let item = Uuid::new_v4();

        account.collection_mut(Collection::Wishlist).push(item);

        assert_eq!(account.collection(Collection::Wishlist), &[item]);
        assert_eq!(account.collection(Collection::Cart).len(), 1);
    }

    #[test]
    fn test_membership_fields() {
        assert_eq!(Collection::Cart.membership_field(), "inCart");
        assert_eq!(Collection::Wishlist.membership_field(), "heart");
        assert_eq!(Collection::Cart.column(), "cart");
        assert_eq!(Collection::Wishlist.column(), "wishlist");
    }
}
