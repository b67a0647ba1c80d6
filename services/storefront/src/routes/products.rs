//! Catalog routes

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Account, CategoryCount, CurrentSession, Product, ProductFilter, ProductQuery, ProductView},
    state::AppState,
};

/// Attach wishlist/cart flags from an account to a list of products
pub fn annotate(products: Vec<Product>, account: &Account) -> Vec<ProductView> {
    let wishlist: HashSet<Uuid> = account.wishlist.iter().copied().collect();
    let cart: HashSet<Uuid> = account.cart.iter().copied().collect();

    products
        .into_iter()
        .map(|product| {
            let heart = wishlist.contains(&product.id);
            let in_cart = cart.contains(&product.id);
            ProductView::with_flags(product, heart, in_cart)
        })
        .collect()
}

/// Search the catalog by category and name
///
/// Logged-in callers get `heart` and `inCart` flags on every product.
pub async fn search(
    State(state): State<AppState>,
    session: Option<Extension<CurrentSession>>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<ProductView>>> {
    let filter = ProductFilter::from_query(&query);

    let products = state
        .product_repository
        .search(&filter)
        .await
        .map_err(|e| {
            error!("Failed to search products: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(Extension(current)) = session else {
        return Ok(Json(products.into_iter().map(ProductView::from).collect()));
    };

    let account = state
        .account_repository
        .find_by_email(&current.user.email)
        .await
        .map_err(|e| {
            error!("Failed to look up account: {}", e);
            ApiError::InternalServerError
        })?;

    let views = match account {
        Some(account) => annotate(products, &account),
        None => products.into_iter().map(ProductView::from).collect(),
    };

    Ok(Json(views))
}

/// Product counts per category
pub async fn categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryCount>>> {
    let counts = state
        .product_repository
        .category_counts()
        .await
        .map_err(|e| {
            error!("Failed to count categories: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: 1.0,
            stock: 3,
            category_id: "Snacks".to_string(),
            image: "chips.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_annotate_sets_flags_from_account() {
        let chips = product("Chips");
        let nuts = product("Nuts");
        let account = Account {
            id: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            username: "anna".to_string(),
            password_hash: String::new(),
            cart: vec![nuts.id],
            wishlist: vec![chips.id, nuts.id],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let views = annotate(vec![chips, nuts], &account);

        assert_eq!(views[0].heart, Some(true));
        assert_eq!(views[0].in_cart, Some(false));
        assert_eq!(views[1].heart, Some(true));
        assert_eq!(views[1].in_cart, Some(true));
    }
}
