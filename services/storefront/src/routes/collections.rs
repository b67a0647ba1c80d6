//! Cart and wishlist routes

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    middleware::identity,
    models::{Collection, CurrentSession, ProductView},
    state::AppState,
};

type Session = Option<Extension<CurrentSession>>;

async fn toggle(
    state: &AppState,
    session: &Session,
    collection: Collection,
    id: &str,
) -> ApiResult<Json<Value>> {
    let member = state
        .membership
        .toggle(identity(session), collection, id)
        .await?;

    Ok(Json(membership_body(collection, member)))
}

/// `{ "heart": bool }` for the wishlist, `{ "inCart": bool }` for the cart
pub fn membership_body(collection: Collection, member: bool) -> Value {
    let mut body = Map::new();
    body.insert(
        collection.membership_field().to_string(),
        Value::Bool(member),
    );
    Value::Object(body)
}

async fn list(
    state: &AppState,
    session: &Session,
    collection: Collection,
) -> ApiResult<Json<Vec<ProductView>>> {
    let ids = state.membership.items(identity(session), collection).await?;

    let products = state
        .product_repository
        .find_by_ids(&ids)
        .await
        .map_err(|e| {
            error!("Failed to fetch {} products: {}", collection.column(), e);
            ApiError::InternalServerError
        })?;

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

async fn clear(state: &AppState, session: &Session, collection: Collection) -> ApiResult<()> {
    state.membership.clear(identity(session), collection).await?;
    Ok(())
}

/// Toggle a product in the wishlist: `{ "heart": bool }`
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    toggle(&state, &session, Collection::Wishlist, &id).await
}

/// Toggle a product in the cart: `{ "inCart": bool }`
pub async fn toggle_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    toggle(&state, &session, Collection::Cart, &id).await
}

pub async fn list_wishlist(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<ProductView>>> {
    list(&state, &session, Collection::Wishlist).await
}

pub async fn list_cart(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<ProductView>>> {
    list(&state, &session, Collection::Cart).await
}

pub async fn clear_wishlist(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Value>> {
    clear(&state, &session, Collection::Wishlist).await?;
    Ok(Json(json!({ "message": "Wishlist cleared" })))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Value>> {
    clear(&state, &session, Collection::Cart).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_body_names_the_collection_flag() {
        assert_eq!(
            membership_body(Collection::Wishlist, true),
            json!({ "heart": true })
        );
        assert_eq!(
            membership_body(Collection::Cart, false),
            json!({ "inCart": false })
        );
    }
}
