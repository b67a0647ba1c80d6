//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    membership::MembershipService,
    repositories::{AccountRepository, ProductRepository},
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub account_repository: AccountRepository,
    pub product_repository: ProductRepository,
    pub session_manager: SessionManager,
    pub membership: MembershipService<AccountRepository>,
}
