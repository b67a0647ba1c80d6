//! Storefront models

pub mod account;
pub mod product;
pub mod session;

pub use account::{Account, Collection, NewAccount};
pub use product::{CategoryCount, Product, ProductFilter, ProductQuery, ProductView};
pub use session::{CurrentSession, SessionUser};
