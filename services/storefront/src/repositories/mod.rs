//! Repositories for database operations

pub mod account;
pub mod product;

pub use account::AccountRepository;
pub use product::ProductRepository;
