pub mod alias_repo;
pub mod item_repo;
pub mod models;
pub mod price_repo;
pub mod source_repo;
