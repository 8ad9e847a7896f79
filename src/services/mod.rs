pub mod cache;
pub mod catalog;
pub mod extractor;
pub mod matcher;
