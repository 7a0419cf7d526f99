pub mod analysis;
pub mod documents;
pub mod repository;
pub mod user;
