pub mod gallery;
pub mod product;
pub mod user;
pub mod variation;
