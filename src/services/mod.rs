pub mod catalog;
pub use catalog::{CatalogError, CatalogService, ProductTree, VariationTree};

pub mod upload;
pub use upload::UploadService;
