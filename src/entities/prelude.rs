pub use super::gallery_images::Entity as GalleryImages;
pub use super::products::Entity as Products;
pub use super::users::Entity as Users;
pub use super::variations::Entity as Variations;
