pub mod prelude;

pub mod gallery_images;
pub mod products;
pub mod users;
pub mod variations;
