//! Photo records and the categories used to group them.

mod category;
mod db;
mod domain;

pub use category::{Category, CategoryFilter};
pub use db::{create_photo_table, delete_photo_record, get_all_photos, insert_photo};
pub use domain::{NewPhoto, Photo, PhotoId};
