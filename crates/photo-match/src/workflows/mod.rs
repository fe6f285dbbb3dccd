pub mod child_photo;
