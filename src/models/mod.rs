pub mod card;
pub mod common;
pub mod form;
pub mod image;

pub use card::*;
pub use common::*;
pub use form::*;
pub use image::*;
