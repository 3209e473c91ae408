pub mod common;
pub mod image;
pub mod keywords;
pub mod text;

pub use common::*;
pub use image::*;
pub use keywords::*;
pub use text::*;
