pub mod image_file;
pub mod media_type;
pub mod path_processing;

pub use image_file::*;
pub use media_type::*;
pub use path_processing::*;
