pub mod services;

pub use services::{img_tag, FsImageStore, ImageStore};
