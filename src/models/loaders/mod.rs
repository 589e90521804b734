pub mod upload_loader;

pub use upload_loader::{load_upload_file, load_upload_files};
