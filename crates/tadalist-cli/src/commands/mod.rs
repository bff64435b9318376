pub mod group;
pub mod stats;
pub mod task;

use tadalist_core::{AppStore, FileBlobStore};

/// Open the store backed by the default data directory.
pub fn open_store() -> Result<AppStore<FileBlobStore>, Box<dyn std::error::Error>> {
    let blobs = FileBlobStore::open()?;
    Ok(AppStore::load(blobs))
}
