// crates/laptop-store/src/image.rs
//
// Disk-backed image store implementing the `ImageStore` trait.
//
// Layout: `{image_folder}/{uuid}{image_type}`, e.g. `tmp/uploaded-img/6f1c...e2.png`.
// The bytes are written before the index is touched, so a failed write
// leaves no index entry behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use laptop_core::error::LaptopError;
use laptop_core::image::ImageInfo;
use laptop_core::traits::ImageStore;

use crate::poisoned;

/// Image store writing one file per upload and indexing it in memory.
#[derive(Debug)]
pub struct DiskImageStore {
    image_folder: PathBuf,
    images: RwLock<HashMap<String, ImageInfo>>,
}

impl DiskImageStore {
    /// Create a store rooted at `image_folder`, creating the directory if needed.
    pub fn new(image_folder: impl Into<PathBuf>) -> Result<Self, LaptopError> {
        let image_folder = image_folder.into();
        std::fs::create_dir_all(&image_folder)?;

        Ok(Self {
            image_folder,
            images: RwLock::new(HashMap::new()),
        })
    }

    pub fn image_folder(&self) -> &Path {
        &self.image_folder
    }

    /// Look up an image record by ID.
    pub fn get(&self, image_id: &str) -> Option<ImageInfo> {
        self.images.read().ok()?.get(image_id).cloned()
    }

    /// Return the number of indexed images.
    pub fn len(&self) -> usize {
        self.images.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The type tag becomes part of a file name, so it must not be able to
/// climb out of the image folder.
fn validate_image_type(image_type: &str) -> Result<(), LaptopError> {
    if image_type.contains('/') || image_type.contains('\\') || image_type.contains("..") {
        return Err(LaptopError::InvalidArgument(format!(
            "invalid image type {:?}",
            image_type
        )));
    }
    Ok(())
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(
        &self,
        laptop_id: &str,
        image_type: &str,
        data: Vec<u8>,
    ) -> Result<String, LaptopError> {
        validate_image_type(image_type)?;

        let image_id = Uuid::new_v4().to_string();
        let image_path = self.image_folder.join(format!("{}{}", image_id, image_type));
        tracing::info!("Saving image {} to file {}", image_id, image_path.display());

        tokio::fs::write(&image_path, &data).await?;

        let mut images = self.images.write().map_err(poisoned)?;
        images.insert(
            image_id.clone(),
            ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
                path: image_path,
            },
        );

        Ok(image_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a temporary directory path using UUID to avoid conflicts.
    fn temp_image_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("laptop_test_{}_{}", label, Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_save_writes_file_and_index() {
        let dir = temp_image_dir("save");
        let store = DiskImageStore::new(&dir).unwrap();

        let id = store.save("laptop-1", ".png", vec![1, 2, 3]).await.unwrap();

        let info = store.get(&id).unwrap();
        assert_eq!(info.laptop_id, "laptop-1");
        assert_eq!(info.image_type, ".png");
        assert_eq!(info.path, dir.join(format!("{}.png", id)));
        assert_eq!(tokio::fs::read(&info.path).await.unwrap(), vec![1, 2, 3]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = temp_image_dir("unique");
        let store = DiskImageStore::new(&dir).unwrap();

        let a = store.save("l", ".jpg", vec![0]).await.unwrap();
        let b = store.save("l", ".jpg", vec![0]).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_index_entry() {
        let dir = temp_image_dir("failed");
        let store = DiskImageStore::new(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let err = store.save("l", ".png", vec![1]).await.unwrap_err();
        assert!(matches!(err, LaptopError::Io(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_path_traversal_type_rejected() {
        let dir = temp_image_dir("traversal");
        let store = DiskImageStore::new(&dir).unwrap();

        let err = store.save("l", "/../../etc/x", vec![1]).await.unwrap_err();
        assert!(matches!(err, LaptopError::InvalidArgument(_)));
        assert!(store.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
