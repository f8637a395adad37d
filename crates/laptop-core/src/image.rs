// crates/laptop-core/src/image.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Index entry for an uploaded laptop image. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// The laptop this image belongs to.
    pub laptop_id: String,
    /// Type tag supplied by the uploader, normally a file extension like ".png".
    pub image_type: String,
    /// Where the image bytes were written.
    pub path: PathBuf,
}
