// crates/laptop-store/src/lib.rs
//
// laptop-store: Storage layer for the laptop catalog service.
//
// Each logical table (laptops, ratings, images, users) owns its own
// reader-writer lock. Readers never block readers; a writer excludes
// everyone on that table only. Nothing outside this crate touches the maps.

pub mod image;
pub mod laptop;
pub mod rating;
pub mod user;

// Re-export key types for ergonomic access from downstream crates.
pub use image::DiskImageStore;
pub use laptop::InMemoryLaptopStore;
pub use rating::InMemoryRatingStore;
pub use user::InMemoryUserStore;

use laptop_core::LaptopError;

/// Map a poisoned lock into a storage error.
pub(crate) fn poisoned<T>(err: std::sync::PoisonError<T>) -> LaptopError {
    LaptopError::Storage(format!("RwLock poisoned: {}", err))
}
