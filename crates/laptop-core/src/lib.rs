// crates/laptop-core/src/lib.rs
//
// laptop-core: Core types, traits, and call context for the laptop catalog service.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the catalog data structures, the error taxonomy, the
// cancellable/deadline-bearing call context, password hashing for users,
// and the trait interfaces implemented by laptop-store.

pub mod context;
pub mod error;
pub mod filter;
pub mod image;
pub mod laptop;
pub mod rating;
pub mod traits;
pub mod user;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use laptop_core::Laptop;`

// Catalog types
pub use laptop::{
    Cpu, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Screen, ScreenPanel,
    ScreenResolution, Storage, StorageDriver,
};

// Search filter
pub use filter::Filter;

// Aggregates and records
pub use image::ImageInfo;
pub use rating::Rating;
pub use user::User;

// Call lifecycle
pub use context::CallContext;

// Error type
pub use error::LaptopError;

// Traits
pub use traits::{ImageStore, LaptopStore, RatingStore, UserStore};
