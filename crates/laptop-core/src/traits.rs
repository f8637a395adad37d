// crates/laptop-core/src/traits.rs

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::LaptopError;
use crate::filter::Filter;
use crate::laptop::Laptop;
use crate::rating::Rating;
use crate::user::User;

/// Trait for the laptop catalog.
///
/// Implemented by laptop-store (in-memory backend). Every read returns an
/// owned copy; callers never see the stored value itself.
pub trait LaptopStore: Send + Sync {
    /// Save a laptop. Fails with `AlreadyExists` if the ID is taken.
    fn save(&self, laptop: &Laptop) -> Result<(), LaptopError>;

    /// Find a laptop by ID. `Ok(None)` when absent.
    fn find(&self, id: &str) -> Result<Option<Laptop>, LaptopError>;

    /// Scan the catalog, calling `found` with a copy of every laptop that
    /// matches `filter`. Stops with `Cancelled`/`DeadlineExceeded` as soon as
    /// `ctx` says so, and with whatever error `found` returns.
    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<(), LaptopError>,
    ) -> Result<(), LaptopError>;
}

/// Trait for per-laptop rating aggregates.
pub trait RatingStore: Send + Sync {
    /// Add a score for a laptop and return the updated aggregate.
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating, LaptopError>;
}

/// Trait for uploaded image persistence.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist image bytes and return the new image ID.
    ///
    /// Nothing becomes visible in the index unless the bytes were written.
    async fn save(
        &self,
        laptop_id: &str,
        image_type: &str,
        data: Vec<u8>,
    ) -> Result<String, LaptopError>;
}

/// Trait for registered users, keyed by username.
pub trait UserStore: Send + Sync {
    /// Save a user. Fails with `AlreadyExists` if the username is taken.
    fn save(&self, user: &User) -> Result<(), LaptopError>;

    /// Find a user by username. `Ok(None)` when absent.
    fn find(&self, username: &str) -> Result<Option<User>, LaptopError>;
}
