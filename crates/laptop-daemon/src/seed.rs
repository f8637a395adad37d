// crates/laptop-daemon/src/seed.rs
//
// Startup user seeding.

use laptop_core::traits::UserStore;
use laptop_core::{LaptopError, User};

use crate::config::UserSeed;

/// Create every seed user in `store`. Returns the number created.
///
/// A username that already exists is skipped with a warning.
pub fn seed_users(store: &dyn UserStore, seeds: &[UserSeed]) -> Result<usize, LaptopError> {
    let mut created = 0;
    for seed in seeds {
        match store.save(&User::new(&seed.username, &seed.password, &seed.role)) {
            Ok(()) => {
                tracing::info!(username = %seed.username, role = %seed.role, "Created user");
                created += 1;
            }
            Err(LaptopError::AlreadyExists(_)) => {
                tracing::warn!(username = %seed.username, "User already exists, skipping");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(created)
}
