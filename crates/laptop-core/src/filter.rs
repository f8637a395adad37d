// crates/laptop-core/src/filter.rs
//
// Search filter and the matching predicate used by LaptopStore::search.

use serde::{Deserialize, Serialize};

use crate::laptop::{Laptop, Memory};

/// Constraints a laptop must satisfy to be returned by a search.
///
/// The three minimums impose no constraint at zero. The price ceiling always
/// applies, so a zero `max_price_usd` only admits free laptops; use
/// `Filter::unconstrained()` to match the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Maximum price in USD, inclusive.
    pub max_price_usd: f64,
    /// Minimum number of CPU cores.
    pub min_cpu_cores: u32,
    /// Minimum CPU base frequency in GHz.
    pub min_cpu_ghz: f64,
    /// Minimum RAM, compared after normalizing both sides to bits.
    pub min_ram: Option<Memory>,
}

impl Filter {
    /// A filter every laptop satisfies.
    pub fn unconstrained() -> Self {
        Self {
            max_price_usd: f64::MAX,
            ..Default::default()
        }
    }

    /// Return true when `laptop` satisfies every constraint of this filter.
    pub fn matches(&self, laptop: &Laptop) -> bool {
        if laptop.price_usd > self.max_price_usd {
            return false;
        }

        let (cores, ghz) = laptop
            .cpu
            .as_ref()
            .map(|cpu| (cpu.number_cores, cpu.min_ghz))
            .unwrap_or((0, 0.0));

        if cores < self.min_cpu_cores {
            return false;
        }

        if ghz < self.min_cpu_ghz {
            return false;
        }

        let ram_bits = laptop.ram.map(|m| m.to_bits()).unwrap_or(0);
        let min_ram_bits = self.min_ram.map(|m| m.to_bits()).unwrap_or(0);
        ram_bits >= min_ram_bits
    }
}
