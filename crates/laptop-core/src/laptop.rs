// crates/laptop-core/src/laptop.rs
//
// Catalog entity: a Laptop and the hardware components it is made of.
//
// Every type derives Clone so the store layer can hand out owned copies;
// nothing here is shared by reference between the store and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A laptop record in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Laptop {
    /// Unique identifier (a UUID string once stored).
    pub id: String,
    /// Manufacturer, e.g. "Lenovo".
    pub brand: String,
    /// Model name, e.g. "Thinkpad X1".
    pub name: String,
    pub cpu: Option<Cpu>,
    pub ram: Option<Memory>,
    pub gpus: Vec<Gpu>,
    pub storages: Vec<Storage>,
    pub screen: Option<Screen>,
    pub keyboard: Option<Keyboard>,
    pub weight_kg: f64,
    pub price_usd: f64,
    pub release_year: u32,
    /// Last modification time as reported by the client.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Central processing unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cpu {
    pub brand: String,
    pub name: String,
    pub number_cores: u32,
    pub number_threads: u32,
    pub min_ghz: f64,
    pub max_ghz: f64,
}

/// Graphics processing unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gpu {
    pub brand: String,
    pub name: String,
    pub min_ghz: f64,
    pub max_ghz: f64,
    pub memory: Option<Memory>,
}

/// Unit of a memory quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoryUnit {
    #[default]
    Unknown,
    Bit,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
}

impl MemoryUnit {
    /// Left shift that converts one unit of `self` into bits.
    ///
    /// Kilobyte and up are binary multiples: 1 KB = 2^10 bytes = 2^13 bits.
    /// Returns `None` for `Unknown`, which has no meaningful size.
    fn bit_shift(self) -> Option<u32> {
        match self {
            MemoryUnit::Unknown => None,
            MemoryUnit::Bit => Some(0),
            MemoryUnit::Byte => Some(3),
            MemoryUnit::Kilobyte => Some(13),
            MemoryUnit::Megabyte => Some(23),
            MemoryUnit::Gigabyte => Some(33),
            MemoryUnit::Terabyte => Some(43),
        }
    }
}

/// A memory quantity (RAM, VRAM, or storage capacity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Memory {
    pub value: u64,
    pub unit: MemoryUnit,
}

impl Memory {
    pub fn new(value: u64, unit: MemoryUnit) -> Self {
        Self { value, unit }
    }

    /// Normalize to a bit count so quantities in different units compare.
    ///
    /// Saturates at `u64::MAX` instead of wrapping; an unknown unit is 0 bits.
    pub fn to_bits(&self) -> u64 {
        match self.unit.bit_shift() {
            Some(shift) => self.value.saturating_mul(1u64 << shift),
            None => 0,
        }
    }
}

/// Kind of persistent storage drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageDriver {
    #[default]
    Unknown,
    Hdd,
    Ssd,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Storage {
    pub driver: StorageDriver,
    pub memory: Option<Memory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenPanel {
    #[default]
    Unknown,
    Ips,
    Oled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenResolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Screen {
    pub size_inch: f32,
    pub resolution: Option<ScreenResolution>,
    pub panel: ScreenPanel,
    pub multitouch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[default]
    Unknown,
    Qwerty,
    Qwertz,
    Azerty,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyboard {
    pub layout: KeyboardLayout,
    pub backlit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_to_bits_units() {
        assert_eq!(Memory::new(1, MemoryUnit::Bit).to_bits(), 1);
        assert_eq!(Memory::new(1, MemoryUnit::Byte).to_bits(), 8);
        assert_eq!(Memory::new(1, MemoryUnit::Kilobyte).to_bits(), 8 * 1024);
        assert_eq!(Memory::new(2, MemoryUnit::Megabyte).to_bits(), 2 * 8 * 1024 * 1024);
        assert_eq!(
            Memory::new(1, MemoryUnit::Gigabyte).to_bits(),
            Memory::new(1024, MemoryUnit::Megabyte).to_bits()
        );
        assert_eq!(
            Memory::new(1, MemoryUnit::Terabyte).to_bits(),
            Memory::new(1024, MemoryUnit::Gigabyte).to_bits()
        );
    }

    #[test]
    fn test_memory_unknown_unit_is_zero() {
        assert_eq!(Memory::new(64, MemoryUnit::Unknown).to_bits(), 0);
    }

    #[test]
    fn test_memory_to_bits_saturates() {
        assert_eq!(Memory::new(u64::MAX, MemoryUnit::Terabyte).to_bits(), u64::MAX);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Laptop {
            id: "a".to_string(),
            gpus: vec![Gpu::default()],
            ..Default::default()
        };
        let mut copy = original.clone();
        copy.gpus[0].name = "changed".to_string();
        copy.id = "b".to_string();

        assert_eq!(original.id, "a");
        assert_eq!(original.gpus[0].name, "");
    }
}
