// crates/laptop-rpc/src/convert.rs
//
// Conversions between the wire messages in `proto` and the domain types in
// laptop-core. Unknown enum values on the wire decode to the `Unknown`
// variant rather than failing the call.

use chrono::{DateTime, Utc};

use laptop_core::laptop::{
    Cpu, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Screen, ScreenPanel,
    ScreenResolution, Storage, StorageDriver,
};
use laptop_core::Filter;

use crate::proto;

// ---------------------------------------------------------------------------
// Laptop
// ---------------------------------------------------------------------------

impl From<proto::Laptop> for Laptop {
    fn from(laptop: proto::Laptop) -> Self {
        Self {
            id: laptop.id,
            brand: laptop.brand,
            name: laptop.name,
            cpu: laptop.cpu.map(Into::into),
            ram: laptop.ram.map(Into::into),
            gpus: laptop.gpus.into_iter().map(Into::into).collect(),
            storages: laptop.storages.into_iter().map(Into::into).collect(),
            screen: laptop.screen.map(Into::into),
            keyboard: laptop.keyboard.map(Into::into),
            weight_kg: laptop.weight_kg,
            price_usd: laptop.price_usd,
            release_year: laptop.release_year,
            updated_at: laptop.updated_at.and_then(timestamp_to_datetime),
        }
    }
}

impl From<Laptop> for proto::Laptop {
    fn from(laptop: Laptop) -> Self {
        Self {
            id: laptop.id,
            brand: laptop.brand,
            name: laptop.name,
            cpu: laptop.cpu.map(Into::into),
            ram: laptop.ram.map(Into::into),
            gpus: laptop.gpus.into_iter().map(Into::into).collect(),
            storages: laptop.storages.into_iter().map(Into::into).collect(),
            screen: laptop.screen.map(Into::into),
            keyboard: laptop.keyboard.map(Into::into),
            weight_kg: laptop.weight_kg,
            price_usd: laptop.price_usd,
            release_year: laptop.release_year,
            updated_at: laptop.updated_at.map(datetime_to_timestamp),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

impl From<proto::Cpu> for Cpu {
    fn from(cpu: proto::Cpu) -> Self {
        Self {
            brand: cpu.brand,
            name: cpu.name,
            number_cores: cpu.number_cores,
            number_threads: cpu.number_threads,
            min_ghz: cpu.min_ghz,
            max_ghz: cpu.max_ghz,
        }
    }
}

impl From<Cpu> for proto::Cpu {
    fn from(cpu: Cpu) -> Self {
        Self {
            brand: cpu.brand,
            name: cpu.name,
            number_cores: cpu.number_cores,
            number_threads: cpu.number_threads,
            min_ghz: cpu.min_ghz,
            max_ghz: cpu.max_ghz,
        }
    }
}

impl From<proto::Gpu> for Gpu {
    fn from(gpu: proto::Gpu) -> Self {
        Self {
            brand: gpu.brand,
            name: gpu.name,
            min_ghz: gpu.min_ghz,
            max_ghz: gpu.max_ghz,
            memory: gpu.memory.map(Into::into),
        }
    }
}

impl From<Gpu> for proto::Gpu {
    fn from(gpu: Gpu) -> Self {
        Self {
            brand: gpu.brand,
            name: gpu.name,
            min_ghz: gpu.min_ghz,
            max_ghz: gpu.max_ghz,
            memory: gpu.memory.map(Into::into),
        }
    }
}

impl From<proto::Memory> for Memory {
    fn from(memory: proto::Memory) -> Self {
        let unit = match memory.unit() {
            proto::memory::Unit::Unknown => MemoryUnit::Unknown,
            proto::memory::Unit::Bit => MemoryUnit::Bit,
            proto::memory::Unit::Byte => MemoryUnit::Byte,
            proto::memory::Unit::Kilobyte => MemoryUnit::Kilobyte,
            proto::memory::Unit::Megabyte => MemoryUnit::Megabyte,
            proto::memory::Unit::Gigabyte => MemoryUnit::Gigabyte,
            proto::memory::Unit::Terabyte => MemoryUnit::Terabyte,
        };
        Memory::new(memory.value, unit)
    }
}

impl From<Memory> for proto::Memory {
    fn from(memory: Memory) -> Self {
        let unit = match memory.unit {
            MemoryUnit::Unknown => proto::memory::Unit::Unknown,
            MemoryUnit::Bit => proto::memory::Unit::Bit,
            MemoryUnit::Byte => proto::memory::Unit::Byte,
            MemoryUnit::Kilobyte => proto::memory::Unit::Kilobyte,
            MemoryUnit::Megabyte => proto::memory::Unit::Megabyte,
            MemoryUnit::Gigabyte => proto::memory::Unit::Gigabyte,
            MemoryUnit::Terabyte => proto::memory::Unit::Terabyte,
        };
        Self {
            value: memory.value,
            unit: unit as i32,
        }
    }
}

impl From<proto::Storage> for Storage {
    fn from(storage: proto::Storage) -> Self {
        let driver = match storage.driver() {
            proto::storage::Driver::Unknown => StorageDriver::Unknown,
            proto::storage::Driver::Hdd => StorageDriver::Hdd,
            proto::storage::Driver::Ssd => StorageDriver::Ssd,
        };
        Self {
            driver,
            memory: storage.memory.map(Into::into),
        }
    }
}

impl From<Storage> for proto::Storage {
    fn from(storage: Storage) -> Self {
        let driver = match storage.driver {
            StorageDriver::Unknown => proto::storage::Driver::Unknown,
            StorageDriver::Hdd => proto::storage::Driver::Hdd,
            StorageDriver::Ssd => proto::storage::Driver::Ssd,
        };
        Self {
            driver: driver as i32,
            memory: storage.memory.map(Into::into),
        }
    }
}

impl From<proto::Screen> for Screen {
    fn from(screen: proto::Screen) -> Self {
        let panel = match screen.panel() {
            proto::screen::Panel::Unknown => ScreenPanel::Unknown,
            proto::screen::Panel::Ips => ScreenPanel::Ips,
            proto::screen::Panel::Oled => ScreenPanel::Oled,
        };
        Self {
            size_inch: screen.size_inch,
            resolution: screen.resolution.map(|r| ScreenResolution {
                width: r.width,
                height: r.height,
            }),
            panel,
            multitouch: screen.multitouch,
        }
    }
}

impl From<Screen> for proto::Screen {
    fn from(screen: Screen) -> Self {
        let panel = match screen.panel {
            ScreenPanel::Unknown => proto::screen::Panel::Unknown,
            ScreenPanel::Ips => proto::screen::Panel::Ips,
            ScreenPanel::Oled => proto::screen::Panel::Oled,
        };
        Self {
            size_inch: screen.size_inch,
            resolution: screen.resolution.map(|r| proto::screen::Resolution {
                width: r.width,
                height: r.height,
            }),
            panel: panel as i32,
            multitouch: screen.multitouch,
        }
    }
}

impl From<proto::Keyboard> for Keyboard {
    fn from(keyboard: proto::Keyboard) -> Self {
        let layout = match keyboard.layout() {
            proto::keyboard::Layout::Unknown => KeyboardLayout::Unknown,
            proto::keyboard::Layout::Qwerty => KeyboardLayout::Qwerty,
            proto::keyboard::Layout::Qwertz => KeyboardLayout::Qwertz,
            proto::keyboard::Layout::Azerty => KeyboardLayout::Azerty,
        };
        Self {
            layout,
            backlit: keyboard.backlit,
        }
    }
}

impl From<Keyboard> for proto::Keyboard {
    fn from(keyboard: Keyboard) -> Self {
        let layout = match keyboard.layout {
            KeyboardLayout::Unknown => proto::keyboard::Layout::Unknown,
            KeyboardLayout::Qwerty => proto::keyboard::Layout::Qwerty,
            KeyboardLayout::Qwertz => proto::keyboard::Layout::Qwertz,
            KeyboardLayout::Azerty => proto::keyboard::Layout::Azerty,
        };
        Self {
            layout: layout as i32,
            backlit: keyboard.backlit,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

impl From<proto::Filter> for Filter {
    fn from(filter: proto::Filter) -> Self {
        Self {
            max_price_usd: filter.max_price_usd,
            min_cpu_cores: filter.min_cpu_cores,
            min_cpu_ghz: filter.min_cpu_ghz,
            min_ram: filter.min_ram.map(Into::into),
        }
    }
}

impl From<Filter> for proto::Filter {
    fn from(filter: Filter) -> Self {
        Self {
            max_price_usd: filter.max_price_usd,
            min_cpu_cores: filter.min_cpu_cores,
            min_cpu_ghz: filter.min_cpu_ghz,
            min_ram: filter.min_ram.map(Into::into),
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Out-of-range timestamps decode to `None`.
pub fn timestamp_to_datetime(ts: proto::Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    DateTime::from_timestamp(ts.seconds, nanos)
}

pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> proto::Timestamp {
    proto::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_laptop() -> Laptop {
        Laptop {
            id: "2b1f2c7e-2d0c-4c5a-9d0e-3e4b5b6a7c8d".to_string(),
            brand: "Lenovo".to_string(),
            name: "Thinkpad X1".to_string(),
            cpu: Some(Cpu {
                brand: "Intel".to_string(),
                name: "Core i7-9750H".to_string(),
                number_cores: 6,
                number_threads: 12,
                min_ghz: 2.6,
                max_ghz: 4.5,
            }),
            ram: Some(Memory::new(16, MemoryUnit::Gigabyte)),
            gpus: vec![Gpu {
                brand: "NVIDIA".to_string(),
                name: "RTX 2060".to_string(),
                min_ghz: 1.0,
                max_ghz: 1.5,
                memory: Some(Memory::new(4, MemoryUnit::Gigabyte)),
            }],
            storages: vec![
                Storage {
                    driver: StorageDriver::Ssd,
                    memory: Some(Memory::new(512, MemoryUnit::Gigabyte)),
                },
                Storage {
                    driver: StorageDriver::Hdd,
                    memory: Some(Memory::new(1, MemoryUnit::Terabyte)),
                },
            ],
            screen: Some(Screen {
                size_inch: 14.0,
                resolution: Some(ScreenResolution {
                    width: 1920,
                    height: 1080,
                }),
                panel: ScreenPanel::Oled,
                multitouch: true,
            }),
            keyboard: Some(Keyboard {
                layout: KeyboardLayout::Qwertz,
                backlit: true,
            }),
            weight_kg: 1.3,
            price_usd: 2499.0,
            release_year: 2020,
            updated_at: DateTime::from_timestamp(1_600_000_000, 123_456_789),
        }
    }

    #[test]
    fn test_laptop_survives_wire_conversion() {
        let laptop = full_laptop();
        let wire: proto::Laptop = laptop.clone().into();
        assert_eq!(wire.storages[0].driver, proto::storage::Driver::Ssd as i32);
        assert_eq!(wire.keyboard.unwrap().layout, proto::keyboard::Layout::Qwertz as i32);

        assert_eq!(Laptop::from(wire), laptop);
    }

    #[test]
    fn test_unknown_enum_value_decodes_as_unknown() {
        let memory = proto::Memory {
            value: 8,
            unit: 42,
        };
        assert_eq!(Memory::from(memory), Memory::new(8, MemoryUnit::Unknown));
    }

    #[test]
    fn test_invalid_timestamp_is_dropped() {
        let ts = proto::Timestamp {
            seconds: 0,
            nanos: -1,
        };
        assert_eq!(timestamp_to_datetime(ts), None);
    }
}
