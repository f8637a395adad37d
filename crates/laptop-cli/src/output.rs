// crates/laptop-cli/src/output.rs
//
// Output formatting utilities for the laptop CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use laptop_core::Laptop;
use laptop_rpc::proto::RateLaptopResponse;

/// Output format for CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// One laptop per table row.
#[derive(Debug, Tabled)]
pub struct LaptopRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Cores")]
    pub cores: u32,
    #[tabled(rename = "GHz")]
    pub ghz: String,
    #[tabled(rename = "RAM")]
    pub ram: String,
    #[tabled(rename = "Price (USD)")]
    pub price: String,
}

impl From<&Laptop> for LaptopRow {
    fn from(laptop: &Laptop) -> Self {
        let (cores, ghz) = laptop
            .cpu
            .as_ref()
            .map(|cpu| (cpu.number_cores, format!("{:.1}", cpu.min_ghz)))
            .unwrap_or((0, "-".to_string()));
        let ram = laptop
            .ram
            .map(|ram| format!("{} {:?}", ram.value, ram.unit))
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: laptop.id.clone(),
            brand: laptop.brand.clone(),
            name: laptop.name.clone(),
            cores,
            ghz,
            ram,
            price: format!("{:.2}", laptop.price_usd),
        }
    }
}

/// One rating aggregate per table row, also the JSON shape.
#[derive(Debug, Serialize, Tabled)]
pub struct RatingRow {
    #[tabled(rename = "Laptop ID")]
    pub laptop_id: String,
    #[tabled(rename = "Rated")]
    pub rated_count: u32,
    #[tabled(rename = "Average")]
    pub average_score: f64,
}

impl From<&RateLaptopResponse> for RatingRow {
    fn from(response: &RateLaptopResponse) -> Self {
        Self {
            laptop_id: response.laptop_id.clone(),
            rated_count: response.rated_count,
            average_score: response.average_score,
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use laptop_core::laptop::{Cpu, Memory, MemoryUnit};

    use super::*;

    #[test]
    fn test_laptop_row_fills_missing_parts() {
        let row = LaptopRow::from(&Laptop {
            id: "abc".to_string(),
            price_usd: 999.5,
            ..Default::default()
        });
        assert_eq!(row.cores, 0);
        assert_eq!(row.ghz, "-");
        assert_eq!(row.ram, "-");
        assert_eq!(row.price, "999.50");
    }

    #[test]
    fn test_table_lists_every_laptop() {
        let laptops = vec![
            Laptop {
                id: "first".to_string(),
                brand: "Dell".to_string(),
                cpu: Some(Cpu {
                    number_cores: 8,
                    min_ghz: 2.5,
                    ..Default::default()
                }),
                ram: Some(Memory::new(16, MemoryUnit::Gigabyte)),
                ..Default::default()
            },
            Laptop {
                id: "second".to_string(),
                brand: "Lenovo".to_string(),
                ..Default::default()
            },
        ];
        let rows: Vec<LaptopRow> = laptops.iter().map(LaptopRow::from).collect();
        let table = format_table(&rows);

        assert!(table.contains("Price (USD)"));
        assert!(table.contains("first"));
        assert!(table.contains("Lenovo"));
        assert!(table.contains("16 Gigabyte"));
    }

    #[test]
    fn test_rating_json() {
        let row = RatingRow::from(&RateLaptopResponse {
            laptop_id: "abc".to_string(),
            rated_count: 2,
            average_score: 7.5,
        });
        let json: serde_json::Value = serde_json::from_str(&format_json(&row)).unwrap();
        assert_eq!(json["laptop_id"], "abc");
        assert_eq!(json["rated_count"], 2);
        assert_eq!(json["average_score"], 7.5);
    }
}
