// crates/laptop-cli/src/commands/search.rs
//
// `laptop search`: stream laptops matching a filter.

use clap::Args;

use laptop_core::laptop::Memory;
use laptop_core::Filter;

use super::{parse_memory, ConnectOpts};
use crate::output::{format_json, format_table, LaptopRow, OutputFormat};

/// Filter for the search command. Omitted fields do not constrain.
#[derive(Debug, Args)]
pub struct SearchCmd {
    /// Maximum price in USD. No ceiling when omitted.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum number of CPU cores.
    #[arg(long, default_value = "0")]
    pub min_cores: u32,

    /// Minimum CPU base frequency in GHz.
    #[arg(long, default_value = "0")]
    pub min_ghz: f64,

    /// Minimum RAM, e.g. `8GB`.
    #[arg(long, value_parser = parse_memory)]
    pub min_ram: Option<Memory>,
}

impl SearchCmd {
    fn filter(&self) -> Filter {
        Filter {
            max_price_usd: self.max_price.unwrap_or(f64::MAX),
            min_cpu_cores: self.min_cores,
            min_cpu_ghz: self.min_ghz,
            min_ram: self.min_ram,
        }
    }
}

/// Run the search command.
pub async fn run(
    opts: &ConnectOpts,
    cmd: &SearchCmd,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = opts.laptop_client().await?;
    let laptops = client.search_laptop(cmd.filter()).await?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&laptops)),
        OutputFormat::Table => {
            if laptops.is_empty() {
                println!("No laptops found.");
            } else {
                let rows: Vec<LaptopRow> = laptops.iter().map(LaptopRow::from).collect();
                println!("{}", format_table(&rows));
            }
        }
    }
    Ok(())
}
