// crates/laptop-cli/src/commands/create.rs
//
// `laptop create`: create a laptop from command-line fields.

use clap::Args;

use laptop_core::laptop::{Cpu, Memory};
use laptop_core::Laptop;

use super::{parse_memory, ConnectOpts};

/// Laptop fields for the create command.
#[derive(Debug, Args)]
pub struct CreateCmd {
    /// Laptop UUID. The server assigns one when omitted.
    #[arg(long, default_value = "")]
    pub id: String,

    #[arg(long)]
    pub brand: String,

    #[arg(long)]
    pub name: String,

    /// Number of CPU cores.
    #[arg(long, default_value = "4")]
    pub cores: u32,

    /// CPU base frequency in GHz.
    #[arg(long, default_value = "2.0")]
    pub ghz: f64,

    /// RAM size, e.g. `16GB`.
    #[arg(long, value_parser = parse_memory)]
    pub ram: Option<Memory>,

    #[arg(long, default_value = "0")]
    pub price: f64,

    #[arg(long, default_value = "0")]
    pub year: u32,

    #[arg(long, default_value = "0")]
    pub weight: f64,
}

impl CreateCmd {
    fn to_laptop(&self) -> Laptop {
        Laptop {
            id: self.id.clone(),
            brand: self.brand.clone(),
            name: self.name.clone(),
            cpu: Some(Cpu {
                number_cores: self.cores,
                number_threads: self.cores,
                min_ghz: self.ghz,
                max_ghz: self.ghz,
                ..Default::default()
            }),
            ram: self.ram,
            weight_kg: self.weight,
            price_usd: self.price,
            release_year: self.year,
            ..Default::default()
        }
    }
}

/// Run the create command.
pub async fn run(opts: &ConnectOpts, cmd: &CreateCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = opts.laptop_client().await?;
    match client.create_laptop(cmd.to_laptop()).await? {
        Some(id) => println!("Created laptop {}", id),
        None => println!("Laptop {} already exists", cmd.id),
    }
    Ok(())
}
