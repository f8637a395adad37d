// crates/laptop-cli/src/commands/mod.rs
//
// Command module declarations and the connection options they share.

pub mod create;
pub mod login;
pub mod rate;
pub mod search;
pub mod upload;

use clap::Args;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Identity};

use laptop_core::laptop::{Memory, MemoryUnit};
use laptop_rpc::client::connect;
use laptop_rpc::{AuthClient, LaptopClient, TokenInterceptor};

/// How to reach and authenticate with the daemon.
#[derive(Debug, Args)]
pub struct ConnectOpts {
    /// RPC endpoint for laptopd.
    #[arg(long, global = true, default_value = "http://localhost:8080")]
    pub rpc: String,

    /// Username to log in with. Calls are anonymous without it.
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for `--username`.
    #[arg(long, global = true, default_value = "")]
    pub password: String,

    /// Connect over mutual TLS.
    #[arg(long, global = true)]
    pub tls: bool,

    /// PEM certificate of the CA that signed the server certificate.
    #[arg(long, global = true, default_value = "cert/ca-cert.pem")]
    pub ca_cert: String,

    /// PEM client certificate presented to the server.
    #[arg(long, global = true, default_value = "cert/client-cert.pem")]
    pub client_cert: String,

    /// PEM private key matching `--client-cert`.
    #[arg(long, global = true, default_value = "cert/client-key.pem")]
    pub client_key: String,
}

impl ConnectOpts {
    fn tls_config(&self) -> Result<Option<ClientTlsConfig>, std::io::Error> {
        if !self.tls {
            return Ok(None);
        }
        let ca = std::fs::read(&self.ca_cert)?;
        let cert = std::fs::read(&self.client_cert)?;
        let key = std::fs::read(&self.client_key)?;

        Ok(Some(
            ClientTlsConfig::new()
                .ca_certificate(Certificate::from_pem(ca))
                .identity(Identity::from_pem(cert, key)),
        ))
    }

    /// Open a channel to the daemon.
    pub async fn channel(&self) -> Result<Channel, Box<dyn std::error::Error>> {
        let channel = connect(&self.rpc, self.tls_config()?).await?;
        Ok(channel)
    }

    /// Open a catalog client, logged in when `--username` is set.
    pub async fn laptop_client(&self) -> Result<LaptopClient, Box<dyn std::error::Error>> {
        let channel = self.channel().await?;
        let interceptor = TokenInterceptor::new();
        if let Some(username) = &self.username {
            let mut auth = AuthClient::new(channel.clone(), username.as_str(), self.password.as_str());
            interceptor.set_token(auth.login().await?);
        }
        Ok(LaptopClient::new(channel, interceptor))
    }
}

/// Parse a memory quantity such as `16GB`, `512 MB`, or `8192`.
///
/// A bare number is read as gigabytes.
pub fn parse_memory(s: &str) -> Result<Memory, String> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid memory size: {:?}", s))?;
    let unit = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "G" | "GB" => MemoryUnit::Gigabyte,
        "BIT" => MemoryUnit::Bit,
        "B" => MemoryUnit::Byte,
        "K" | "KB" => MemoryUnit::Kilobyte,
        "M" | "MB" => MemoryUnit::Megabyte,
        "T" | "TB" => MemoryUnit::Terabyte,
        other => return Err(format!("unknown memory unit: {:?}", other)),
    };
    Ok(Memory::new(value, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_units() {
        assert_eq!(parse_memory("16GB").unwrap(), Memory::new(16, MemoryUnit::Gigabyte));
        assert_eq!(parse_memory("512 mb").unwrap(), Memory::new(512, MemoryUnit::Megabyte));
        assert_eq!(parse_memory("2T").unwrap(), Memory::new(2, MemoryUnit::Terabyte));
        assert_eq!(parse_memory("8").unwrap(), Memory::new(8, MemoryUnit::Gigabyte));
    }

    #[test]
    fn test_parse_memory_rejects_garbage() {
        assert!(parse_memory("GB").is_err());
        assert!(parse_memory("16 parsecs").is_err());
    }
}
