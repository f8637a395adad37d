// crates/laptop-daemon/src/tls.rs
//
// Mutual TLS for the server: the server presents its own certificate and
// requires clients to present one signed by the configured CA.

use std::path::PathBuf;

use thiserror::Error;
use tonic::transport::{Certificate, Identity, ServerTlsConfig};

use crate::config::DaemonConfig;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn read_pem(path: &str) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| TlsError::Read {
        path: PathBuf::from(path),
        source,
    })
}

/// Build the server TLS configuration from the certificate paths in `config`.
pub fn load_server_tls(config: &DaemonConfig) -> Result<ServerTlsConfig, TlsError> {
    let cert = read_pem(&config.server_cert_file)?;
    let key = read_pem(&config.server_key_file)?;
    let client_ca = read_pem(&config.client_ca_file)?;

    tracing::info!(
        cert = %config.server_cert_file,
        client_ca = %config.client_ca_file,
        "Loaded TLS credentials"
    );

    Ok(ServerTlsConfig::new()
        .identity(Identity::from_pem(cert, key))
        .client_ca_root(Certificate::from_pem(client_ca)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_certificate_names_the_file() {
        let config = DaemonConfig {
            server_cert_file: "/nonexistent/server-cert.pem".to_string(),
            ..Default::default()
        };

        let err = load_server_tls(&config).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/server-cert.pem"));
    }

    #[test]
    fn test_loads_pem_files() {
        let dir = std::env::temp_dir().join(format!("laptopd_tls_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = |name: &str| dir.join(name).to_string_lossy().to_string();
        for name in ["cert.pem", "key.pem", "ca.pem"] {
            std::fs::write(dir.join(name), b"-----BEGIN CERTIFICATE-----\n").unwrap();
        }

        let config = DaemonConfig {
            server_cert_file: path("cert.pem"),
            server_key_file: path("key.pem"),
            client_ca_file: path("ca.pem"),
            ..Default::default()
        };
        assert!(load_server_tls(&config).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
