// crates/laptop-daemon/src/config.rs
//
// Runtime configuration for the laptop catalog daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

/// A user created at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl UserSeed {
    fn new(username: &str, password: &str, role: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }
}

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Serve over mutual TLS.
    #[serde(default)]
    pub enable_tls: bool,

    /// PEM certificate presented by the server.
    #[serde(default = "default_server_cert_file")]
    pub server_cert_file: String,

    /// PEM private key matching `server_cert_file`.
    #[serde(default = "default_server_key_file")]
    pub server_key_file: String,

    /// PEM certificate of the CA that signs client certificates.
    #[serde(default = "default_client_ca_file")]
    pub client_ca_file: String,

    /// Shared secret used to sign access tokens.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Lifetime of an access token, in seconds.
    #[serde(default = "default_token_duration_secs")]
    pub token_duration_secs: u64,

    /// Directory uploaded images are written to.
    #[serde(default = "default_image_folder")]
    pub image_folder: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Users to create at startup.
    #[serde(default = "default_users")]
    pub users: Vec<UserSeed>,
}

fn default_rpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    8080
}

fn default_server_cert_file() -> String {
    "cert/server-cert.pem".to_string()
}

fn default_server_key_file() -> String {
    "cert/server-key.pem".to_string()
}

fn default_client_ca_file() -> String {
    "cert/ca-cert.pem".to_string()
}

fn default_secret_key() -> String {
    "secret".to_string()
}

fn default_token_duration_secs() -> u64 {
    15 * 60
}

fn default_image_folder() -> String {
    "tmp/uploaded-img".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_users() -> Vec<UserSeed> {
    vec![
        UserSeed::new("jay", "secret-jay", "admin"),
        UserSeed::new("kay", "secret-kay", "role1"),
        UserSeed::new("rob", "secret-rob", "role2"),
    ]
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            enable_tls: false,
            server_cert_file: default_server_cert_file(),
            server_key_file: default_server_key_file(),
            client_ca_file: default_client_ca_file(),
            secret_key: default_secret_key(),
            token_duration_secs: default_token_duration_secs(),
            image_folder: default_image_folder(),
            log_level: default_log_level(),
            users: default_users(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: DaemonConfig = toml::from_str("").unwrap();
        let defaults = DaemonConfig::default();

        assert_eq!(config.rpc_host, defaults.rpc_host);
        assert_eq!(config.rpc_port, 8080);
        assert!(!config.enable_tls);
        assert_eq!(config.token_duration_secs, 900);
        assert_eq!(config.image_folder, "tmp/uploaded-img");
        assert_eq!(config.users.len(), 3);
    }

    #[test]
    fn test_partial_file_overrides() {
        let config: DaemonConfig = toml::from_str(
            r#"
            rpc_port = 9090
            enable_tls = true
            secret_key = "hunter2"

            [[users]]
            username = "alice"
            password = "pw"
            role = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc_port, 9090);
        assert!(config.enable_tls);
        assert_eq!(config.secret_key, "hunter2");
        assert_eq!(config.users, vec![UserSeed::new("alice", "pw", "admin")]);
        assert_eq!(config.server_cert_file, "cert/server-cert.pem");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(DaemonConfig::load("/nonexistent/laptopd.toml").is_err());
    }
}
