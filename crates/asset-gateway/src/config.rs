//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory backing the filesystem store; `None` selects the
    /// in-memory store (development/testing, data does not persist)
    pub data_dir: Option<PathBuf>,
    /// Container uploads are stored in
    pub container: String,
    /// Maximum accepted multipart boundary length
    pub max_boundary_len: usize,
    /// Maximum header-section size per multipart part (bytes)
    pub max_part_header_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: None,
            container: "digitalAssets".to_string(),
            max_boundary_len: 128,
            max_part_header_bytes: 16 * 1024,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
