//! # Configuración del Servidor
//! src/config.rs
//!
//! Dos niveles de configuración:
//!
//! - [`Config`]: lo que llega por CLI o variables de entorno, tal cual.
//! - [`ServerConfig`]: la versión validada e inmutable que recibe el
//!   servidor (raíz canonicalizada, puerto ya resuelto).
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server ./public --port 8080 --timeout-ms 10000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! STATIC_ROOT=./public HTTP_PORT=8080 ./static_server
//! ```
//!
//! Sin `--port` (o con `--port 0`) se usa un puerto efímero.

use crate::error::ServerError;
use crate::port;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Host por defecto (solo loopback)
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Timeout por defecto de lectura/escritura de cada conexión
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Configuración de línea de comandos
#[derive(Debug, Clone, Parser, Serialize)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP de archivos estáticos para un único directorio")]
#[command(version)]
pub struct Config {
    /// Directorio raíz a servir
    #[arg(default_value = ".", env = "STATIC_ROOT")]
    pub root: PathBuf,

    /// Puerto en el que escucha (0 o ausente = efímero)
    #[arg(short, long, env = "HTTP_PORT")]
    pub port: Option<u16>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = DEFAULT_HOST, env = "HTTP_HOST")]
    pub host: String,

    /// Timeout de lectura/escritura por conexión en milisegundos
    #[arg(long = "timeout-ms", default_value_t = DEFAULT_TIMEOUT_MS, env = "CONNECTION_TIMEOUT_MS")]
    pub timeout_ms: u64,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Valida los valores que clap no puede validar por sí solo
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Connection timeout must be > 0".to_string());
        }
        Ok(())
    }

    /// Construye la configuración inmutable del servidor.
    ///
    /// Canonicaliza la raíz y, si no hay puerto explícito, reserva uno
    /// efímero.
    pub fn server_config(&self) -> Result<ServerConfig, ServerError> {
        self.validate().map_err(ServerError::InvalidConfig)?;

        let port = match self.port {
            Some(port) if port != 0 => port,
            _ => port::allocate_ephemeral_port().map_err(ServerError::PortAllocation)?,
        };

        Ok(ServerConfig::new(&self.root, port)?
            .with_host(&self.host)
            .with_timeout(Duration::from_millis(self.timeout_ms)))
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════╗");
        println!("║          Static File Server                  ║");
        println!("╚══════════════════════════════════════════════╝");
        println!();
        println!("   Root:      {}", self.root.display());
        println!("   Host:      {}", self.host);
        match self.port {
            Some(port) if port != 0 => println!("   Port:      {}", port),
            _ => println!("   Port:      (efímero)"),
        }
        println!("   Timeout:   {} ms", self.timeout_ms);
        println!();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            port: None,
            host: DEFAULT_HOST.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Configuración inmutable que recibe el servidor
///
/// La raíz siempre es absoluta y canonicalizada, así que los checks de
/// "está dentro de la raíz" pueden comparar prefijos directamente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    root: PathBuf,
    host: String,
    port: u16,
    timeout: Duration,
}

impl ServerConfig {
    /// Crea la configuración para servir `root` en `port`.
    ///
    /// Falla si la raíz no existe o no es un directorio. Con `port == 0` el
    /// sistema elige el puerto al hacer bind.
    pub fn new(root: impl AsRef<Path>, port: u16) -> Result<Self, ServerError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| ServerError::InvalidRoot {
            path: root.to_path_buf(),
            source,
        })?;

        if !canonical.is_dir() {
            return Err(ServerError::InvalidRoot {
                path: root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        Ok(Self {
            root: canonical,
            host: DEFAULT_HOST.to_string(),
            port,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        })
    }

    /// Igual que [`ServerConfig::new`] pero con un puerto efímero reservado
    pub fn with_ephemeral_port(root: impl AsRef<Path>) -> Result<Self, ServerError> {
        let port = port::allocate_ephemeral_port().map_err(ServerError::PortAllocation)?;
        Self::new(root, port)
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.port, None);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.timeout_ms, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing() {
        let config = Config::try_parse_from([
            "static_server",
            "/srv/www",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--timeout-ms",
            "250",
        ])
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/www"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn test_cli_rejects_out_of_range_port() {
        let result = Config::try_parse_from(["static_server", "--port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_timeout() {
        let mut config = Config::default();
        config.timeout_ms = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("timeout"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("Host"));
    }

    #[test]
    fn test_server_config_canonicalizes_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir(&nested).unwrap();

        let config = ServerConfig::new(nested.join(".."), 8080).unwrap();
        assert_eq!(config.root(), dir.path().canonicalize().unwrap());
        assert!(config.root().is_absolute());
        assert_eq!(config.address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_server_config_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::new(dir.path().join("no-existe"), 8080);
        assert!(matches!(result, Err(ServerError::InvalidRoot { .. })));
    }

    #[test]
    fn test_server_config_root_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"x").unwrap();

        let result = ServerConfig::new(&file, 8080);
        assert!(matches!(result, Err(ServerError::InvalidRoot { .. })));
    }

    #[test]
    fn test_server_config_from_cli_allocates_port() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            root: dir.path().to_path_buf(),
            port: None,
            host: "127.0.0.1".to_string(),
            timeout_ms: 1_000,
        };

        let server_config = config.server_config().unwrap();
        assert_ne!(server_config.port(), 0);
        assert_eq!(server_config.timeout(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_server_config_from_cli_keeps_explicit_port() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            root: dir.path().to_path_buf(),
            port: Some(4321),
            ..Config::default()
        };

        assert_eq!(config.server_config().unwrap().port(), 4321);
    }

    #[test]
    fn test_server_config_from_invalid_cli() {
        let config = Config {
            timeout_ms: 0,
            ..Config::default()
        };
        assert!(matches!(config.server_config(), Err(ServerError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_print_summary() {
        // No debe hacer panic
        Config::default().print_summary();
    }
}
