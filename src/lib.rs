//! # Static File Server
//! src/lib.rs
//!
//! Servidor HTTP que sirve archivos de un único directorio raíz.
//!
//! ## Arquitectura
//!
//! - `mime`: tabla extensión → `Content-Type`
//! - `port`: reserva de un puerto efímero
//! - `http`: parsing de requests, status codes y construcción de responses
//! - `processor`: path → archivo, índices, protección contra traversal
//! - `server`: listener, accept loop y ciclo de vida (start/stop/dispose)
//! - `metrics`: contadores de requests y bytes enviados
//! - `config`: configuración CLI y configuración inmutable del servidor
//! - `error`: tipos de error
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::ServerConfig;
//! use static_server::server::Server;
//!
//! let config = ServerConfig::with_ephemeral_port("./public").unwrap();
//! let mut server = Server::new(config);
//! let addr = server.start().expect("Error al iniciar servidor");
//! println!("Sirviendo en http://{}/", addr);
//! server.stop();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod mime;
pub mod port;
pub mod processor;
pub mod server;
