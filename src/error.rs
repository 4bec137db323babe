//! # Errores del Servidor
//! src/error.rs
//!
//! Tres familias de errores, según hasta dónde se propagan:
//!
//! - [`ServerError`]: errores de arranque y configuración. Son los únicos que
//!   llegan a quien llama a `Server::start`.
//! - [`ServeError`]: fallos al resolver o abrir un archivo. Se quedan dentro
//!   del procesador y se convierten en un código de estado.
//! - [`ConnectionError`]: fallos de transporte o de parsing. Se quedan dentro
//!   del thread de la conexión y solo se registran en el log.

use crate::http::request::ParseError;
use crate::http::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores fatales para el arranque del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo hacer bind del puerto configurado
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// El directorio raíz no existe o no se puede canonicalizar
    #[error("root directory {path} is not usable: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// El sistema operativo no entregó un puerto efímero
    #[error("could not allocate an ephemeral port: {0}")]
    PortAllocation(#[source] io::Error),

    /// `start()` llamado sin haber detenido el ciclo anterior
    #[error("server is already running")]
    AlreadyRunning,

    /// No se pudo crear el thread del accept loop
    #[error("failed to spawn accept thread: {0}")]
    Spawn(#[source] io::Error),

    /// Valores de configuración inválidos
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Fallos al resolver o abrir el archivo pedido
#[derive(Debug, Error)]
pub enum ServeError {
    /// El path no corresponde a un archivo regular existente
    #[error("file not found: {0}")]
    NotFound(String),

    /// El path resuelto cae fuera del directorio raíz
    #[error("path escapes root directory: {0}")]
    OutsideRoot(String),

    /// Error de I/O sobre un archivo que sí existe
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// Código HTTP que ve el cliente para este error
    ///
    /// Un intento de salir de la raíz se reporta como 404, igual que un
    /// archivo inexistente.
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound(_) | ServeError::OutsideRoot(_) => StatusCode::NotFound,
            ServeError::Io { .. } => StatusCode::InternalServerError,
        }
    }
}

/// Fallos aislados a una sola conexión
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed request: {0}")]
    Parse(#[from] ParseError),
}
