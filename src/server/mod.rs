//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en `host:port`
//! 2. Acepta conexiones en un thread dedicado
//! 3. Atiende cada conexión en su propio thread (un request por conexión)
//! 4. Se detiene de forma cooperativa con `stop()`

pub mod tcp;

pub use tcp::{Server, ServerState};
