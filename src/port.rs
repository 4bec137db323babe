//! # Asignación de Puerto Efímero
//! src/port.rs
//!
//! Cuando no se configura un puerto, se le pide uno libre al sistema
//! operativo haciendo bind al puerto 0 en loopback.
//!
//! Hay una ventana entre que el socket temporal se cierra y el servidor hace
//! su propio bind en la que otro proceso podría tomar el mismo puerto.

use std::io;
use std::net::{Ipv4Addr, TcpListener};

/// Retorna un puerto TCP libre asignado por el sistema operativo.
///
/// El socket temporal se libera antes de retornar.
pub fn allocate_ephemeral_port() -> io::Result<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);

    log::debug!("Puerto efímero asignado: {}", port);
    Ok(port)
}
