//! # Módulo HTTP
//!
//! Lo mínimo del protocolo que necesita un servidor de archivos:
//!
//! - Parsing de la cabecera de un request HTTP/1.0 o HTTP/1.1
//! - Códigos de estado (200, 400, 404, 500)
//! - Construcción de responses con body en memoria o respaldado por archivo
//! - Fechas en formato RFC1123 para `Date` y `Last-Modified`
//!
//! Cada conexión atiende un único request y se cierra (`Connection: close`),
//! así que no hay keep-alive ni chunked transfer encoding.

pub mod request;
pub mod response;
pub mod status;

pub use request::Request;
pub use response::{Body, Response};
pub use status::StatusCode;

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Formatea un instante como fecha HTTP (RFC1123, siempre en GMT)
///
/// # Ejemplo
/// ```
/// use static_server::http::http_date;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_secs(784111777);
/// assert_eq!(http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn http_date(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
