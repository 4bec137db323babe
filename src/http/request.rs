//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Parser mínimo de la cabecera de un request HTTP/1.0 o HTTP/1.1.
//!
//! ## Formato
//!
//! ```text
//! GET /docs/guia%20rapida.html?v=2 HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! El método se conserva tal cual pero el servidor no lo usa para decidir
//! nada: cualquier método se resuelve igual que un GET. El query string se
//! descarta y el path se entrega decodificado (`%20` → espacio).

use std::collections::HashMap;
use thiserror::Error;

/// Request HTTP parseado (solo la cabecera; el body se ignora)
#[derive(Debug, Clone)]
pub struct Request {
    /// Método tal como vino (GET, POST, ...)
    method: String,

    /// Path decodificado, sin query string (ej: "/img/logo.png")
    path: String,

    /// Headers HTTP (ej: {"Host": "localhost:8080"})
    headers: HashMap<String, String>,

    /// "HTTP/1.0" o "HTTP/1.1"
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty request")]
    EmptyRequest,

    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Percent-encoding inválido o bytes que no son UTF-8
    #[error("Invalid request path: {0}")]
    InvalidPath(String),
}

impl Request {
    /// Parsea la cabecera de un request desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::Request;
    ///
    /// let raw = b"GET /img/logo%20grande.png?v=3 HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/img/logo grande.png");
    /// assert_eq!(request.header("host"), Some("x"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Lo que sigue a la línea vacía es body y puede ser binario
        let head = match buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            Some(pos) => &buffer[..pos + 2],
            None => buffer,
        };
        let request_str = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = request_str.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;

        let (method, path, version) = Self::parse_request_line(request_line)?;
        let headers = Self::parse_headers(lines)?;

        Ok(Request {
            method,
            path,
            headers,
            version,
        })
    }

    /// Formato: `METHOD TARGET VERSION`
    fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = parts[0];
        if !method.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        let path = Self::decode_target(parts[1])?;

        Ok((method.to_string(), path, version))
    }

    /// Quita el query string, el esquema y autoridad en la forma absoluta
    /// (`http://host/path`), y decodifica el resto.
    fn decode_target(target: &str) -> Result<String, ParseError> {
        let without_query = match target.find(['?', '#']) {
            Some(pos) => &target[..pos],
            None => target,
        };

        let path = match without_query
            .strip_prefix("http://")
            .or_else(|| without_query.strip_prefix("https://"))
        {
            Some(rest) => rest.find('/').map(|pos| &rest[pos..]).unwrap_or("/"),
            None => without_query,
        };

        urlencoding::decode(path)
            .map(|decoded| decoded.into_owned())
            .map_err(|_| ParseError::InvalidPath(path.to_string()))
    }

    /// Cada header tiene formato: "Name: Value". La línea vacía termina la
    /// cabecera.
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path decodificado, siempre sin query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Busca un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}
