//! # Construcción de Respuestas HTTP
//!
//! Una respuesta es status + headers + body. El body puede ser un archivo
//! abierto: en ese caso no se carga en memoria, se copia al socket en
//! bloques de [`CHUNK_SIZE`] bytes.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 12\r\n
//! \r\n
//! hello world!
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_server::http::{Response, StatusCode};
//!
//! let response = Response::empty(StatusCode::NotFound)
//!     .with_header("Connection", "close");
//!
//! let mut out = Vec::new();
//! response.write_to(&mut out).unwrap();
//! assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
//! ```

use super::StatusCode;
use std::fs::File;
use std::io::{self, Read, Write};

/// Tamaño de cada bloque al copiar un archivo al socket (16 KiB)
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum Body {
    Empty,
    /// Archivo abierto y su tamaño anunciado en `Content-Length`
    File { file: File, len: u64 },
}

impl Body {
    /// Bytes que ocupará el body en el socket
    pub fn len(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Respuesta HTTP completa
#[derive(Debug)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de inserción (sin duplicados, ver `add_header`)
    headers: Vec<(String, String)>,

    body: Body,
}

impl Response {
    /// Respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Respuesta de error: body vacío con `Content-Length: 0`
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status).with_header("Content-Length", "0")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header; si ya existe (sin distinguir mayúsculas) se
    /// sobrescribe su valor.
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Body respaldado por un archivo abierto de `len` bytes
    pub fn with_file(mut self, file: File, len: u64) -> Self {
        self.add_header("Content-Length", &len.to_string());
        self.body = Body::File { file, len };
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Busca un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Status line y headers, terminados en la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Escribe la respuesta completa y retorna los bytes de body enviados.
    ///
    /// Un archivo se copia en bloques de [`CHUNK_SIZE`] hasta EOF, sin pasar
    /// nunca del tamaño anunciado. Si falla a mitad de camino el cliente se
    /// queda con una respuesta parcial; no hay reintento.
    pub fn write_to<W: Write>(self, out: &mut W) -> io::Result<u64> {
        out.write_all(&self.head_bytes())?;

        let sent = match self.body {
            Body::Empty => 0,
            Body::File { file, len } => copy_chunked(&mut file.take(len), out)?,
        };

        out.flush()?;
        Ok(sent)
    }
}

fn copy_chunked<R: Read, W: Write>(input: &mut R, out: &mut W) -> io::Result<u64> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&buffer[..n])?;
        total += n as u64;
    }

    Ok(total)
}
