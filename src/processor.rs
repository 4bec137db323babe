//! # Procesador de Requests
//! src/processor.rs
//!
//! Traduce un path HTTP a un archivo bajo la raíz y construye la respuesta.
//!
//! ```text
//! "/img/a.png" → resolve() → RequestContext → serve() → Response
//!                    │                            │
//!                    └─ 404 (no existe / fuera)   └─ 500 (falla open/metadata)
//! ```
//!
//! `resolve` y `serve` son públicas por separado porque entre la
//! comprobación de existencia y la apertura el archivo puede desaparecer;
//! ese caso termina en 500.

use crate::error::ServeError;
use crate::http::{http_date, Response, StatusCode};
use crate::mime;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Archivos índice, probados en este orden cuando se pide la raíz
pub const INDEX_FILES: [&str; 4] = ["index.html", "index.htm", "default.html", "default.htm"];

/// Valor del header `Server`
pub const SERVER_NAME: &str = "static_server";

/// Estado de un request entre la resolución y el envío
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Path tal como llegó (ya decodificado)
    pub requested: String,

    /// Archivo canonicalizado dentro de la raíz
    pub resolved: PathBuf,
}

/// Atiende un request completo: resuelve, abre y arma la respuesta.
///
/// Nunca falla: los errores se convierten en 404 o 500 con body vacío.
pub fn handle(request_path: &str, root: &Path) -> Response {
    let result = resolve(request_path, root).and_then(|ctx| serve(&ctx));

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            match &err {
                ServeError::Io { .. } => log::error!("{}", err),
                ServeError::OutsideRoot(_) => log::warn!("{}", err),
                ServeError::NotFound(_) => log::debug!("{}", err),
            }
            return error_response(err.status());
        }
    };

    with_common_headers(response)
}

/// Respuesta de error con body vacío y los headers comunes
pub fn error_response(status: StatusCode) -> Response {
    let response = Response::empty(status).with_header("Date", &http_date(SystemTime::now()));
    with_common_headers(response)
}

/// Resuelve `request_path` a un archivo regular dentro de `root`.
///
/// `root` se canonicaliza acá; si no existe todo es 404.
pub fn resolve(request_path: &str, root: &Path) -> Result<RequestContext, ServeError> {
    let root = root
        .canonicalize()
        .map_err(|_| ServeError::NotFound(request_path.to_string()))?;
    let root = root.as_path();

    let mut relative = request_path.strip_prefix('/').unwrap_or(request_path);

    if relative.is_empty() {
        if let Some(index) = INDEX_FILES.iter().find(|name| root.join(name).is_file()) {
            relative = *index;
        }
    }

    if relative.is_empty() {
        return Err(ServeError::NotFound(request_path.to_string()));
    }

    let mut candidate = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(name) => candidate.push(name),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ServeError::OutsideRoot(request_path.to_string()));
            }
        }
    }

    // Un symlink puede apuntar fuera de la raíz aunque el path no tenga ".."
    let canonical = match candidate.canonicalize() {
        Ok(path) => path,
        Err(_) => return Err(ServeError::NotFound(request_path.to_string())),
    };

    if !canonical.starts_with(root) {
        return Err(ServeError::OutsideRoot(request_path.to_string()));
    }

    if !canonical.is_file() {
        return Err(ServeError::NotFound(request_path.to_string()));
    }

    Ok(RequestContext {
        requested: request_path.to_string(),
        resolved: canonical,
    })
}

/// Abre el archivo resuelto y arma la respuesta 200.
///
/// El archivo queda dentro del body; se cierra cuando la respuesta se
/// escribe o se descarta.
pub fn serve(ctx: &RequestContext) -> Result<Response, ServeError> {
    let io_err = |source| ServeError::Io {
        path: ctx.resolved.clone(),
        source,
    };

    let file = File::open(&ctx.resolved).map_err(io_err)?;
    let metadata = file.metadata().map_err(io_err)?;
    let modified = metadata.modified().map_err(io_err)?;

    Ok(Response::new(StatusCode::Ok)
        .with_header("Content-Type", mime::for_path(&ctx.resolved))
        .with_header("Date", &http_date(SystemTime::now()))
        .with_header("Last-Modified", &http_date(modified))
        .with_file(file, metadata.len()))
}

fn with_common_headers(mut response: Response) -> Response {
    response.add_header("Server", SERVER_NAME);
    response.add_header("Connection", "close");
    response
}
