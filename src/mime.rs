//! # Registro de Tipos MIME
//! src/mime.rs
//!
//! Tabla estática extensión → `Content-Type`. La extensión incluye el punto
//! inicial y se compara sin distinguir mayúsculas. Lo que no está en la tabla
//! se sirve como [`DEFAULT_MIME`].

use std::path::Path;

/// Tipo usado cuando la extensión no está registrada
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Extensiones registradas, ordenadas alfabéticamente
static MIME_TYPES: &[(&str, &str)] = &[
    (".asf", "video/x-ms-asf"),
    (".asx", "video/x-ms-asf"),
    (".avi", "video/x-msvideo"),
    (".bin", "application/octet-stream"),
    (".cco", "application/x-cocoa"),
    (".crt", "application/x-x509-ca-cert"),
    (".css", "text/css"),
    (".deb", "application/octet-stream"),
    (".der", "application/x-x509-ca-cert"),
    (".dll", "application/octet-stream"),
    (".dmg", "application/octet-stream"),
    (".ear", "application/java-archive"),
    (".eot", "application/octet-stream"),
    (".exe", "application/octet-stream"),
    (".flv", "video/x-flv"),
    (".gif", "image/gif"),
    (".hqx", "application/mac-binhex40"),
    (".htc", "text/x-component"),
    (".htm", "text/html"),
    (".html", "text/html"),
    (".ico", "image/x-icon"),
    (".img", "application/octet-stream"),
    (".iso", "application/octet-stream"),
    (".jar", "application/java-archive"),
    (".jardiff", "application/x-java-archive-diff"),
    (".jng", "image/x-jng"),
    (".jnlp", "application/x-java-jnlp-file"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".js", "application/x-javascript"),
    (".mml", "text/mathml"),
    (".mng", "video/x-mng"),
    (".mov", "video/quicktime"),
    (".mp3", "audio/mpeg"),
    (".mpeg", "video/mpeg"),
    (".mpg", "video/mpeg"),
    (".msi", "application/octet-stream"),
    (".msm", "application/octet-stream"),
    (".msp", "application/octet-stream"),
    (".pdb", "application/x-pilot"),
    (".pdf", "application/pdf"),
    (".pem", "application/x-x509-ca-cert"),
    (".pl", "application/x-perl"),
    (".pm", "application/x-perl"),
    (".png", "image/png"),
    (".prc", "application/x-pilot"),
    (".ra", "audio/x-realaudio"),
    (".rar", "application/x-rar-compressed"),
    (".rpm", "application/x-redhat-package-manager"),
    (".rss", "text/xml"),
    (".run", "application/x-makeself"),
    (".sea", "application/x-sea"),
    (".shtml", "text/html"),
    (".sit", "application/x-stuffit"),
    (".swf", "application/x-shockwave-flash"),
    (".tcl", "application/x-tcl"),
    (".tk", "application/x-tcl"),
    (".txt", "text/plain"),
    (".war", "application/java-archive"),
    (".wasm", "application/wasm"),
    (".wbmp", "image/vnd.wap.wbmp"),
    (".wmv", "video/x-ms-wmv"),
    (".xml", "text/xml"),
    (".xpi", "application/x-xpinstall"),
    (".zip", "application/zip"),
];

/// Busca el `Content-Type` de una extensión (con punto inicial)
///
/// Función total: cualquier string, incluido el vacío, produce un tipo.
///
/// # Ejemplo
/// ```
/// use static_server::mime;
///
/// assert_eq!(mime::lookup(".PNG"), "image/png");
/// assert_eq!(mime::lookup(".nada"), "application/octet-stream");
/// ```
pub fn lookup(extension: &str) -> &'static str {
    MIME_TYPES
        .binary_search_by(|(ext, _)| cmp_ignore_ascii_case(ext, extension))
        .map(|idx| MIME_TYPES[idx].1)
        .unwrap_or(DEFAULT_MIME)
}

/// `Content-Type` para un archivo según su extensión
pub fn for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => lookup(&format!(".{}", ext)),
        None => DEFAULT_MIME,
    }
}

fn cmp_ignore_ascii_case(a: &str, b: &str) -> std::cmp::Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_for_binary_search() {
        for pair in MIME_TYPES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup(".png"), "image/png");
        assert_eq!(lookup(".PNG"), "image/png");
        assert_eq!(lookup(".Html"), "text/html");
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(lookup(".unknownext"), DEFAULT_MIME);
        assert_eq!(lookup(""), DEFAULT_MIME);
        assert_eq!(lookup("."), DEFAULT_MIME);
    }

    #[test]
    fn test_lookup_requires_leading_dot() {
        assert_eq!(lookup("png"), DEFAULT_MIME);
    }

    #[test]
    fn test_lookup_common_types() {
        assert_eq!(lookup(".css"), "text/css");
        assert_eq!(lookup(".js"), "application/x-javascript");
        assert_eq!(lookup(".jpg"), "image/jpeg");
        assert_eq!(lookup(".wasm"), "application/wasm");
        assert_eq!(lookup(".txt"), "text/plain");
    }

    #[test]
    fn test_for_path() {
        assert_eq!(for_path(Path::new("/srv/www/index.html")), "text/html");
        assert_eq!(for_path(Path::new("logo.GIF")), "image/gif");
        assert_eq!(for_path(Path::new("LICENSE")), DEFAULT_MIME);
        assert_eq!(for_path(Path::new("archive.tar.gz")), DEFAULT_MIME);
    }
}
