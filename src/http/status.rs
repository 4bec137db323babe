//! # Códigos de Estado HTTP
//!
//! Solo los códigos que el servidor de archivos puede producir:
//!
//! - **200**: archivo encontrado y enviado
//! - **400**: request que no se pudo parsear
//! - **404**: el path no resuelve a un archivo regular dentro de la raíz
//! - **500**: fallo de I/O al abrir o leer un archivo existente

/// Códigos de estado que produce el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - Archivo enviado
    Ok = 200,

    /// 400 Bad Request - Request malformado
    BadRequest = 400,

    /// 404 Not Found - No existe (o está fuera de la raíz)
    NotFound = 404,

    /// 500 Internal Server Error - Fallo de I/O sobre un archivo existente
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón estándar asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
