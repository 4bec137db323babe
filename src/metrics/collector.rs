//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Contadores del servidor actualizados desde los threads de conexión.
//! Todo es atómico: registrar un request nunca bloquea a otro.

use crate::http::StatusCode;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Collector de métricas thread-safe (compartir con `Arc`)
#[derive(Debug)]
pub struct MetricsCollector {
    total_requests: AtomicU64,
    ok: AtomicU64,
    bad_request: AtomicU64,
    not_found: AtomicU64,
    server_error: AtomicU64,

    /// Bytes de body enviados (sin contar headers)
    bytes_sent: AtomicU64,

    /// Conexiones siendo atendidas en este momento
    active_connections: AtomicU64,

    start_time: Instant,
}

/// Snapshot de las métricas (serializable a JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub ok: u64,
    pub bad_request: u64,
    pub not_found: u64,
    pub server_error: u64,
    pub bytes_sent: u64,
    pub active_connections: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            ok: AtomicU64::new(0),
            bad_request: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            server_error: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Registra un request terminado
    pub fn record_request(&self, status: StatusCode, bytes_sent: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes_sent, Ordering::Relaxed);

        let counter = match status {
            StatusCode::Ok => &self.ok,
            StatusCode::BadRequest => &self.bad_request,
            StatusCode::NotFound => &self.not_found,
            StatusCode::InternalServerError => &self.server_error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_opened(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Nunca baja de cero
    pub fn connection_closed(&self) {
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    pub fn active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_requests: self.total_requests.load(Ordering::Relaxed),
            ok: self.ok.load(Ordering::Relaxed),
            bad_request: self.bad_request.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            server_error: self.server_error.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
        }
    }

    /// Snapshot en JSON, listo para el log
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
