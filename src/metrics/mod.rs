//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores por servidor:
//! - Requests totales y por código de estado
//! - Bytes de body enviados
//! - Conexiones activas

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
