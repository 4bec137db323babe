//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Ciclo de vida del servidor y manejo de conexiones.
//!
//! ```text
//!            start()              stop()              loop termina
//! Stopped ───────────► Listening ────────► Stopping ──────────────► Stopped
//! ```
//!
//! El accept loop corre en su propio thread y es dueño del listener. Cada
//! conexión aceptada se atiende en un thread aparte, así que un archivo
//! grande no bloquea a los demás clientes.
//!
//! El listener es no bloqueante: el loop revisa el flag de parada cada
//! [`POLL_INTERVAL`]. `stop()` marca el flag y hace join del thread, así que
//! cuando retorna el listener ya fue soltado y el puerto quedó libre.

use crate::config::ServerConfig;
use crate::error::{ConnectionError, ServerError};
use crate::http::{Request, StatusCode};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::processor;
use log::{debug, error, info, log, warn, Level};
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Tamaño máximo de la cabecera de un request
const MAX_HEAD_SIZE: usize = 8192;

/// Cada cuánto revisa el accept loop si hay conexiones o si debe parar
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Pausa tras un error de `accept()` (ej: EMFILE) para no girar en vacío
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Estado del ciclo de vida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Listening,
    Stopping,
}

/// Servidor de archivos estáticos
pub struct Server {
    config: Arc<ServerConfig>,
    state: ServerState,

    /// Flag de parada del ciclo actual; uno nuevo por cada `start()`
    shutdown: Arc<AtomicBool>,

    local_addr: Option<SocketAddr>,
    accept_thread: Option<JoinHandle<()>>,
    metrics: Arc<MetricsCollector>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: ServerState::Stopped,
            shutdown: Arc::new(AtomicBool::new(false)),
            local_addr: None,
            accept_thread: None,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    /// Hace bind y lanza el accept loop en un thread dedicado.
    ///
    /// Si el bind falla el servidor queda en `Stopped` y se retorna el error.
    pub fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.state != ServerState::Stopped {
            return Err(ServerError::AlreadyRunning);
        }

        let address = self.config.address();
        let bind_err = |source| ServerError::Bind {
            addr: address.clone(),
            source,
        };

        let listener = TcpListener::bind(&address).map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        listener.set_nonblocking(true).map_err(bind_err)?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let accept_loop = AcceptLoop {
            listener,
            config: Arc::clone(&self.config),
            shutdown: Arc::clone(&shutdown),
            metrics: Arc::clone(&self.metrics),
        };

        let handle = thread::Builder::new()
            .name("accept-loop".to_string())
            .spawn(move || accept_loop.run())
            .map_err(ServerError::Spawn)?;

        self.shutdown = shutdown;
        self.local_addr = Some(local_addr);
        self.accept_thread = Some(handle);
        self.state = ServerState::Listening;

        info!(
            "Escuchando en http://{}/ (raíz: {})",
            local_addr,
            self.config.root().display()
        );
        Ok(local_addr)
    }

    /// Detiene el accept loop y cierra el listener.
    ///
    /// Retorna cuando el thread del loop terminó y el listener está cerrado.
    /// Las conexiones que ya se estaban atendiendo siguen hasta terminar o
    /// hasta su timeout.
    pub fn stop(&mut self) {
        if self.state != ServerState::Listening {
            debug!("stop() ignorado: el servidor está en {:?}", self.state);
            return;
        }

        self.state = ServerState::Stopping;
        self.shutdown.store(true, Ordering::SeqCst);

        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                error!("El accept loop terminó con panic");
            }
        }

        self.local_addr = None;
        self.state = ServerState::Stopped;
        info!("Servidor detenido. Métricas: {}", self.metrics.to_json());
    }

    /// Libera lo que `stop()` no haya liberado. Se puede llamar varias veces.
    pub fn dispose(&mut self) {
        if self.state == ServerState::Listening {
            self.stop();
        }
    }

    /// Bloquea hasta que el accept loop termine
    pub fn wait(&mut self) {
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                error!("El accept loop terminó con panic");
            }
            self.local_addr = None;
            self.state = ServerState::Stopped;
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    /// Dirección real del listener mientras está escuchando
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Puerto en uso, o el configurado si no está escuchando
    pub fn port(&self) -> u16 {
        self.local_addr
            .map(|addr| addr.port())
            .unwrap_or_else(|| self.config.port())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn stats(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Todo lo que necesita el thread del accept loop
struct AcceptLoop {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    shutdown: Arc<AtomicBool>,
    metrics: Arc<MetricsCollector>,
}

impl AcceptLoop {
    fn run(self) {
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, _)) => self.dispatch(stream),
                Err(e) => {
                    if !is_idle(&e) {
                        warn!("Error al aceptar conexión: {}", e);
                    }
                    thread::sleep(retry_delay(&e));
                }
            }
        }

        debug!("Accept loop terminado, cerrando listener");
    }

    /// Un thread por conexión
    fn dispatch(&self, stream: TcpStream) {
        // En algunas plataformas el socket aceptado hereda el modo no bloqueante
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("No se pudo preparar la conexión: {}", e);
            return;
        }

        let config = Arc::clone(&self.config);
        let metrics = Arc::clone(&self.metrics);

        self.metrics.connection_opened();

        let spawned = thread::Builder::new()
            .name("connection".to_string())
            .spawn(move || {
                let peer = stream
                    .peer_addr()
                    .map(|addr| addr.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());

                if let Err(e) = handle_connection(stream, &config, &metrics) {
                    warn!("Conexión {}: {}", peer, e);
                }
                metrics.connection_closed();
            });

        if let Err(e) = spawned {
            self.metrics.connection_closed();
            error!("No se pudo crear el thread de la conexión: {}", e);
        }
    }
}

/// Atiende una conexión: lee un request, responde y cierra.
pub fn handle_connection(
    mut stream: TcpStream,
    config: &ServerConfig,
    metrics: &MetricsCollector,
) -> Result<(), ConnectionError> {
    let start = Instant::now();

    stream.set_read_timeout(Some(config.timeout()))?;
    stream.set_write_timeout(Some(config.timeout()))?;

    let head = read_request_head(&mut stream)?;
    if head.is_empty() {
        debug!("Conexión cerrada sin datos");
        return Ok(());
    }

    let request = match Request::parse(&head) {
        Ok(request) => request,
        Err(e) => {
            let response = processor::error_response(StatusCode::BadRequest);
            if let Err(write_err) = response.write_to(&mut stream) {
                debug!("No se pudo enviar el 400: {}", write_err);
            }
            metrics.record_request(StatusCode::BadRequest, 0);
            return Err(e.into());
        }
    };

    let response = processor::handle(request.path(), config.root());
    let status = response.status();
    let result = response.write_to(&mut stream);

    metrics.record_request(status, *result.as_ref().unwrap_or(&0));
    debug!(
        "{} {} {} (Host: {})",
        request.method(),
        request.path(),
        request.version(),
        request.header("Host").unwrap_or("-")
    );
    log!(
        log_level(status),
        "{} {} → {} ({:.2}ms)",
        request.method(),
        request.path(),
        status,
        start.elapsed().as_secs_f64() * 1000.0
    );

    result?;
    Ok(())
}

/// Lee hasta la línea vacía que cierra la cabecera, EOF o [`MAX_HEAD_SIZE`].
fn read_request_head<R: Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(1024);
    let mut buffer = [0u8; 1024];

    while head.len() < MAX_HEAD_SIZE {
        let n = match stream.read(&mut buffer) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n == 0 {
            break;
        }

        head.extend_from_slice(&buffer[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    Ok(head)
}

/// Sin conexiones pendientes en el listener no bloqueante
fn is_idle(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted)
}

/// Espera antes del siguiente `accept()`
fn retry_delay(err: &io::Error) -> Duration {
    match err.kind() {
        io::ErrorKind::WouldBlock => POLL_INTERVAL,
        io::ErrorKind::Interrupted => Duration::ZERO,
        _ => ACCEPT_ERROR_BACKOFF,
    }
}

/// Nivel de log de la línea de acceso según la clase del status
fn log_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else {
        Level::Info
    }
}
