//! # Static File Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, arranca el servidor y espera `q` + Enter en
//! stdin para detenerlo. Si stdin se cierra (por ejemplo corriendo como
//! servicio) el servidor sigue atendiendo hasta que maten el proceso.

use static_server::config::Config;
use static_server::server::Server;
use std::io::{self, BufRead};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::new();
    config.print_summary();

    if let Ok(json) = serde_json::to_string(&config) {
        log::debug!("Configuración: {}", json);
    }

    let server_config = match config.server_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            eprintln!("💥 Error de configuración: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = Server::new(server_config);
    let addr = match server.start() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("💥 Error fatal: {}", e);
            std::process::exit(1);
        }
    };

    println!("Sirviendo en http://{}/", addr);
    println!("Escribe q + Enter para salir\n");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                server.stop();
                server.dispose();
                return;
            }
            Ok(_) => println!("Escribe q + Enter para salir"),
            Err(e) => {
                log::warn!("Error leyendo stdin: {}", e);
                break;
            }
        }
    }

    log::info!("stdin cerrado, el servidor sigue atendiendo");
    server.wait();
}
