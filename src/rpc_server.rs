//! marcador bookmark server: JSON over UDP for launchers and remote CLIs.
//!
//! Protocol: one JSON object per datagram.
//! Request:  {"cmd":"add", "args":{"url":"...","description":"...","tags":[]}}
//! Response: {"type":"ok", "payload":...} or {"type":"error", "payload":"..."}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use marcador::proxy::LocalProxy;
use marcador::rpc_listener::RpcListener;
use marcador::services::config_engine::{ConfigEngine, ConfigEngineTrait};

#[derive(Parser)]
#[command(name = "marcador-server", author, version, about = "Serve a bookmark store over UDP")]
struct Cli {
    /// Bookmark database path
    #[arg(long)]
    db: Option<String>,
    /// Address to bind
    #[arg(long)]
    host: Option<String>,
    /// UDP port to bind
    #[arg(long)]
    port: Option<u16>,
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), String> {
    let mut engine = ConfigEngine::new(cli.config);
    engine.load().map_err(|e| e.to_string())?;
    engine.apply_env();
    engine.apply_server_flags(cli.db, cli.host, cli.port);

    let db_path = engine.server_db_path();
    let proxy = LocalProxy::open(&db_path).map_err(|e| e.to_string())?;
    log::info!("[SERVER] Serving {}", db_path.display());

    let addr = engine.get_config().server.bind_addr();
    let listener = RpcListener::bind(addr.as_str(), proxy)
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    listener.serve().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("marcador-server: {}", e);
            ExitCode::FAILURE
        }
    }
}
