use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use filekey_server::assets::AssetStore;
use filekey_server::cli::Cli;
use filekey_server::config::{self, AppState, Config};
use filekey_server::{logger, server, Error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match Config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("filekey-server: {}", Error::from(e));
            return ExitCode::FAILURE;
        }
    };
    logger::init(&cfg);
    if let Err(msg) = config::parse_port_env(std::env::var(config::PORT_ENV).ok().as_deref()) {
        logger::log_warning(&msg);
    }

    match run(cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: Config) -> Result<(), Error> {
    // Bundle must be servable before binding
    let assets = AssetStore::embedded()?;
    let addr = cfg.get_socket_addr().map_err(Error::Address)?;

    // Tokio runtime sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async move {
        let listener = server::create_listener(addr)?;
        logger::log_server_start(&addr, &cfg, &assets);

        let state = Arc::new(AppState::new(cfg, assets));
        server::serve(listener, state, server::shutdown_signal()).await;
        Ok::<(), Error>(())
    })
}
