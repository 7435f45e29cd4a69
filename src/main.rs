use std::process::ExitCode;

use nocache_server::{logger, server, Config, ServeError};

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e}");
            if e.is_addr_in_use() {
                eprintln!("[ERROR] Port already in use; set SERVE_SERVER__PORT to pick another");
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), ServeError> {
    let cfg = Config::load()?;
    logger::init(&cfg);

    // Tokio runtime, thread count from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&n| n > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(&cfg))
}
