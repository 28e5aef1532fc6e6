use std::process;
use std::sync::Arc;

use echo_scheduler_rs::api::server::EchoServer;
use echo_scheduler_rs::logging::init_tracing;
use echo_scheduler_rs::{Agent, EchoConfig};

#[tokio::main]
async fn main() {
    let config = match EchoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {}", err);
            process::exit(2);
        }
    };
    init_tracing(&config.log_level);

    let port = config.port;
    let agent = match Agent::from_config("echo", config) {
        Ok(agent) => Arc::new(agent),
        Err(err) => {
            tracing::error!(error = %err, "failed to start scheduler");
            process::exit(1);
        }
    };

    let server = EchoServer::new(port, agent);
    if let Err(err) = server.start().await {
        tracing::error!(error = %err, "server stopped");
        process::exit(1);
    }
}
