use std::process::ExitCode;

use ticktock::Config;
use tokio::{signal, spawn, sync::oneshot};
use tracing::{error, info, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    match ticktock::run(&config, interrupt()).await {
        Ok(report) => {
            info!(
                "sent {} messages in {:.1}s",
                report.sent,
                report.elapsed.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Fire the returned signal on Ctrl-C.
fn interrupt() -> oneshot::Receiver<()> {
    let (stop_tx, stop_rx) = oneshot::channel();

    spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            let _ = stop_tx.send(());
        } else {
            // no signal handler; keep the sender alive so the loop isn't stopped
            std::future::pending::<()>().await;
        }
    });

    stop_rx
}

#[cfg(debug_assertions)]
fn setup_tracing() {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::TRACE)
        .init();
}

#[cfg(not(debug_assertions))]
fn setup_tracing() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}
