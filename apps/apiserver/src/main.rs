use apiserver::infra::shutdown::ShutdownSignal;
use apiserver::{build_manager, EnvConfig};
use tracing::{error, info};

mod telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // Configuration comes from the pod environment, e.g. DBCONFIG_DRIVERNAME
    // for `DBConfig.DriverName`.
    let manager = match build_manager().build(&EnvConfig).await {
        Ok(manager) => manager,
        Err(e) => {
            error!(code = e.code(), kind = ?e.kind(), error = %e, "failed to initialize client manager");
            std::process::exit(1);
        }
    };

    let signal = match ShutdownSignal::install() {
        Ok(signal) => signal,
        Err(e) => {
            error!(error = %e, "failed to install shutdown signal handlers");
            let _ = manager.close().await;
            std::process::exit(1);
        }
    };

    info!(manager = ?manager, "api server dependencies ready");

    let received = signal.recv().await;
    info!(signal = received, "shutting down");
    if let Err(e) = manager.close().await {
        error!(code = e.code(), error = %e, "shutdown failed");
        std::process::exit(1);
    }
}
