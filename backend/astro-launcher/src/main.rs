use astro_launcher::logging::{self, LogTarget};
use astro_launcher::{
    Cli, LaunchOutcome, Launcher, LauncherContext, LauncherError, LauncherResult, Watchdog,
};

use astro_config::{Config, ServerSettings};

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let server_dir = match cli.server_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine the server folder: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.daemon {
        return run_watchdog(&cli, &server_dir).await;
    }

    run_launcher(cli, server_dir).await
}

fn load_config(server_dir: &Path) -> LauncherResult<Config> {
    let config = Config::load(server_dir)?;
    config.validate()?;
    Ok(config)
}

async fn run_launcher(cli: Cli, server_dir: PathBuf) -> ExitCode {
    let config = match load_config(&server_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", e.recovery_hint());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::setup_logging(
        &config.log_dir(&server_dir),
        &config.logging,
        LogTarget::Launcher,
    ) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Server folder: {}", server_dir.display());
    config.log_summary();

    let settings = match ServerSettings::load(&server_dir) {
        Ok(settings) => settings,
        Err(e) => return report_failure(&LauncherError::from(e)),
    };
    info!(
        "Server {} at {}",
        settings.server_name.as_deref().unwrap_or("(unnamed)"),
        settings.address_key()
    );

    let ctx = LauncherContext::new(server_dir, config, settings, cli.no_update);
    let launcher = Launcher::new(ctx);

    let result = tokio::select! {
        result = launcher.run() => result,
        signal = shutdown_signal() => {
            info!("Received {signal}, shutting down");
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(LaunchOutcome::UpdateScheduled) => {
            info!("Exiting for update");
            ExitCode::SUCCESS
        }
        Ok(LaunchOutcome::ServerStopped { exit_code }) => {
            info!("Server stopped (exit code {exit_code:?}), launcher exiting");
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

async fn run_watchdog(cli: &Cli, server_dir: &Path) -> ExitCode {
    let Some(link) = cli.watchdog_link() else {
        eprintln!("Insufficient launch options! --daemon needs --launcherpid and --consolepid");
        return ExitCode::from(2);
    };

    let config = load_config(server_dir).unwrap_or_default();

    if let Err(e) = logging::setup_logging(
        &config.log_dir(server_dir),
        &config.logging,
        LogTarget::Watchdog,
    ) {
        // Detached; nowhere to report this. Keep watching regardless.
        eprintln!("Error: {e}");
    }

    let outcome = Watchdog::new(link, config.watchdog.poll_interval())
        .run()
        .await;
    info!("Watchdog finished: {outcome:?}");

    ExitCode::SUCCESS
}

fn report_failure(e: &LauncherError) -> ExitCode {
    error!("{e}");
    warn!("{}", e.recovery_hint());
    ExitCode::FAILURE
}

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "Ctrl+C",
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        signal = ctrl_c => signal,
        signal = terminate => signal,
    }
}
