//! MessHub Shell - Main Entry Point

use messhub_platform::{InstallChoice, Platform};
use messhub_shell::AppShell;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting MessHub shell...");

    smol::block_on(async {
        let platform = Platform::new();
        let shell = AppShell::initialize(platform.clone()).await;

        tracing::info!(visit = shell.visit(), route = ?shell.route(), "shell ready");

        // Walk one session: the platform signals installability, the user
        // accepts the install prompt, then signs in.
        platform.install.emit(InstallChoice::Accepted);
        tracing::info!(snapshot = ?shell.coordinator.snapshot(), "install signal received");

        let installed = shell.install_prompt.install().await;
        tracing::info!(installed, "install prompt resolved");

        let signed_in = shell.auth.login("user@example.com", "password").await;
        tracing::info!(signed_in, route = ?shell.route(), "after login");

        if shell.sw.check_for_update().await {
            tracing::info!("an update is waiting");
        }

        shell.teardown();
    });
}
