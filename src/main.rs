// Entrypoint for the catalog client.
// - Keeps `main` small: load config, build the HTTP catalog and controller,
//   render the initial list, then hand over to the UI loop.
// - Runs on a current-thread runtime: every handler is cooperative.

use anyhow::Context;
use cupcake_cli::{
    api::HttpCatalog, config::ClientConfig, controller::CatalogController, logging::init_logging,
    ui::main_menu, view::ListView,
};
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let api = HttpCatalog::from_config(&config).context("Failed to build HTTP client")?;

    // An explicit token wins; otherwise take the one the index page issues.
    let csrf_token = match &config.csrf_token {
        Some(token) => token.clone(),
        None => api.discover_csrf_token().await.unwrap_or_else(|e| {
            warn!(event = "cli.csrf_discovery_failed", error = %e);
            String::new()
        }),
    };

    let controller = CatalogController::new(api, ListView::new(), config.controller);
    // A failed initial load leaves an empty list; the failure is already logged.
    let _ = controller.load().await;

    main_menu(&controller, csrf_token).await
}
