// SPDX-License-Identifier: MPL-2.0

mod app;
mod config;
mod feed;
mod network;
mod runtime;
mod state;
mod ui;

use crate::app::FeedApp;
use crate::config::APP_NAME;
use crate::network::NetworkClient;
use crate::state::{AppSettings, Credentials};
use crate::ui::TerminalRenderer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::load();
    let credentials = Credentials::resolve();
    let authenticated = credentials.is_authenticated();

    let client = match NetworkClient::new(&settings.server_url, credentials) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create client: {e}");
            std::process::exit(1);
        }
    };

    log::info!("{APP_NAME} connected to {}", settings.server_url);
    if config::IS_DEVEL {
        log::debug!("Settings: {settings:?}");
    }

    runtime::block_on(async move {
        let renderer = TerminalRenderer::new(std::io::stdout());
        let (mut app, load_more) = FeedApp::new(client, renderer, settings);
        let input = tokio::io::BufReader::new(tokio::io::stdin());
        app.run(authenticated, input, load_more).await;
    });
}
