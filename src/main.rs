// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::IntoDiagnostic;
use std::sync::Arc;
use ticket_desk::config::parse_config;
use ticket_desk::database::{connect_db, run_embedded_migrations};
use ticket_desk::discord::{DiscordPlatform, run_bot, set_up_client};
use ticket_desk::store::PostgresStore;
use ticket_desk::tickets::TicketManager;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.kdl";

#[tokio::main]
async fn main() -> miette::Result<()> {
	let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from(DEFAULT_CONFIG_PATH));
	let config = Arc::new(parse_config(&config_path).await?);

	let log_filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&config.log_filter))
		.into_diagnostic()?;
	tracing_subscriber::fmt().with_env_filter(log_filter).init();

	let db_connection_pool = connect_db(&config)?;
	run_embedded_migrations(&db_connection_pool)?;

	let http_client = set_up_client(&config);
	let tickets = TicketManager::new(
		DiscordPlatform::new(Arc::clone(&http_client)),
		PostgresStore::new(db_connection_pool),
		config.tickets,
	);

	tracing::info!("Starting ticket bot");
	run_bot(config, http_client, tickets).await
}
