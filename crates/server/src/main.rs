// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Restaurant admin server binary
//!
//! `resto-server` starts the HTTP server. `resto-server hash-password <password>`
//! prints a bcrypt hash for provisioning rows in the `users` table.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use tracing::info;

use resto_server::{
	AdminServer, ServerConfig,
	auth::hash_password,
	db::{Database, PipelineClient, schema::ensure_schema},
	logging::init_logging,
};

const BCRYPT_COST: u32 = 10;

fn print_password_hash(password: Option<String>) -> Result<()> {
	let Some(password) = password else {
		bail!("Usage: resto-server hash-password <password>");
	};
	let hash = hash_password(&password, BCRYPT_COST).context("Failed to hash password")?;
	println!("{}", hash);
	Ok(())
}

#[actix_rt::main]
async fn main() -> Result<()> {
	let mut args = std::env::args().skip(1);
	if args.next().as_deref() == Some("hash-password") {
		return print_password_hash(args.next());
	}

	// Initialize logging first
	init_logging()?;

	let config = ServerConfig::from_env().context("Failed to load configuration")?;

	let client = PipelineClient::new(
		&config.database_url,
		config.database_auth_token.clone(),
		Duration::from_millis(config.db_timeout_ms),
	)
	.context("Failed to create database client")?;
	info!(target: "server", endpoint = client.endpoint(), "Database gateway ready");
	let db: Database = Arc::new(client);

	if config.auto_migrate {
		ensure_schema(db.as_ref())
			.await
			.context("Failed to apply database schema")?;
	}

	AdminServer::new(config, db)
		.serve()
		.await
		.context("Failed to run admin server")?;

	Ok(())
}
