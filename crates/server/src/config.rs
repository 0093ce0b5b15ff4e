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

use std::{env, net::SocketAddr};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "server";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

// Server configuration constants
/// Default listen host (can be overridden by HOST)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port (can be overridden by PORT)
pub const DEFAULT_PORT: u16 = 3000;

/// Default route prefix for the REST API (can be overridden by API_PREFIX)
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default maximum HTTP request body size in bytes (can be overridden by MAX_BODY_BYTES)
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

// Auth configuration constants
/// Default token lifetime in hours (can be overridden by TOKEN_TTL_HOURS)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest accepted token lifetime in hours (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Menu reads are public unless PUBLIC_MENU_READ=false
pub const DEFAULT_PUBLIC_MENU_READ: bool = true;

/// Order creation requires a token unless PUBLIC_ORDER_CREATE=true
pub const DEFAULT_PUBLIC_ORDER_CREATE: bool = false;

// Database configuration constants
/// Default timeout for one pipeline call in milliseconds (can be overridden by DB_TIMEOUT_MS)
pub const DEFAULT_DB_TIMEOUT_MS: u64 = 10_000;

/// Default interval between payment reconciliation passes (0 disables the background task)
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;

/// Create missing tables on startup unless AUTO_MIGRATE=false
pub const DEFAULT_AUTO_MIGRATE: bool = true;

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_ENV: &str = "RESTO_CONFIG";

/// Admin server configuration
///
/// Field names map to the environment variable of the same name, upper-cased
/// (`TURSO_DATABASE_URL`, `JWT_SECRET`, `PORT`, ...). A file named by
/// `RESTO_CONFIG` may provide the same keys; the environment wins.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
	/// Pipelined SQL endpoint (`libsql://`, `https://` or `http://`)
	#[serde(rename = "turso_database_url")]
	pub database_url: String,
	/// Bearer token for the SQL endpoint
	#[serde(rename = "turso_auth_token", default)]
	pub database_auth_token: Option<String>,
	/// HS256 signing secret for session tokens
	pub jwt_secret: String,
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default = "num_cpus::get")]
	pub workers: usize,
	#[serde(default = "default_max_body_bytes")]
	pub max_body_bytes: usize,
	#[serde(default = "default_api_prefix")]
	pub api_prefix: String,
	#[serde(default = "default_public_menu_read")]
	pub public_menu_read: bool,
	#[serde(default = "default_public_order_create")]
	pub public_order_create: bool,
	#[serde(default = "default_token_ttl_hours")]
	pub token_ttl_hours: i64,
	#[serde(default = "default_db_timeout_ms")]
	pub db_timeout_ms: u64,
	#[serde(default = "default_reconcile_interval_secs")]
	pub reconcile_interval_secs: u64,
	#[serde(default = "default_auto_migrate")]
	pub auto_migrate: bool,
}

fn default_host() -> String {
	DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
	DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
	DEFAULT_MAX_BODY_BYTES
}

fn default_api_prefix() -> String {
	DEFAULT_API_PREFIX.to_string()
}

fn default_public_menu_read() -> bool {
	DEFAULT_PUBLIC_MENU_READ
}

fn default_public_order_create() -> bool {
	DEFAULT_PUBLIC_ORDER_CREATE
}

fn default_token_ttl_hours() -> i64 {
	DEFAULT_TOKEN_TTL_HOURS
}

fn default_db_timeout_ms() -> u64 {
	DEFAULT_DB_TIMEOUT_MS
}

fn default_reconcile_interval_secs() -> u64 {
	DEFAULT_RECONCILE_INTERVAL_SECS
}

fn default_auto_migrate() -> bool {
	DEFAULT_AUTO_MIGRATE
}

impl ServerConfig {
	/// Build a configuration with every optional setting at its default
	pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
		Self {
			database_url: database_url.into(),
			database_auth_token: None,
			jwt_secret: jwt_secret.into(),
			host: default_host(),
			port: DEFAULT_PORT,
			workers: num_cpus::get(),
			max_body_bytes: DEFAULT_MAX_BODY_BYTES,
			api_prefix: default_api_prefix(),
			public_menu_read: DEFAULT_PUBLIC_MENU_READ,
			public_order_create: DEFAULT_PUBLIC_ORDER_CREATE,
			token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
			db_timeout_ms: DEFAULT_DB_TIMEOUT_MS,
			reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
			auto_migrate: DEFAULT_AUTO_MIGRATE,
		}
	}

	/// Load configuration from `.env`, the optional `RESTO_CONFIG` file and the environment
	pub fn from_env() -> Result<Self> {
		dotenv::dotenv().ok();

		let mut builder = config::Config::builder();
		if let Ok(path) = env::var(CONFIG_FILE_ENV) {
			builder = builder.add_source(config::File::with_name(&path));
		}
		let cfg = builder
			.add_source(config::Environment::default().try_parsing(true))
			.build()
			.context("Failed to read configuration sources")?;

		let config: Self = cfg
			.try_deserialize()
			.context("Invalid configuration (TURSO_DATABASE_URL and JWT_SECRET are required)")?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file, with the environment layered on top
	pub fn from_file(path: &str) -> Result<Self> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::default().try_parsing(true))
			.build()
			.with_context(|| format!("Failed to read configuration file {}", path))?;

		let config: Self = cfg.try_deserialize().context("Invalid configuration")?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.database_url.trim().is_empty() {
			bail!("TURSO_DATABASE_URL must not be empty");
		}
		if self.jwt_secret.is_empty() {
			bail!("JWT_SECRET must not be empty");
		}
		if self.token_ttl_hours <= 0 || self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
			bail!("TOKEN_TTL_HOURS must be between 1 and {}", MAX_TOKEN_TTL_HOURS);
		}
		if self.workers == 0 {
			bail!("WORKERS must be > 0");
		}
		Ok(())
	}

	pub fn bind_addr(&self) -> Result<SocketAddr> {
		let raw = format!("{}:{}", self.host, self.port);
		raw.parse()
			.with_context(|| format!("Invalid bind address: {}", raw))
	}

	/// Route prefix normalized to either "" or "/segment" without a trailing slash
	pub fn normalized_prefix(&self) -> String {
		let trimmed = self.api_prefix.trim().trim_matches('/');
		if trimmed.is_empty() {
			String::new()
		} else {
			format!("/{}", trimmed)
		}
	}
}
