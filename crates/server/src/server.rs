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

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::info;

use crate::{
	auth::{AuthPolicy, TokenIssuer},
	config::ServerConfig,
	db::Database,
	error::ApiError,
	middleware::{CorsMiddleware, LoggingMiddleware},
	routes,
	services::{MenuService, OrderService, PaymentService, Reconciler, StatsService, UserService},
	worker::ReconcileWorker,
};

/// Shared request state
///
/// Every service holds the same injected [`Database`] handle.
pub struct AppState {
	pub menu: MenuService,
	pub orders: OrderService,
	pub payments: PaymentService,
	pub stats: StatsService,
	pub users: UserService,
	pub reconciler: Arc<Reconciler>,
	pub issuer: Arc<TokenIssuer>,
	pub policy: AuthPolicy,
}

impl AppState {
	pub fn new(db: Database, config: &ServerConfig) -> Self {
		let issuer = Arc::new(TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours));

		Self {
			menu: MenuService::new(db.clone()),
			orders: OrderService::new(db.clone()),
			payments: PaymentService::new(db.clone()),
			stats: StatsService::new(db.clone()),
			users: UserService::new(db.clone(), issuer.clone()),
			reconciler: Arc::new(Reconciler::new(db)),
			issuer,
			policy: AuthPolicy {
				prefix: config.normalized_prefix(),
				public_menu_read: config.public_menu_read,
				public_order_create: config.public_order_create,
			},
		}
	}
}

/// Register state, body limits and routes on an app
///
/// Malformed or oversized JSON bodies and non-numeric path ids answer 400
/// with the usual `{"message"}` body.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: web::Data<AppState>, max_body_bytes: usize) {
	let json = web::JsonConfig::default()
		.limit(max_body_bytes)
		.error_handler(|err, _req| ApiError::validation(err.to_string()).into());
	let path = web::PathConfig::default()
		.error_handler(|err, _req| ApiError::validation(format!("invalid id: {}", err)).into());

	cfg.app_data(state.clone()).app_data(json).app_data(path);
	routes::configure_routes(cfg, &state);
}

/// Admin HTTP server
pub struct AdminServer {
	config: ServerConfig,
	state: web::Data<AppState>,
}

impl AdminServer {
	pub fn new(config: ServerConfig, db: Database) -> Self {
		let state = web::Data::new(AppState::new(db, &config));
		Self { config, state }
	}

	/// Run until the server is stopped, with the reconciler alongside
	pub async fn serve(self) -> Result<()> {
		let addr = self.config.bind_addr()?;
		let max_body_bytes = self.config.max_body_bytes;
		let state = self.state.clone();

		let reconciler = ReconcileWorker::start(
			self.state.reconciler.clone(),
			self.config.reconcile_interval_secs,
		);

		info!(
			target: "server",
			%addr,
			workers = self.config.workers,
			prefix = %self.state.policy.prefix,
			"Admin server listening"
		);

		let result = HttpServer::new(move || {
			let state = state.clone();
			App::new()
				.wrap(CorsMiddleware)
				.wrap(LoggingMiddleware)
				.configure(|cfg| configure_app(cfg, state, max_body_bytes))
		})
		.workers(self.config.workers)
		.bind(addr)
		.with_context(|| format!("Failed to bind {}", addr))?
		.run()
		.await;

		reconciler.shutdown();
		info!(target: "server", "Admin server stopped");
		result.context("HTTP server error")
	}
}
