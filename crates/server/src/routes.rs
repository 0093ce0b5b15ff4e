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

use actix_web::web;

use crate::{auth::AuthGuard, handlers, server::AppState};

/// Configure API routes for the admin service
///
/// This function sets up all HTTP routes:
/// - `{prefix}/login`, `/menu`, `/pesanan`, `/pembayaran`, `/stats` - Admin API,
///   behind the auth guard
/// - `/health` - Health check endpoint, never prefixed or guarded
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
	let guard = AuthGuard::new(state.issuer.clone(), state.policy.clone());

	cfg.route("/health", web::get().to(handlers::health)).service(
		web::scope(&state.policy.prefix)
			.wrap(guard)
			.route("/login", web::post().to(handlers::login))
			.route("/menu", web::get().to(handlers::list_menu))
			.route("/menu", web::post().to(handlers::create_menu))
			.route("/menu/{id}", web::get().to(handlers::get_menu))
			.route("/menu/{id}", web::put().to(handlers::update_menu))
			.route("/menu/{id}", web::delete().to(handlers::delete_menu))
			.route("/pesanan", web::get().to(handlers::list_orders))
			.route("/pesanan", web::post().to(handlers::create_order))
			.route("/pesanan/{id}", web::put().to(handlers::update_order))
			.route("/pesanan/{id}", web::delete().to(handlers::delete_order))
			.route("/pembayaran", web::get().to(handlers::list_payments))
			.route("/pembayaran", web::post().to(handlers::create_payment))
			.route(
				"/pembayaran/reconcile",
				web::post().to(handlers::reconcile_payments),
			)
			.route("/pembayaran/{id}", web::put().to(handlers::update_payment))
			.route(
				"/pembayaran/{id}",
				web::delete().to(handlers::delete_payment),
			)
			.route("/stats", web::get().to(handlers::stats)),
	);
}
