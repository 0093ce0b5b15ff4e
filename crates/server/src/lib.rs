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

//! Restaurant back-office admin server
//!
//! A REST API over a hosted SQL database for the menu catalog, customer orders
//! and their payments. Requests pass through logging and CORS middleware, then
//! the bearer-token [`auth::AuthGuard`], then a handler that calls one of the
//! [`services`]. Services reach storage only through the injected
//! [`db::SqlExecutor`].

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod request_context;
pub mod routes;
pub mod server;
pub mod services;
pub mod worker;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AdminServer, AppState, configure_app};
