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

use crate::types::{
	CreatedResponse, LoginRequest, LoginResponse, Menu, MenuInput, MessageResponse, NewPayment,
	Order, OrderInput, Payment, PaymentUpdate, ReconcileReport, Stats,
};
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Server error: {0}")]
	Server(String),
	#[error("Authentication error: {0}")]
	Authentication(String),
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
}

/// Client for the restaurant admin API
///
/// `base_url` includes the API prefix, e.g. `http://localhost:3000/api`.
/// After [`Client::login`] the bearer token is attached to every request.
pub struct Client {
	base_url: String,
	client: ReqwestClient,
	token: Option<String>,
}

impl Client {
	/// Create a new client with the given base URL
	pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
		Self::with_config(base_url, Duration::from_secs(30))
	}

	/// Create a new client with a custom request timeout
	pub fn with_config(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			client,
			token: None,
		})
	}

	/// Use an already issued token
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());
		self
	}

	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	/// Log in and keep the issued token for subsequent calls
	pub async fn login(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
		let body = LoginRequest {
			email: email.to_string(),
			password: password.to_string(),
		};
		let response: LoginResponse = self
			.send(self.client.post(self.url("/login")).json(&body))
			.await?;
		self.token = Some(response.token.clone());
		Ok(response.token)
	}

	pub async fn list_menu(&self) -> Result<Vec<Menu>, ClientError> {
		self.send(self.client.get(self.url("/menu"))).await
	}

	/// Fetch one menu item; `None` when the id does not exist
	pub async fn get_menu(&self, id: i64) -> Result<Option<Menu>, ClientError> {
		self.send(self.client.get(self.url(&format!("/menu/{}", id))))
			.await
	}

	pub async fn create_menu(&self, input: &MenuInput) -> Result<MessageResponse, ClientError> {
		self.send(self.client.post(self.url("/menu")).json(input))
			.await
	}

	pub async fn update_menu(
		&self,
		id: i64,
		input: &MenuInput,
	) -> Result<MessageResponse, ClientError> {
		self.send(self.client.put(self.url(&format!("/menu/{}", id))).json(input))
			.await
	}

	pub async fn delete_menu(&self, id: i64) -> Result<MessageResponse, ClientError> {
		self.send(self.client.delete(self.url(&format!("/menu/{}", id))))
			.await
	}

	pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
		self.send(self.client.get(self.url("/pesanan"))).await
	}

	/// Place an order; the server records a pending cash payment alongside it
	pub async fn create_order(&self, input: &OrderInput) -> Result<CreatedResponse, ClientError> {
		self.send(self.client.post(self.url("/pesanan")).json(input))
			.await
	}

	pub async fn update_order(
		&self,
		id: i64,
		input: &OrderInput,
	) -> Result<MessageResponse, ClientError> {
		self.send(
			self.client
				.put(self.url(&format!("/pesanan/{}", id)))
				.json(input),
		)
		.await
	}

	pub async fn delete_order(&self, id: i64) -> Result<MessageResponse, ClientError> {
		self.send(self.client.delete(self.url(&format!("/pesanan/{}", id))))
			.await
	}

	pub async fn list_payments(&self) -> Result<Vec<Payment>, ClientError> {
		self.send(self.client.get(self.url("/pembayaran"))).await
	}

	pub async fn create_payment(&self, input: &NewPayment) -> Result<CreatedResponse, ClientError> {
		self.send(self.client.post(self.url("/pembayaran")).json(input))
			.await
	}

	pub async fn update_payment(
		&self,
		id: i64,
		update: &PaymentUpdate,
	) -> Result<MessageResponse, ClientError> {
		self.send(
			self.client
				.put(self.url(&format!("/pembayaran/{}", id)))
				.json(update),
		)
		.await
	}

	pub async fn delete_payment(&self, id: i64) -> Result<MessageResponse, ClientError> {
		self.send(
			self.client
				.delete(self.url(&format!("/pembayaran/{}", id))),
		)
		.await
	}

	/// Trigger a payment reconciliation pass on the server
	pub async fn reconcile_payments(&self) -> Result<ReconcileReport, ClientError> {
		self.send(self.client.post(self.url("/pembayaran/reconcile")))
			.await
	}

	pub async fn stats(&self) -> Result<Stats, ClientError> {
		self.send(self.client.get(self.url("/stats"))).await
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
		let request = match &self.token {
			Some(token) => request.bearer_auth(token),
			None => request,
		};

		let response = request
			.send()
			.await
			.map_err(|e| ClientError::Network(format!("Request failed: {}", e)))?;

		let status = response.status();
		if !status.is_success() {
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| format!("HTTP {}", status));
			return Err(match status {
				StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
					ClientError::Authentication(format!("{}: {}", status, error_text))
				}
				StatusCode::BAD_REQUEST => {
					ClientError::InvalidRequest(format!("{}: {}", status, error_text))
				}
				_ => ClientError::Server(format!("{}: {}", status, error_text)),
			});
		}

		response
			.json()
			.await
			.map_err(|e| ClientError::Serialization(format!("Failed to parse response: {}", e)))
	}
}

/// Synchronous client wrapper
///
/// This wraps the async client and runs it in a tokio runtime.
/// For new code, prefer using the async Client directly.
pub struct SyncClient {
	client: Client,
	runtime: tokio::runtime::Runtime,
}

impl SyncClient {
	/// Create a new synchronous client
	pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
		let runtime = tokio::runtime::Runtime::new()
			.map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;
		Ok(Self {
			client: Client::new(base_url)?,
			runtime,
		})
	}

	/// Log in (synchronous)
	pub fn login(&mut self, email: &str, password: &str) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.login(email, password))
	}

	/// List menu items (synchronous)
	pub fn list_menu(&self) -> Result<Vec<Menu>, ClientError> {
		self.runtime.block_on(self.client.list_menu())
	}

	/// Place an order (synchronous)
	pub fn create_order(&self, input: &OrderInput) -> Result<CreatedResponse, ClientError> {
		self.runtime.block_on(self.client.create_order(input))
	}

	/// Fetch dashboard stats (synchronous)
	pub fn stats(&self) -> Result<Stats, ClientError> {
		self.runtime.block_on(self.client.stats())
	}
}
