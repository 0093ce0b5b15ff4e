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

use actix_web::web;
use serde::Deserialize;
use tracing::info;

use crate::{
	auth::{AuthError, TokenIssuer, verify_password},
	db::{Database, Statement},
	error::ApiError,
};

/// Row shape read by login
#[derive(Debug, Deserialize)]
struct UserRow {
	id: i64,
	email: String,
	password: String,
}

/// Credential check and token issuance
pub struct UserService {
	db: Database,
	issuer: Arc<TokenIssuer>,
}

impl UserService {
	pub fn new(db: Database, issuer: Arc<TokenIssuer>) -> Self {
		Self { db, issuer }
	}

	/// Exchange email and password for a session token
	pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
		let user: UserRow = self
			.db
			.execute(Statement::new("SELECT id, email, password FROM users WHERE email = ?").bind(email))
			.await?
			.decode_first()?
			.ok_or(AuthError::UserNotFound)?;

		// bcrypt is CPU-bound, keep it off the worker thread
		let candidate = password.to_string();
		let hash = user.password.clone();
		let matches = web::block(move || verify_password(&candidate, &hash))
			.await
			.map_err(|e| ApiError::internal(format!("Password check failed: {}", e)))?;
		if !matches {
			return Err(AuthError::InvalidCredentials.into());
		}

		let token = self.issuer.issue(user.id, &user.email)?;
		info!(target: "auth", user_id = user.id, "User logged in");
		Ok(token)
	}
}
