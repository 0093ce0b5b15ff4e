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

use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;
use tracing::error;

use crate::{auth::AuthError, db::DbError};

/// Error types for admin API operations
///
/// Every variant renders as `{"message": "..."}`. Database failures surface
/// the endpoint's message to the client.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("{0}")]
	Validation(String),
	#[error(transparent)]
	Auth(#[from] AuthError),
	#[error(transparent)]
	Database(#[from] DbError),
	#[error("{0}")]
	Internal(String),
}

impl ApiError {
	pub fn validation(message: impl Into<String>) -> Self {
		ApiError::Validation(message.into())
	}

	pub fn internal(message: impl Into<String>) -> Self {
		ApiError::Internal(message.into())
	}
}

impl actix_web::ResponseError for ApiError {
	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::Validation(_) => StatusCode::BAD_REQUEST,
			ApiError::Auth(err) => err.status_code(),
			ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		let status = self.status_code();
		if status.is_server_error() {
			error!(target: "server", error = %self, "Request failed");
		}

		HttpResponse::build(status).json(serde_json::json!({
			"message": self.to_string()
		}))
	}
}
