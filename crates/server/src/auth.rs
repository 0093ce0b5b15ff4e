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

//! Session tokens and the bearer-token guard
//!
//! # Identity Model
//!
//! - **Token**: HS256 JWT issued on login, carrying the user id and email and
//!   expiring after `TOKEN_TTL_HOURS` (24h by default)
//! - **Identity**: the verified claims, attached to the request extensions for
//!   handlers (`web::ReqData<Identity>`)
//! - **AuthPolicy**: which routes skip the guard; this is configuration, so
//!   deployments can keep menu reads or order intake public
//!
//! # Failure Modes
//!
//! - No `Authorization` header, or no token after the scheme: 401 `access denied`
//! - Token fails signature or expiry checks: 403 `session expired`
//!
//! The guard answers before the wrapped service is called, so a rejected
//! request never reaches a handler or the database.

use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::{
	Error, HttpMessage, ResponseError,
	body::EitherBody,
	dev::{Service, ServiceRequest, ServiceResponse, Transform},
	http::{Method, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
	config::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS},
	error::ApiError,
};

/// Error types for authentication operations
#[derive(Debug, Error)]
pub enum AuthError {
	#[error("access denied")]
	MissingToken,
	#[error("session expired")]
	InvalidToken(String),
	#[error("email not registered")]
	UserNotFound,
	#[error("invalid credentials")]
	InvalidCredentials,
	#[error("Failed to issue token: {0}")]
	TokenCreation(String),
	#[error("Password hashing failed: {0}")]
	Hashing(String),
}

impl AuthError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			AuthError::MissingToken | AuthError::UserNotFound | AuthError::InvalidCredentials => {
				StatusCode::UNAUTHORIZED
			}
			AuthError::InvalidToken(_) => StatusCode::FORBIDDEN,
			AuthError::TokenCreation(_) | AuthError::Hashing(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// User id
	pub sub: i64,
	pub email: String,
	/// Issued at (unix seconds)
	pub iat: i64,
	/// Expiry (unix seconds)
	pub exp: i64,
}

/// Authenticated caller, available to handlers through request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
	pub user_id: i64,
	pub email: String,
}

impl From<Claims> for Identity {
	fn from(claims: Claims) -> Self {
		Self {
			user_id: claims.sub,
			email: claims.email,
		}
	}
}

/// Issues and verifies HS256 session tokens
pub struct TokenIssuer {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	ttl: Duration,
}

impl TokenIssuer {
	/// `ttl_hours` is clamped to `1..=MAX_TOKEN_TTL_HOURS`
	pub fn new(secret: &str, ttl_hours: i64) -> Self {
		let ttl_hours = ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS);
		Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			ttl: Duration::try_hours(ttl_hours).unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_TTL_HOURS)),
		}
	}

	/// Issue a token valid from now
	pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
		self.issue_at(user_id, email, Utc::now())
	}

	/// Issue a token as if it had been created at `issued_at`
	pub fn issue_at(
		&self,
		user_id: i64,
		email: &str,
		issued_at: DateTime<Utc>,
	) -> Result<String, AuthError> {
		let claims = Claims {
			sub: user_id,
			email: email.to_string(),
			iat: issued_at.timestamp(),
			exp: issued_at
				.checked_add_signed(self.ttl)
				.ok_or_else(|| AuthError::TokenCreation("token expiry out of range".to_string()))?
				.timestamp(),
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(|e| AuthError::TokenCreation(e.to_string()))
	}

	/// Check signature and expiry, returning the claims
	pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
		let validation = Validation::new(Algorithm::HS256);
		decode::<Claims>(token, &self.decoding_key, &validation)
			.map(|data| data.claims)
			.map_err(|e| AuthError::InvalidToken(e.to_string()))
	}
}

/// Hash a password for storage in `users.password`
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
	bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a plaintext password with a stored bcrypt hash
///
/// An unreadable hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
	bcrypt::verify(password, hash).unwrap_or(false)
}

/// Token part of an `Authorization` header value (`Bearer <token>`)
pub fn bearer_token(header_value: &str) -> Option<&str> {
	header_value.split_whitespace().nth(1)
}

/// Verify the request's bearer token
pub fn authenticate(
	headers: &header::HeaderMap,
	issuer: &TokenIssuer,
) -> Result<Identity, AuthError> {
	let token = headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(bearer_token)
		.ok_or(AuthError::MissingToken)?;

	issuer.verify(token).map(Identity::from)
}

/// Routes that bypass the guard
#[derive(Debug, Clone)]
pub struct AuthPolicy {
	/// Normalized API prefix ("" or "/api")
	pub prefix: String,
	/// `GET /menu` and `GET /menu/{id}` are public
	pub public_menu_read: bool,
	/// `POST /pesanan` is public
	pub public_order_create: bool,
}

impl AuthPolicy {
	pub fn is_public(&self, method: &Method, path: &str) -> bool {
		if *method == Method::OPTIONS {
			return true;
		}

		let Some(route) = path.strip_prefix(self.prefix.as_str()) else {
			return false;
		};
		let route = route.trim_end_matches('/');

		match (method, route) {
			(&Method::POST, "/login") => true,
			(&Method::GET, "/menu") => self.public_menu_read,
			(&Method::GET, r) if r.starts_with("/menu/") => self.public_menu_read,
			(&Method::POST, "/pesanan") => self.public_order_create,
			_ => false,
		}
	}
}

/// Bearer-token guard for actix-web
pub struct AuthGuard {
	issuer: Arc<TokenIssuer>,
	policy: AuthPolicy,
}

impl AuthGuard {
	pub fn new(issuer: Arc<TokenIssuer>, policy: AuthPolicy) -> Self {
		Self { issuer, policy }
	}
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = Error;
	type InitError = ();
	type Transform = AuthGuardInner<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ready(Ok(AuthGuardInner {
			service: Rc::new(service),
			issuer: self.issuer.clone(),
			policy: Rc::new(self.policy.clone()),
		}))
	}
}

pub struct AuthGuardInner<S> {
	service: Rc<S>,
	issuer: Arc<TokenIssuer>,
	policy: Rc<AuthPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardInner<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = Error;
	type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

	fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.service.poll_ready(cx)
	}

	fn call(&self, req: ServiceRequest) -> Self::Future {
		let service = self.service.clone();
		let issuer = self.issuer.clone();
		let policy = self.policy.clone();

		Box::pin(async move {
			if policy.is_public(req.method(), req.path()) {
				let res = service.call(req).await?;
				return Ok(res.map_into_left_body());
			}

			match authenticate(req.headers(), &issuer) {
				Ok(identity) => {
					req.extensions_mut().insert(identity);
					let res = service.call(req).await?;
					Ok(res.map_into_left_body())
				}
				Err(err) => {
					debug!(
						target: "auth",
						method = %req.method(),
						path = %req.path(),
						reason = ?err,
						"Request rejected by auth guard"
					);
					let response = ApiError::from(err).error_response();
					Ok(req.into_response(response).map_into_right_body())
				}
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::header::{HeaderMap, HeaderValue};

	fn policy() -> AuthPolicy {
		AuthPolicy {
			prefix: "/api".to_string(),
			public_menu_read: true,
			public_order_create: false,
		}
	}

	#[test]
	fn token_round_trip_carries_identity() {
		let issuer = TokenIssuer::new("secret", 24);
		let token = issuer.issue(7, "admin@resto.id").unwrap();
		let claims = issuer.verify(&token).unwrap();
		assert_eq!(claims.sub, 7);
		assert_eq!(claims.email, "admin@resto.id");
		assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
	}

	#[test]
	fn out_of_range_ttl_is_clamped() {
		let issuer = TokenIssuer::new("secret", i64::MAX);
		let now = Utc::now();
		let claims = issuer
			.verify(&issuer.issue_at(1, "admin@resto.id", now).unwrap())
			.unwrap();
		assert_eq!(claims.exp - claims.iat, MAX_TOKEN_TTL_HOURS * 3600);

		let err = issuer
			.issue_at(1, "admin@resto.id", DateTime::<Utc>::MAX_UTC)
			.unwrap_err();
		assert!(matches!(err, AuthError::TokenCreation(_)));
	}

	#[test]
	fn expired_token_is_rejected() {
		let issuer = TokenIssuer::new("secret", 24);
		let token = issuer
			.issue_at(7, "admin@resto.id", Utc::now() - Duration::hours(25))
			.unwrap();
		assert!(matches!(
			issuer.verify(&token),
			Err(AuthError::InvalidToken(_))
		));
	}

	#[test]
	fn token_from_other_secret_is_rejected() {
		let issuer = TokenIssuer::new("secret", 24);
		let other = TokenIssuer::new("other-secret", 24);
		let token = other.issue(7, "admin@resto.id").unwrap();
		assert!(issuer.verify(&token).is_err());
	}

	#[test]
	fn bearer_token_takes_second_part() {
		assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
		assert_eq!(bearer_token("Bearer"), None);
		assert_eq!(bearer_token(""), None);
	}

	#[test]
	fn missing_header_is_missing_token() {
		let issuer = TokenIssuer::new("secret", 24);
		let headers = HeaderMap::new();
		assert!(matches!(
			authenticate(&headers, &issuer),
			Err(AuthError::MissingToken)
		));

		let mut headers = HeaderMap::new();
		headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
		assert!(matches!(
			authenticate(&headers, &issuer),
			Err(AuthError::InvalidToken(_))
		));
	}

	#[test]
	fn policy_exposes_login_and_menu_reads() {
		let policy = policy();
		assert!(policy.is_public(&Method::POST, "/api/login"));
		assert!(policy.is_public(&Method::GET, "/api/menu"));
		assert!(policy.is_public(&Method::GET, "/api/menu/3"));
		assert!(!policy.is_public(&Method::POST, "/api/menu"));
		assert!(!policy.is_public(&Method::POST, "/api/pesanan"));
		assert!(!policy.is_public(&Method::GET, "/api/stats"));
		assert!(!policy.is_public(&Method::GET, "/menu"));
	}

	#[test]
	fn policy_follows_configuration() {
		let policy = AuthPolicy {
			prefix: String::new(),
			public_menu_read: false,
			public_order_create: true,
		};
		assert!(!policy.is_public(&Method::GET, "/menu"));
		assert!(policy.is_public(&Method::POST, "/pesanan"));
		assert!(policy.is_public(&Method::POST, "/login/"));
	}

	#[test]
	fn password_hash_verifies() {
		let hash = hash_password("rahasia", 4).unwrap();
		assert!(verify_password("rahasia", &hash));
		assert!(!verify_password("salah", &hash));
		assert!(!verify_password("rahasia", "not-a-bcrypt-hash"));
	}
}
