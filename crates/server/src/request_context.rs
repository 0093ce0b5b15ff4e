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

//! Request identification for log correlation
//!
//! Each request gets a `request_id`: the incoming `X-Request-Id` header when it
//! holds a usable value, otherwise a generated UUIDv4. The id is stored in the
//! request extensions and echoed back on the response.

use actix_web::{HttpMessage, dev::ServiceRequest, http::header::HeaderValue};
use uuid::Uuid;

/// HTTP header name for request ID (`X-Request-Id`)
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Longest caller-supplied id that is accepted as-is
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
	pub request_id: String,
}

impl RequestContext {
	/// Return the request's context, creating and storing one if needed
	pub fn ensure(req: &ServiceRequest) -> Self {
		if let Some(ctx) = req.extensions().get::<RequestContext>() {
			return ctx.clone();
		}

		let request_id = req
			.headers()
			.get(HEADER_REQUEST_ID)
			.and_then(|v| v.to_str().ok())
			.and_then(accept_request_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		let ctx = RequestContext { request_id };
		req.extensions_mut().insert(ctx.clone());
		ctx
	}

	/// Header value for the response
	pub fn header_value(&self) -> Option<HeaderValue> {
		HeaderValue::from_str(&self.request_id).ok()
	}
}

fn accept_request_id(raw: &str) -> Option<String> {
	let trimmed = raw.trim();
	if trimmed.is_empty() || trimmed.len() > MAX_REQUEST_ID_LEN {
		return None;
	}
	Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::test::TestRequest;

	#[test]
	fn incoming_id_is_kept() {
		let req = TestRequest::default()
			.insert_header((HEADER_REQUEST_ID, "abc-123"))
			.to_srv_request();
		assert_eq!(RequestContext::ensure(&req).request_id, "abc-123");
	}

	#[test]
	fn missing_id_is_generated_once() {
		let req = TestRequest::default().to_srv_request();
		let first = RequestContext::ensure(&req);
		let second = RequestContext::ensure(&req);
		assert!(Uuid::parse_str(&first.request_id).is_ok());
		assert_eq!(first, second);
	}

	#[test]
	fn oversized_id_is_replaced() {
		let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
		assert_eq!(accept_request_id(&long), None);
		assert_eq!(accept_request_id("  "), None);
	}
}
