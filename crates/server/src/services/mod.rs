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

//! Business services
//!
//! Each service owns a [`Database`](crate::db::Database) handle and issues
//! its statements sequentially. Request bodies arrive as loosely typed JSON
//! (the dashboard sends prices as numbers or strings), so the payload structs
//! here keep raw [`Value`]s and the helpers below decide what counts as
//! present.

pub mod menu;
pub mod orders;
pub mod payments;
pub mod reconcile;
pub mod stats;
pub mod users;

use serde_json::Value;

pub use menu::{MenuPayload, MenuService};
pub use orders::{OrderPayload, OrderService};
pub use payments::{PaymentPayload, PaymentService, PaymentUpdatePayload};
pub use reconcile::Reconciler;
pub use stats::StatsService;
pub use users::UserService;

/// Non-empty text, or a non-zero number rendered as text
pub(crate) fn present_text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
		Value::Bool(true) => Some("true".to_string()),
		_ => None,
	}
}

/// Text for an optional column; absent and null become ""
pub(crate) fn optional_text(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(s)) => s.clone(),
		Some(other) => other.to_string(),
	}
}

/// Integer coercion: numbers truncate, numeric strings parse
///
/// Returns `Ok(None)` for absent, null, empty and zero values. A value that is
/// present but not numeric is an error carrying the raw text.
pub(crate) fn present_integer(value: Option<&Value>) -> Result<Option<i64>, String> {
	let parsed = match value {
		None | Some(Value::Null) => return Ok(None),
		Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
		Some(Value::String(s)) => {
			let s = s.trim();
			if s.is_empty() {
				return Ok(None);
			}
			s.parse::<i64>()
				.ok()
				.or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
		}
		Some(other) => return Err(other.to_string()),
	};

	match parsed {
		Some(0) => Ok(None),
		Some(n) => Ok(Some(n)),
		None => Err(value.map(Value::to_string).unwrap_or_default()),
	}
}
