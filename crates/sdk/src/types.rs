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

//! Wire types shared by the admin server and its clients.
//!
//! Field names follow the database columns (`nama_menu`, `harga`, `pesanan_id`, ...)
//! because the dashboard reads rows exactly as the server returns them.

use serde::{Deserialize, Serialize};

/// Payment status for an order that has not been settled yet
pub const PAYMENT_STATUS_PENDING: &str = "pending";

/// Payment status meaning "paid in full"; the only status counted as revenue
pub const PAYMENT_STATUS_PAID: &str = "lunas";

/// Default payment method for automatically created payments
pub const PAYMENT_METHOD_CASH: &str = "cash";

/// QR-code payment method offered by the dashboard
pub const PAYMENT_METHOD_QRIS: &str = "qris";

/// Menu catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
	pub id: i64,
	pub nama_menu: String,
	/// Price in whole currency units
	pub harga: i64,
	#[serde(default)]
	pub kategori: Option<String>,
}

/// Customer order
///
/// `detail_pesanan` is a snapshot of the chosen items taken when the order
/// was placed, usually a JSON array of [`OrderItem`]. It is never re-read
/// from the live menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	pub id: i64,
	pub nama_pelanggan: String,
	#[serde(default)]
	pub detail_pesanan: Option<String>,
	pub total_harga: i64,
}

impl Order {
	/// Parse the item snapshot, if it was stored as a JSON array
	pub fn items(&self) -> Option<Vec<OrderItem>> {
		self.detail_pesanan
			.as_deref()
			.and_then(|raw| serde_json::from_str(raw).ok())
	}
}

/// Payment record linked to an order by `pesanan_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
	pub id: i64,
	#[serde(default)]
	pub pesanan_id: Option<i64>,
	#[serde(default)]
	pub nama_pelanggan: Option<String>,
	#[serde(default)]
	pub total_harga: Option<i64>,
	#[serde(default)]
	pub metode: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
}

impl Payment {
	pub fn is_paid(&self) -> bool {
		self.status.as_deref() == Some(PAYMENT_STATUS_PAID)
	}
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
	#[serde(rename = "totalMenu")]
	pub total_menu: i64,
	#[serde(rename = "totalPesanan")]
	pub total_pesanan: i64,
	/// Sum of `total_harga` over payments with status `lunas`
	#[serde(rename = "totalPendapatan")]
	pub total_pendapatan: i64,
}

/// Item snapshot stored inside an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
	pub nama_menu: String,
	pub harga: i64,
}

impl From<&Menu> for OrderItem {
	fn from(menu: &Menu) -> Self {
		Self {
			nama_menu: menu.nama_menu.clone(),
			harga: menu.harga,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
	#[serde(default)]
	pub message: Option<String>,
	pub token: String,
}

/// Body for creating or replacing a menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuInput {
	pub nama_menu: String,
	pub harga: i64,
	#[serde(default)]
	pub kategori: String,
}

/// Body for creating or replacing an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInput {
	pub customer_name: String,
	pub items: Vec<OrderItem>,
	pub total_harga: i64,
}

impl OrderInput {
	/// Build an order whose total is the sum of the item snapshots
	pub fn from_items(customer_name: impl Into<String>, items: Vec<OrderItem>) -> Self {
		let total_harga = items.iter().map(|item| item.harga).sum();
		Self {
			customer_name: customer_name.into(),
			items,
			total_harga,
		}
	}
}

/// Body for manually recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
	pub pesanan_id: i64,
	pub nama_pelanggan: String,
	pub total_harga: i64,
	pub metode: String,
}

/// Body for changing a payment's method and status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdate {
	pub metode: String,
	pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

/// Response for endpoints that insert a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
	pub message: String,
	pub id: i64,
}

/// Outcome of one payment reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
	/// Orders found without a payment
	pub scanned: u64,
	/// Pending payments inserted
	pub created: u64,
	/// Inserts that failed and will be retried on the next pass
	pub failed: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stats_use_dashboard_field_names() {
		let stats = Stats {
			total_menu: 3,
			total_pesanan: 2,
			total_pendapatan: 20000,
		};
		let json = serde_json::to_value(stats).unwrap();
		assert_eq!(
			json,
			serde_json::json!({"totalMenu": 3, "totalPesanan": 2, "totalPendapatan": 20000})
		);
	}

	#[test]
	fn order_input_sums_item_prices() {
		let input = OrderInput::from_items(
			"Budi",
			vec![
				OrderItem {
					nama_menu: "Nasi Goreng".to_string(),
					harga: 20000,
				},
				OrderItem {
					nama_menu: "Es Teh".to_string(),
					harga: 5000,
				},
			],
		);
		assert_eq!(input.total_harga, 25000);
	}

	#[test]
	fn order_items_parse_json_snapshot() {
		let order = Order {
			id: 1,
			nama_pelanggan: "Budi".to_string(),
			detail_pesanan: Some(r#"[{"nama_menu":"Nasi Goreng","harga":20000}]"#.to_string()),
			total_harga: 20000,
		};
		let items = order.items().unwrap();
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].nama_menu, "Nasi Goreng");

		let legacy = Order {
			detail_pesanan: Some("Nasi Goreng, Es Teh".to_string()),
			..order
		};
		assert!(legacy.items().is_none());
	}

	#[test]
	fn payment_defaults_tolerate_missing_columns() {
		let payment: Payment = serde_json::from_value(serde_json::json!({"id": 7})).unwrap();
		assert_eq!(payment.id, 7);
		assert!(payment.pesanan_id.is_none());
		assert!(!payment.is_paid());
	}
}
