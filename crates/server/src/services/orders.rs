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

//! Order service
//!
//! Creating an order writes two rows: the order itself and a pending cash
//! payment that snapshots the customer name and total. The two writes are
//! separate statements. If the payment insert fails the order stays and the
//! caller still gets its id; the failure is logged at `error` and the
//! [`Reconciler`](super::Reconciler) backfills the payment later.
//!
//! Updates and deletes touch the linked payment (`pembayaran.pesanan_id`)
//! after the order, also without a transaction.

use resto_sdk::types::Order;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::{optional_text, payments::insert_pending_payment, present_integer, present_text};
use crate::{
	db::{Database, Statement},
	error::ApiError,
};

const INCOMPLETE_ORDER: &str = "incomplete order data";
const INCOMPLETE_UPDATE: &str = "incomplete update data";
const CREATE_FAILED: &str = "failed to create order";

/// Body of `POST /pesanan` and `PUT /pesanan/{id}`
///
/// Column names are accepted as aliases of the dashboard's field names.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderPayload {
	#[serde(alias = "nama_pelanggan")]
	pub customer_name: Option<Value>,
	#[serde(alias = "detail_pesanan")]
	pub items: Option<Value>,
	pub total_harga: Option<Value>,
}

impl OrderPayload {
	fn customer_and_total(&self, message: &str) -> Result<(String, i64), ApiError> {
		let name =
			present_text(self.customer_name.as_ref()).ok_or_else(|| ApiError::validation(message))?;
		let total = present_integer(self.total_harga.as_ref())
			.map_err(|_| ApiError::validation(message))?
			.ok_or_else(|| ApiError::validation(message))?;
		Ok((name, total))
	}

	fn has_items(&self) -> bool {
		match &self.items {
			None | Some(Value::Null) => false,
			Some(Value::Array(_)) | Some(Value::Object(_)) => true,
			other => present_text(other.as_ref()).is_some(),
		}
	}

	/// Stored form of `detail_pesanan`
	fn detail(&self) -> String {
		optional_text(self.items.as_ref())
	}
}

/// Order CRUD with payment side effects
pub struct OrderService {
	db: Database,
}

impl OrderService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// All orders, newest first
	pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
		let result = self
			.db
			.execute(Statement::new("SELECT * FROM pesanan ORDER BY id DESC"))
			.await?;
		Ok(result.decode()?)
	}

	/// Insert an order and its pending payment, returning the order id
	pub async fn create(&self, payload: &OrderPayload) -> Result<i64, ApiError> {
		let (customer_name, total_harga) = payload.customer_and_total(INCOMPLETE_ORDER)?;

		let result = self
			.db
			.execute(
				Statement::new(
					"INSERT INTO pesanan (nama_pelanggan, detail_pesanan, total_harga) VALUES (?, ?, ?)",
				)
				.bind(&customer_name)
				.bind(payload.detail())
				.bind(total_harga),
			)
			.await?;

		let order_id = result
			.last_insert_rowid
			.ok_or_else(|| ApiError::internal(CREATE_FAILED))?;

		match insert_pending_payment(self.db.as_ref(), order_id, &customer_name, total_harga).await {
			Ok(None) => {
				debug!(target: "orders", order_id, "Payment already present for new order");
			}
			Ok(Some(payment_id)) => {
				info!(
					target: "orders",
					order_id,
					payment_id,
					total_harga,
					"Order created with pending payment"
				);
			}
			Err(e) => {
				error!(
					target: "orders",
					order_id,
					error = %e,
					"Order created but payment insert failed"
				);
			}
		}

		Ok(order_id)
	}

	/// Overwrite an order and copy the new name and total to its payment
	pub async fn update(&self, id: i64, payload: &OrderPayload) -> Result<(), ApiError> {
		let (customer_name, total_harga) = payload.customer_and_total(INCOMPLETE_UPDATE)?;
		if id == 0 || !payload.has_items() {
			return Err(ApiError::validation(INCOMPLETE_UPDATE));
		}

		self.db
			.execute(
				Statement::new(
					"UPDATE pesanan SET nama_pelanggan = ?, detail_pesanan = ?, total_harga = ? WHERE id = ?",
				)
				.bind(&customer_name)
				.bind(payload.detail())
				.bind(total_harga)
				.bind(id),
			)
			.await?;

		self.db
			.execute(
				Statement::new(
					"UPDATE pembayaran SET nama_pelanggan = ?, total_harga = ? WHERE pesanan_id = ?",
				)
				.bind(&customer_name)
				.bind(total_harga)
				.bind(id),
			)
			.await?;
		Ok(())
	}

	/// Delete an order and every payment that references it
	pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
		self.db
			.execute(Statement::new("DELETE FROM pesanan WHERE id = ?").bind(id))
			.await?;
		self.db
			.execute(Statement::new("DELETE FROM pembayaran WHERE pesanan_id = ?").bind(id))
			.await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn payload(body: Value) -> OrderPayload {
		serde_json::from_value(body).unwrap()
	}

	#[test]
	fn column_names_are_accepted_as_aliases() {
		let p = payload(json!({
			"nama_pelanggan": "Budi",
			"detail_pesanan": "2x Es Teh",
			"total_harga": "10000"
		}));
		assert_eq!(
			p.customer_and_total(INCOMPLETE_ORDER).unwrap(),
			("Budi".to_string(), 10000)
		);
		assert_eq!(p.detail(), "2x Es Teh");
	}

	#[test]
	fn items_are_serialized_when_not_text() {
		let items = json!([{"nama_menu": "Nasi Goreng", "harga": 20000}]);
		let p = payload(json!({"customer_name": "Budi", "items": items, "total_harga": 20000}));
		let stored: Value = serde_json::from_str(&p.detail()).unwrap();
		assert_eq!(stored, items);
		assert!(p.has_items());
	}

	#[test]
	fn missing_items_store_empty_text() {
		let p = payload(json!({"customer_name": "Budi", "total_harga": 20000}));
		assert_eq!(p.detail(), "");
		assert!(!p.has_items());
	}

	#[test]
	fn missing_total_is_incomplete() {
		let p = payload(json!({"customer_name": "Budi", "items": []}));
		let err = p.customer_and_total(INCOMPLETE_ORDER).unwrap_err();
		assert_eq!(err.to_string(), INCOMPLETE_ORDER);
	}
}
