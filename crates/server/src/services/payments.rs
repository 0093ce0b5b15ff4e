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

use resto_sdk::types::{
	PAYMENT_METHOD_CASH, PAYMENT_METHOD_QRIS, PAYMENT_STATUS_PAID, PAYMENT_STATUS_PENDING, Payment,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{optional_text, present_integer, present_text};
use crate::{
	db::{Database, DbError, SqlExecutor, Statement},
	error::ApiError,
};

const INCOMPLETE_PAYMENT: &str = "incomplete payment data";

/// Body of `POST /pembayaran`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaymentPayload {
	pub pesanan_id: Option<Value>,
	pub nama_pelanggan: Option<Value>,
	pub total_harga: Option<Value>,
	pub metode: Option<Value>,
}

/// Body of `PUT /pembayaran/{id}`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaymentUpdatePayload {
	pub metode: Option<Value>,
	pub status: Option<Value>,
}

/// Insert the pending cash payment that accompanies a new order
///
/// The insert is skipped when the order already has a payment, so order
/// creation and a concurrent reconciliation pass cannot both add one.
/// Returns `None` when nothing was inserted.
pub(crate) async fn insert_pending_payment(
	db: &dyn SqlExecutor,
	pesanan_id: i64,
	nama_pelanggan: &str,
	total_harga: i64,
) -> Result<Option<i64>, DbError> {
	let result = db
		.execute(
			Statement::new(
				"INSERT INTO pembayaran (pesanan_id, nama_pelanggan, total_harga, metode, status) \
				SELECT ?, ?, ?, ?, ? \
				WHERE NOT EXISTS (SELECT 1 FROM pembayaran WHERE pesanan_id = ?)",
			)
			.bind(pesanan_id)
			.bind(nama_pelanggan)
			.bind(total_harga)
			.bind(PAYMENT_METHOD_CASH)
			.bind(PAYMENT_STATUS_PENDING)
			.bind(pesanan_id),
		)
		.await?;

	if result.rows_affected == 0 {
		return Ok(None);
	}
	Ok(result.last_insert_rowid)
}

/// Payment listing and status changes
pub struct PaymentService {
	db: Database,
}

impl PaymentService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// All payments, newest first
	pub async fn list(&self) -> Result<Vec<Payment>, ApiError> {
		let result = self
			.db
			.execute(Statement::new("SELECT * FROM pembayaran ORDER BY id DESC"))
			.await?;
		Ok(result.decode()?)
	}

	/// Record a payment by hand; it always starts as pending
	pub async fn create(&self, payload: &PaymentPayload) -> Result<Option<i64>, ApiError> {
		let pesanan_id = present_integer(payload.pesanan_id.as_ref())
			.map_err(|_| ApiError::validation(INCOMPLETE_PAYMENT))?
			.ok_or_else(|| ApiError::validation(INCOMPLETE_PAYMENT))?;
		let total_harga = present_integer(payload.total_harga.as_ref())
			.map_err(|_| ApiError::validation(INCOMPLETE_PAYMENT))?
			.ok_or_else(|| ApiError::validation(INCOMPLETE_PAYMENT))?;
		let metode =
			present_text(payload.metode.as_ref()).unwrap_or_else(|| PAYMENT_METHOD_CASH.to_string());

		let result = self
			.db
			.execute(
				Statement::new(
					"INSERT INTO pembayaran (pesanan_id, nama_pelanggan, total_harga, metode, status) VALUES (?, ?, ?, ?, ?)",
				)
				.bind(pesanan_id)
				.bind(optional_text(payload.nama_pelanggan.as_ref()))
				.bind(total_harga)
				.bind(metode)
				.bind(PAYMENT_STATUS_PENDING),
			)
			.await?;

		info!(target: "payments", pesanan_id, id = ?result.last_insert_rowid, "Payment recorded");
		Ok(result.last_insert_rowid)
	}

	/// Overwrite method and status
	///
	/// Any text is accepted for both fields. Values other than the known
	/// methods and statuses are stored as sent.
	pub async fn update(&self, id: i64, payload: &PaymentUpdatePayload) -> Result<(), ApiError> {
		let metode = optional_text(payload.metode.as_ref());
		let status = optional_text(payload.status.as_ref());

		if !is_known_method(&metode) || !is_known_status(&status) {
			debug!(target: "payments", id, %metode, %status, "Unrecognized payment method or status");
		}

		self.db
			.execute(
				Statement::new("UPDATE pembayaran SET metode = ?, status = ? WHERE id = ?")
					.bind(metode)
					.bind(status)
					.bind(id),
			)
			.await?;
		Ok(())
	}

	pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
		self.db
			.execute(Statement::new("DELETE FROM pembayaran WHERE id = ?").bind(id))
			.await?;
		Ok(())
	}
}

fn is_known_method(metode: &str) -> bool {
	metode == PAYMENT_METHOD_CASH || metode == PAYMENT_METHOD_QRIS
}

fn is_known_status(status: &str) -> bool {
	status == PAYMENT_STATUS_PENDING || status == PAYMENT_STATUS_PAID
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_values() {
		assert!(is_known_method("qris"));
		assert!(!is_known_method("transfer"));
		assert!(is_known_status("lunas"));
		assert!(!is_known_status(""));
	}
}
