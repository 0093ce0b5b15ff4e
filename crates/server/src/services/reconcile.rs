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

//! Payment reconciliation
//!
//! Finds orders that have no payment row (an order whose payment insert
//! failed) and inserts the pending cash payment they should have had.

use resto_sdk::types::ReconcileReport;
use serde::Deserialize;
use tracing::{info, warn};

use super::payments::insert_pending_payment;
use crate::{
	db::{Database, Statement},
	error::ApiError,
};

const ORPHAN_ORDERS: &str = "SELECT p.id, p.nama_pelanggan, p.total_harga \
	FROM pesanan p LEFT JOIN pembayaran b ON b.pesanan_id = p.id \
	WHERE b.id IS NULL ORDER BY p.id";

#[derive(Debug, Deserialize)]
struct OrphanOrder {
	id: i64,
	nama_pelanggan: String,
	total_harga: i64,
}

/// Backfills missing payments
pub struct Reconciler {
	db: Database,
}

impl Reconciler {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// One reconciliation pass
	///
	/// A failed insert is logged and counted; the pass continues with the
	/// next order.
	pub async fn run_once(&self) -> Result<ReconcileReport, ApiError> {
		let orphans: Vec<OrphanOrder> = self
			.db
			.execute(Statement::new(ORPHAN_ORDERS))
			.await?
			.decode()?;

		let mut report = ReconcileReport {
			scanned: orphans.len() as u64,
			..Default::default()
		};

		for order in orphans {
			match insert_pending_payment(
				self.db.as_ref(),
				order.id,
				&order.nama_pelanggan,
				order.total_harga,
			)
			.await
			{
				Ok(Some(_)) => report.created += 1,
				// Paid for in the meantime, typically by the order's own insert
				Ok(None) => {}
				Err(e) => {
					warn!(target: "reconciler", order_id = order.id, error = %e, "Payment backfill failed");
					report.failed += 1;
				}
			}
		}

		if report.scanned > 0 {
			info!(
				target: "reconciler",
				scanned = report.scanned,
				created = report.created,
				failed = report.failed,
				"Reconciliation pass finished"
			);
		}
		Ok(report)
	}
}
