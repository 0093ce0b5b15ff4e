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

use resto_sdk::types::Stats;

use crate::{
	db::{Database, Statement},
	error::ApiError,
};

/// Dashboard counters
pub struct StatsService {
	db: Database,
}

impl StatsService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// Menu count, order count and revenue from paid (`lunas`) payments
	///
	/// Revenue is summed over payments, never orders.
	pub async fn get(&self) -> Result<Stats, ApiError> {
		let menu = self
			.db
			.execute(Statement::new("SELECT COUNT(*) AS total FROM menu"))
			.await?;
		let orders = self
			.db
			.execute(Statement::new("SELECT COUNT(*) AS total FROM pesanan"))
			.await?;
		let revenue = self
			.db
			.execute(
				Statement::new("SELECT SUM(total_harga) AS total FROM pembayaran WHERE status = ?")
					.bind(resto_sdk::types::PAYMENT_STATUS_PAID),
			)
			.await?;

		Ok(Stats {
			total_menu: menu.scalar_i64("total"),
			total_pesanan: orders.scalar_i64("total"),
			total_pendapatan: revenue.scalar_i64("total"),
		})
	}
}
