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

use tracing::info;

use super::{DbError, SqlExecutor, Statement};

/// Table definitions, applied in order.
///
/// `pembayaran.pesanan_id` is deliberately not a foreign key: orders and
/// payments are linked by convention and cleaned up by the order service.
pub const SCHEMA: &[&str] = &[
	"CREATE TABLE IF NOT EXISTS users (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		email TEXT NOT NULL UNIQUE,
		password TEXT NOT NULL
	)",
	"CREATE TABLE IF NOT EXISTS menu (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		nama_menu TEXT NOT NULL,
		harga INTEGER NOT NULL,
		kategori TEXT DEFAULT ''
	)",
	"CREATE TABLE IF NOT EXISTS pesanan (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		nama_pelanggan TEXT NOT NULL,
		detail_pesanan TEXT,
		total_harga INTEGER NOT NULL
	)",
	"CREATE TABLE IF NOT EXISTS pembayaran (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		pesanan_id INTEGER,
		nama_pelanggan TEXT,
		total_harga INTEGER,
		metode TEXT DEFAULT 'cash',
		status TEXT DEFAULT 'pending'
	)",
];

/// Create any missing tables
pub async fn ensure_schema(db: &dyn SqlExecutor) -> Result<(), DbError> {
	for ddl in SCHEMA {
		db.execute(Statement::new(*ddl)).await?;
	}
	info!(target: "db", tables = SCHEMA.len(), "Schema verified");
	Ok(())
}
