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

use resto_sdk::types::Menu;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{optional_text, present_integer, present_text};
use crate::{
	db::{Database, Statement},
	error::ApiError,
};

const MISSING_FIELDS: &str = "missing fields";

/// Body of `POST /menu` and `PUT /menu/{id}`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MenuPayload {
	pub nama_menu: Option<Value>,
	pub harga: Option<Value>,
	pub kategori: Option<Value>,
}

/// Validated menu fields, ready to bind
#[derive(Debug, Clone, PartialEq, Eq)]
struct MenuFields {
	nama_menu: String,
	harga: i64,
	kategori: String,
}

impl MenuPayload {
	fn validate(&self) -> Result<MenuFields, ApiError> {
		let nama_menu =
			present_text(self.nama_menu.as_ref()).ok_or_else(|| ApiError::validation(MISSING_FIELDS))?;
		let harga = present_integer(self.harga.as_ref())
			.map_err(|_| ApiError::validation(MISSING_FIELDS))?
			.ok_or_else(|| ApiError::validation(MISSING_FIELDS))?;

		Ok(MenuFields {
			nama_menu,
			harga,
			kategori: optional_text(self.kategori.as_ref()),
		})
	}
}

/// Catalog CRUD
pub struct MenuService {
	db: Database,
}

impl MenuService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// All menu items, newest first
	pub async fn list(&self) -> Result<Vec<Menu>, ApiError> {
		let result = self
			.db
			.execute(Statement::new("SELECT * FROM menu ORDER BY id DESC"))
			.await?;
		Ok(result.decode()?)
	}

	pub async fn get(&self, id: i64) -> Result<Option<Menu>, ApiError> {
		let result = self
			.db
			.execute(Statement::new("SELECT * FROM menu WHERE id = ?").bind(id))
			.await?;
		Ok(result.decode_first()?)
	}

	/// Insert a menu item; nothing is written when validation fails
	pub async fn create(&self, payload: &MenuPayload) -> Result<Option<i64>, ApiError> {
		let fields = payload.validate()?;

		let result = self
			.db
			.execute(
				Statement::new("INSERT INTO menu (nama_menu, harga, kategori) VALUES (?, ?, ?)")
					.bind(fields.nama_menu)
					.bind(fields.harga)
					.bind(fields.kategori),
			)
			.await?;

		info!(target: "menu", id = ?result.last_insert_rowid, "Menu item created");
		Ok(result.last_insert_rowid)
	}

	/// Overwrite all three fields of a menu item
	pub async fn update(&self, id: i64, payload: &MenuPayload) -> Result<(), ApiError> {
		let fields = payload.validate()?;

		self.db
			.execute(
				Statement::new("UPDATE menu SET nama_menu = ?, harga = ?, kategori = ? WHERE id = ?")
					.bind(fields.nama_menu)
					.bind(fields.harga)
					.bind(fields.kategori)
					.bind(id),
			)
			.await?;
		Ok(())
	}

	pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
		self.db
			.execute(Statement::new("DELETE FROM menu WHERE id = ?").bind(id))
			.await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn payload(body: Value) -> MenuPayload {
		serde_json::from_value(body).unwrap()
	}

	#[test]
	fn kategori_defaults_to_empty() {
		let fields = payload(json!({"nama_menu": "Es Teh", "harga": "5000"}))
			.validate()
			.unwrap();
		assert_eq!(
			fields,
			MenuFields {
				nama_menu: "Es Teh".to_string(),
				harga: 5000,
				kategori: String::new(),
			}
		);
	}

	#[test]
	fn missing_or_zero_price_is_rejected() {
		for body in [
			json!({"nama_menu": "Es Teh"}),
			json!({"nama_menu": "Es Teh", "harga": 0}),
			json!({"nama_menu": "Es Teh", "harga": "gratis"}),
			json!({"nama_menu": "", "harga": 5000}),
		] {
			let err = payload(body).validate().unwrap_err();
			assert_eq!(err.to_string(), MISSING_FIELDS);
		}
	}

	#[test]
	fn unknown_kategori_is_kept() {
		let fields = payload(json!({"nama_menu": "Kerupuk", "harga": 2000, "kategori": "camilan"}))
			.validate()
			.unwrap();
		assert_eq!(fields.kategori, "camilan");
	}
}
