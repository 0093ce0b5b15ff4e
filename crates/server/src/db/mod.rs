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

//! Database Gateway
//!
//! Services talk to storage through the [`SqlExecutor`] trait: one
//! parameterized statement in, one [`QueryResult`] out. The production
//! implementation is [`PipelineClient`], which submits each statement to a
//! remote pipelined SQL endpoint over HTTP. The executor is constructed once
//! at startup and injected into every service as a [`Database`] handle.
//!
//! # Arguments
//!
//! Positional arguments are an explicit tagged union ([`SqlArg`]) chosen from
//! the value's type at the call site: integers are sent as integers and
//! everything else as text. Absent values (`None`) become empty text rather
//! than an error.

pub mod pipeline;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

pub use pipeline::PipelineClient;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
	/// The endpoint rejected the statement
	#[error("{0}")]
	Statement(String),
	#[error("Database request failed: {0}")]
	Transport(String),
	#[error("Database endpoint returned HTTP {status}: {body}")]
	Http { status: u16, body: String },
	#[error("Invalid database response: {0}")]
	Decode(String),
	#[error("Invalid database configuration: {0}")]
	Config(String),
}

/// Positional statement argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArg {
	Integer(i64),
	Text(String),
}

impl From<i64> for SqlArg {
	fn from(value: i64) -> Self {
		SqlArg::Integer(value)
	}
}

impl From<i32> for SqlArg {
	fn from(value: i32) -> Self {
		SqlArg::Integer(i64::from(value))
	}
}

impl From<u32> for SqlArg {
	fn from(value: u32) -> Self {
		SqlArg::Integer(i64::from(value))
	}
}

impl From<&str> for SqlArg {
	fn from(value: &str) -> Self {
		SqlArg::Text(value.to_string())
	}
}

impl From<String> for SqlArg {
	fn from(value: String) -> Self {
		SqlArg::Text(value)
	}
}

impl From<&String> for SqlArg {
	fn from(value: &String) -> Self {
		SqlArg::Text(value.clone())
	}
}

impl<T: Into<SqlArg>> From<Option<T>> for SqlArg {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(inner) => inner.into(),
			None => SqlArg::Text(String::new()),
		}
	}
}

/// SQL text plus its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
	pub sql: String,
	pub args: Vec<SqlArg>,
}

impl Statement {
	pub fn new(sql: impl Into<String>) -> Self {
		Self {
			sql: sql.into(),
			args: Vec::new(),
		}
	}

	/// Append the next positional argument
	pub fn bind(mut self, arg: impl Into<SqlArg>) -> Self {
		self.args.push(arg.into());
		self
	}
}

/// One row, keyed by column name
pub type Row = Map<String, Value>;

/// Decoded result of a single statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
	pub columns: Vec<String>,
	pub rows: Vec<Row>,
	pub rows_affected: u64,
	/// Primary key assigned by the most recent insert, when the endpoint reports one
	pub last_insert_rowid: Option<i64>,
}

impl QueryResult {
	/// Deserialize every row into `T`
	pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>, DbError> {
		self.rows
			.into_iter()
			.map(|row| {
				serde_json::from_value(Value::Object(row))
					.map_err(|e| DbError::Decode(format!("Row does not match record: {}", e)))
			})
			.collect()
	}

	/// Deserialize the first row into `T`, if any
	pub fn decode_first<T: DeserializeOwned>(self) -> Result<Option<T>, DbError> {
		Ok(self.decode()?.into_iter().next())
	}

	/// Integer value of `column` in the first row; null or missing reads as 0
	pub fn scalar_i64(&self, column: &str) -> i64 {
		self.rows
			.first()
			.and_then(|row| row.get(column))
			.and_then(|value| match value {
				Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
				Value::String(s) => s.parse().ok(),
				_ => None,
			})
			.unwrap_or(0)
	}
}

/// Executes one statement against the backing store
#[async_trait]
pub trait SqlExecutor: Send + Sync {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError>;
}

/// Shared executor handle injected into services
pub type Database = Arc<dyn SqlExecutor>;

#[cfg(test)]
mod tests {
	use super::*;
	use serde::Deserialize;

	#[test]
	fn absent_values_bind_as_empty_text() {
		let stmt = Statement::new("INSERT INTO menu (nama_menu, harga, kategori) VALUES (?, ?, ?)")
			.bind("Nasi Goreng")
			.bind(20000_i64)
			.bind(None::<String>);
		assert_eq!(
			stmt.args,
			vec![
				SqlArg::Text("Nasi Goreng".to_string()),
				SqlArg::Integer(20000),
				SqlArg::Text(String::new()),
			]
		);
	}

	#[derive(Debug, Deserialize, PartialEq)]
	struct Item {
		id: i64,
		name: String,
	}

	#[test]
	fn rows_decode_into_records() {
		let mut row = Row::new();
		row.insert("id".to_string(), Value::from(3));
		row.insert("name".to_string(), Value::from("Es Teh"));
		let result = QueryResult {
			columns: vec!["id".to_string(), "name".to_string()],
			rows: vec![row],
			..Default::default()
		};
		let items: Vec<Item> = result.decode().unwrap();
		assert_eq!(
			items,
			vec![Item {
				id: 3,
				name: "Es Teh".to_string()
			}]
		);
	}

	#[test]
	fn scalar_reads_null_as_zero() {
		let mut row = Row::new();
		row.insert("total".to_string(), Value::Null);
		let result = QueryResult {
			columns: vec!["total".to_string()],
			rows: vec![row],
			..Default::default()
		};
		assert_eq!(result.scalar_i64("total"), 0);
		assert_eq!(QueryResult::default().scalar_i64("total"), 0);
	}
}
