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

//! HTTP client for a remote pipelined SQL endpoint
//!
//! Every [`SqlExecutor::execute`] call is one `POST {base}/v2/pipeline` carrying
//! two sub-requests: `execute` for the statement and `close` for the stream.
//! No baton is kept, so calls are independent and nothing stays open between
//! them.
//!
//! # Wire Format
//!
//! ```json
//! {"baton": null, "requests": [
//!   {"type": "execute", "stmt": {"sql": "...", "args": [{"type": "integer", "value": "1"}]}},
//!   {"type": "close"}
//! ]}
//! ```
//!
//! The response holds one result per sub-request. An execute result carries
//! `cols` (column metadata) and `rows` (arrays of typed cells) in parallel;
//! they are zipped into one JSON object per row.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{DbError, QueryResult, Row, SqlArg, SqlExecutor, Statement};

/// Path of the pipeline endpoint, relative to the database URL
const PIPELINE_PATH: &str = "/v2/pipeline";

/// Typed cell or argument value as it appears on the wire
///
/// Integers travel as decimal strings so 64-bit values survive JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireValue {
	Null,
	Integer { value: String },
	Float { value: f64 },
	Text { value: String },
	Blob { base64: String },
}

impl From<&SqlArg> for WireValue {
	fn from(arg: &SqlArg) -> Self {
		match arg {
			SqlArg::Integer(n) => WireValue::Integer {
				value: n.to_string(),
			},
			SqlArg::Text(s) => WireValue::Text { value: s.clone() },
		}
	}
}

impl WireValue {
	fn into_json(self) -> Result<Value, DbError> {
		Ok(match self {
			WireValue::Null => Value::Null,
			WireValue::Integer { value } => {
				let n: i64 = value
					.parse()
					.map_err(|_| DbError::Decode(format!("Invalid integer cell: {}", value)))?;
				Value::from(n)
			}
			WireValue::Float { value } => Value::from(value),
			WireValue::Text { value } => Value::String(value),
			WireValue::Blob { base64 } => Value::String(base64),
		})
	}
}

#[derive(Debug, Serialize)]
struct PipelineRequest {
	baton: Option<String>,
	requests: Vec<StreamRequest>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamRequest {
	Execute { stmt: WireStatement },
	Close,
}

#[derive(Debug, Serialize)]
struct WireStatement {
	sql: String,
	args: Vec<WireValue>,
	want_rows: bool,
}

#[derive(Debug, Deserialize)]
struct PipelineResponse {
	results: Vec<StreamResult>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamResult {
	Ok { response: StreamResponse },
	Error { error: StreamError },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamResponse {
	Execute {
		result: StatementResult,
	},
	#[serde(other)]
	Other,
}

#[derive(Debug, Deserialize)]
struct StreamError {
	message: String,
	#[serde(default)]
	code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
	#[serde(default)]
	cols: Vec<WireColumn>,
	#[serde(default)]
	rows: Vec<Vec<WireValue>>,
	#[serde(default)]
	affected_row_count: u64,
	#[serde(default)]
	last_insert_rowid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireColumn {
	#[serde(default)]
	name: Option<String>,
}

/// Turn a configured database URL into the pipeline endpoint URL
///
/// `libsql://` URLs are served over HTTPS; `http://` and `https://` are used
/// as given.
pub fn pipeline_url(database_url: &str) -> Result<String, DbError> {
	let trimmed = database_url.trim().trim_end_matches('/');
	let base = if let Some(host) = trimmed.strip_prefix("libsql://") {
		format!("https://{}", host)
	} else if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
		trimmed.to_string()
	} else {
		return Err(DbError::Config(format!(
			"Unsupported database URL scheme: {}",
			database_url
		)));
	};
	Ok(format!("{}{}", base, PIPELINE_PATH))
}

fn encode_request(statement: &Statement) -> PipelineRequest {
	PipelineRequest {
		baton: None,
		requests: vec![
			StreamRequest::Execute {
				stmt: WireStatement {
					sql: statement.sql.clone(),
					args: statement.args.iter().map(WireValue::from).collect(),
					want_rows: true,
				},
			},
			StreamRequest::Close,
		],
	}
}

fn decode_response(response: PipelineResponse) -> Result<QueryResult, DbError> {
	let first = response
		.results
		.into_iter()
		.next()
		.ok_or_else(|| DbError::Decode("Pipeline response has no results".to_string()))?;

	let result = match first {
		StreamResult::Error { error } => {
			debug!(target: "db", code = ?error.code, "Statement rejected by endpoint");
			return Err(DbError::Statement(error.message));
		}
		StreamResult::Ok {
			response: StreamResponse::Execute { result },
		} => result,
		StreamResult::Ok { .. } => {
			return Err(DbError::Decode(
				"First pipeline result is not an execute result".to_string(),
			));
		}
	};

	let columns: Vec<String> = result
		.cols
		.into_iter()
		.enumerate()
		.map(|(idx, col)| col.name.unwrap_or_else(|| format!("column{}", idx)))
		.collect();

	let mut rows = Vec::with_capacity(result.rows.len());
	for cells in result.rows {
		if cells.len() != columns.len() {
			return Err(DbError::Decode(format!(
				"Row has {} cells but {} columns were declared",
				cells.len(),
				columns.len()
			)));
		}
		let mut row = Row::new();
		for (name, cell) in columns.iter().zip(cells) {
			row.insert(name.clone(), cell.into_json()?);
		}
		rows.push(row);
	}

	let last_insert_rowid = match result.last_insert_rowid {
		Some(raw) => Some(
			raw.parse::<i64>()
				.map_err(|_| DbError::Decode(format!("Invalid last_insert_rowid: {}", raw)))?,
		),
		None => None,
	};

	Ok(QueryResult {
		columns,
		rows,
		rows_affected: result.affected_row_count,
		last_insert_rowid,
	})
}

/// Executor backed by a remote pipelined SQL endpoint
#[derive(Clone)]
pub struct PipelineClient {
	endpoint: String,
	auth_token: Option<String>,
	client: ReqwestClient,
}

impl PipelineClient {
	/// Create a client for `database_url`
	///
	/// The HTTP client enforces `timeout` per call; there is no retry.
	pub fn new(
		database_url: &str,
		auth_token: Option<String>,
		timeout: Duration,
	) -> Result<Self, DbError> {
		let endpoint = pipeline_url(database_url)?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| DbError::Config(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			endpoint,
			auth_token: auth_token.filter(|token| !token.trim().is_empty()),
			client,
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}
}

#[async_trait]
impl SqlExecutor for PipelineClient {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError> {
		let body = encode_request(&statement);

		let mut request = self.client.post(&self.endpoint).json(&body);
		if let Some(token) = &self.auth_token {
			request = request.bearer_auth(token);
		}

		let response = request
			.send()
			.await
			.map_err(|e| DbError::Transport(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response
				.text()
				.await
				.unwrap_or_else(|_| String::from("<unreadable body>"));
			warn!(target: "db", status = status.as_u16(), "Pipeline request failed");
			return Err(DbError::Http {
				status: status.as_u16(),
				body,
			});
		}

		let decoded: PipelineResponse = response
			.json()
			.await
			.map_err(|e| DbError::Decode(e.to_string()))?;

		decode_response(decoded)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn libsql_urls_become_https_pipeline_urls() {
		assert_eq!(
			pipeline_url("libsql://resto-eka.turso.io").unwrap(),
			"https://resto-eka.turso.io/v2/pipeline"
		);
		assert_eq!(
			pipeline_url("http://127.0.0.1:8080/").unwrap(),
			"http://127.0.0.1:8080/v2/pipeline"
		);
		assert!(pipeline_url("postgres://localhost").is_err());
	}

	#[test]
	fn request_is_execute_then_close() {
		let stmt = Statement::new("SELECT * FROM menu WHERE id = ? AND kategori = ?")
			.bind(5_i64)
			.bind(None::<String>);
		let body = serde_json::to_value(encode_request(&stmt)).unwrap();
		assert_eq!(
			body,
			json!({
				"baton": null,
				"requests": [
					{
						"type": "execute",
						"stmt": {
							"sql": "SELECT * FROM menu WHERE id = ? AND kategori = ?",
							"args": [
								{"type": "integer", "value": "5"},
								{"type": "text", "value": ""}
							],
							"want_rows": true
						}
					},
					{"type": "close"}
				]
			})
		);
	}

	#[test]
	fn response_rows_are_zipped_with_columns() {
		let raw = json!({
			"baton": null,
			"base_url": null,
			"results": [
				{"type": "ok", "response": {"type": "execute", "result": {
					"cols": [{"name": "id", "decltype": "INTEGER"}, {"name": "nama_menu", "decltype": "TEXT"}, {"name": "kategori", "decltype": "TEXT"}],
					"rows": [[
						{"type": "integer", "value": "12"},
						{"type": "text", "value": "Nasi Goreng"},
						{"type": "null"}
					]],
					"affected_row_count": 0,
					"last_insert_rowid": null,
					"replication_index": "3"
				}}},
				{"type": "ok", "response": {"type": "close"}}
			]
		});
		let response: PipelineResponse = serde_json::from_value(raw).unwrap();
		let result = decode_response(response).unwrap();
		assert_eq!(result.columns, vec!["id", "nama_menu", "kategori"]);
		assert_eq!(result.rows.len(), 1);
		assert_eq!(result.rows[0]["id"], json!(12));
		assert_eq!(result.rows[0]["nama_menu"], json!("Nasi Goreng"));
		assert_eq!(result.rows[0]["kategori"], Value::Null);
		assert_eq!(result.last_insert_rowid, None);
	}

	#[test]
	fn insert_reports_last_rowid() {
		let raw = json!({
			"results": [
				{"type": "ok", "response": {"type": "execute", "result": {
					"cols": [], "rows": [], "affected_row_count": 1, "last_insert_rowid": "42"
				}}},
				{"type": "ok", "response": {"type": "close"}}
			]
		});
		let response: PipelineResponse = serde_json::from_value(raw).unwrap();
		let result = decode_response(response).unwrap();
		assert_eq!(result.last_insert_rowid, Some(42));
		assert_eq!(result.rows_affected, 1);
	}

	#[test]
	fn statement_error_carries_endpoint_message() {
		let raw = json!({
			"results": [
				{"type": "error", "error": {"message": "SQLite error: no such table: menu", "code": "SQLITE_UNKNOWN"}},
				{"type": "ok", "response": {"type": "close"}}
			]
		});
		let response: PipelineResponse = serde_json::from_value(raw).unwrap();
		match decode_response(response) {
			Err(DbError::Statement(message)) => {
				assert_eq!(message, "SQLite error: no such table: menu")
			}
			other => panic!("expected statement error, got {:?}", other),
		}
	}

	#[test]
	fn float_and_blob_cells_decode() {
		assert_eq!(
			WireValue::Float { value: 1.5 }.into_json().unwrap(),
			json!(1.5)
		);
		assert_eq!(
			WireValue::Blob {
				base64: "AAEC".to_string()
			}
			.into_json()
			.unwrap(),
			json!("AAEC")
		);
		assert!(
			WireValue::Integer {
				value: "x".to_string()
			}
			.into_json()
			.is_err()
		);
	}

	#[test]
	fn empty_auth_token_is_ignored() {
		let client = PipelineClient::new(
			"libsql://resto.turso.io",
			Some("  ".to_string()),
			Duration::from_secs(1),
		)
		.unwrap();
		assert!(client.auth_token.is_none());
		assert_eq!(client.endpoint(), "https://resto.turso.io/v2/pipeline");
	}
}
