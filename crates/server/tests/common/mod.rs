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

//! Shared fixtures: an in-memory SQLite executor and wrappers around it

#![allow(dead_code)]

use std::sync::{
	Arc, Mutex,
	atomic::{AtomicBool, AtomicUsize, Ordering},
};

use actix_web::web;
use async_trait::async_trait;
use resto_sdk::types::ReconcileReport;
use resto_server::{
	AppState, ServerConfig,
	auth::hash_password,
	db::{Database, DbError, QueryResult, Row, SqlArg, SqlExecutor, Statement, schema::SCHEMA},
	services::Reconciler,
};
use rusqlite::{Connection, types::ValueRef};
use serde_json::Value;

pub const JWT_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@resto.id";
pub const ADMIN_PASSWORD: &str = "rahasia";

/// Build the app under test with the real middleware stack
#[macro_export]
macro_rules! test_app {
	($state:expr) => {{
		let state = $state;
		actix_web::test::init_service(
			actix_web::App::new()
				.wrap(resto_server::middleware::CorsMiddleware)
				.wrap(resto_server::middleware::LoggingMiddleware)
				.configure(move |cfg| resto_server::configure_app(cfg, state, 64 * 1024)),
		)
		.await
	}};
}

/// `SqlExecutor` over an in-memory SQLite database
pub struct SqliteExecutor {
	conn: Mutex<Connection>,
}

impl SqliteExecutor {
	/// Fresh database with the production schema applied
	pub fn new() -> Self {
		let conn = Connection::open_in_memory().unwrap();
		for ddl in SCHEMA {
			conn.execute(ddl, []).unwrap();
		}
		Self {
			conn: Mutex::new(conn),
		}
	}

	fn run(&self, statement: &Statement) -> rusqlite::Result<QueryResult> {
		let conn = self.conn.lock().unwrap();
		let mut stmt = conn.prepare(&statement.sql)?;
		let params = rusqlite::params_from_iter(statement.args.iter().map(|arg| match arg {
			SqlArg::Integer(n) => rusqlite::types::Value::Integer(*n),
			SqlArg::Text(s) => rusqlite::types::Value::Text(s.clone()),
		}));

		let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
		if columns.is_empty() {
			let affected = stmt.execute(params)?;
			let is_insert = statement.sql.trim_start().to_uppercase().starts_with("INSERT");
			return Ok(QueryResult {
				columns,
				rows: Vec::new(),
				rows_affected: affected as u64,
				last_insert_rowid: is_insert.then(|| conn.last_insert_rowid()),
			});
		}

		let mut rows = Vec::new();
		let mut cursor = stmt.query(params)?;
		while let Some(row) = cursor.next()? {
			let mut out = Row::new();
			for (idx, name) in columns.iter().enumerate() {
				let value = match row.get_ref(idx)? {
					ValueRef::Null => Value::Null,
					ValueRef::Integer(n) => Value::from(n),
					ValueRef::Real(f) => Value::from(f),
					ValueRef::Text(t) | ValueRef::Blob(t) => {
						Value::String(String::from_utf8_lossy(t).into_owned())
					}
				};
				out.insert(name.clone(), value);
			}
			rows.push(out);
		}

		Ok(QueryResult {
			columns,
			rows,
			rows_affected: 0,
			last_insert_rowid: None,
		})
	}
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError> {
		self.run(&statement)
			.map_err(|e| DbError::Statement(e.to_string()))
	}
}

/// Counts every statement that reaches the inner executor
pub struct CountingExecutor {
	inner: Arc<SqliteExecutor>,
	count: AtomicUsize,
}

impl CountingExecutor {
	pub fn new(inner: Arc<SqliteExecutor>) -> Self {
		Self {
			inner,
			count: AtomicUsize::new(0),
		}
	}

	pub fn count(&self) -> usize {
		self.count.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SqlExecutor for CountingExecutor {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError> {
		self.count.fetch_add(1, Ordering::SeqCst);
		self.inner.execute(statement).await
	}
}

/// Fails payment inserts while `fail_payments` is set
pub struct FlakyPaymentsExecutor {
	inner: Arc<SqliteExecutor>,
	pub fail_payments: AtomicBool,
}

impl FlakyPaymentsExecutor {
	pub fn new(inner: Arc<SqliteExecutor>) -> Self {
		Self {
			inner,
			fail_payments: AtomicBool::new(true),
		}
	}
}

#[async_trait]
impl SqlExecutor for FlakyPaymentsExecutor {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError> {
		if self.fail_payments.load(Ordering::SeqCst)
			&& statement.sql.starts_with("INSERT INTO pembayaran")
		{
			return Err(DbError::Statement("database is locked".to_string()));
		}
		self.inner.execute(statement).await
	}
}

/// Runs a reconciliation pass right after every order insert, before the
/// caller's next statement
pub struct ReconcileOnOrderInsert {
	inner: Arc<SqliteExecutor>,
	reconciler: Reconciler,
	pub reports: Mutex<Vec<ReconcileReport>>,
}

impl ReconcileOnOrderInsert {
	pub fn new(inner: Arc<SqliteExecutor>) -> Self {
		Self {
			reconciler: Reconciler::new(inner.clone()),
			inner,
			reports: Mutex::new(Vec::new()),
		}
	}
}

#[async_trait]
impl SqlExecutor for ReconcileOnOrderInsert {
	async fn execute(&self, statement: Statement) -> Result<QueryResult, DbError> {
		let is_order_insert = statement.sql.starts_with("INSERT INTO pesanan");
		let result = self.inner.execute(statement).await?;
		if is_order_insert {
			let report = self.reconciler.run_once().await.unwrap();
			self.reports.lock().unwrap().push(report);
		}
		Ok(result)
	}
}

pub fn test_config() -> ServerConfig {
	let mut config = ServerConfig::new("http://127.0.0.1:8080", JWT_SECRET);
	config.reconcile_interval_secs = 0;
	config
}

pub fn state(db: Database) -> web::Data<AppState> {
	web::Data::new(AppState::new(db, &test_config()))
}

pub fn state_with(db: Database, config: &ServerConfig) -> web::Data<AppState> {
	web::Data::new(AppState::new(db, config))
}

/// Run a statement directly, bypassing the HTTP surface
pub async fn exec(db: &dyn SqlExecutor, sql: &str, args: Vec<SqlArg>) -> QueryResult {
	let mut statement = Statement::new(sql);
	statement.args = args;
	db.execute(statement).await.unwrap()
}

/// Insert the admin user with a bcrypt hash, returning its id
pub async fn seed_admin(db: &dyn SqlExecutor) -> i64 {
	let hash = hash_password(ADMIN_PASSWORD, 4).unwrap();
	exec(
		db,
		"INSERT INTO users (email, password) VALUES (?, ?)",
		vec![ADMIN_EMAIL.into(), hash.into()],
	)
	.await
	.last_insert_rowid
	.unwrap()
}

pub fn bearer(state: &AppState) -> (&'static str, String) {
	let token = state.issuer.issue(1, ADMIN_EMAIL).unwrap();
	("Authorization", format!("Bearer {}", token))
}
