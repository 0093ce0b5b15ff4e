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

use actix_web::{HttpResponse, Responder, web};
use resto_sdk::types::{CreatedResponse, LoginResponse, MessageResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
	auth::Identity,
	error::ApiError,
	server::AppState,
	services::{MenuPayload, OrderPayload, PaymentPayload, PaymentUpdatePayload, optional_text},
};

const MENU_CREATED: &str = "Menu berhasil ditambahkan";
const MENU_UPDATED: &str = "Menu berhasil diupdate";
const MENU_DELETED: &str = "Menu berhasil dihapus";
const ORDER_CREATED: &str = "Pesanan berhasil ditambahkan";
const ORDER_UPDATED: &str = "Pesanan berhasil diupdate";
const ORDER_DELETED: &str = "Pesanan berhasil dihapus";
const PAYMENT_CREATED: &str = "Pembayaran berhasil disimpan";
const PAYMENT_UPDATED: &str = "Status pembayaran diupdate";
const PAYMENT_DELETED: &str = "Pembayaran berhasil dihapus";
const LOGIN_OK: &str = "Login berhasil";

fn message(text: &str) -> HttpResponse {
	HttpResponse::Ok().json(MessageResponse {
		message: text.to_string(),
	})
}

/// Health check endpoint
pub async fn health() -> impl Responder {
	HttpResponse::Ok().json(serde_json::json!({
		"status": "ok",
		"service": "resto-server"
	}))
}

/// Login body
///
/// Absent or non-text fields are compared as text and fail the credential
/// check rather than the JSON extractor.
#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
	pub email: Option<Value>,
	pub password: Option<Value>,
}

pub async fn login(
	state: web::Data<AppState>,
	body: web::Json<LoginBody>,
) -> Result<HttpResponse, ApiError> {
	let email = optional_text(body.email.as_ref());
	let password = optional_text(body.password.as_ref());
	let token = state.users.login(&email, &password).await?;
	Ok(HttpResponse::Ok().json(LoginResponse {
		message: Some(LOGIN_OK.to_string()),
		token,
	}))
}

pub async fn list_menu(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.menu.list().await?))
}

/// Single menu item; an unknown id answers `null`
pub async fn get_menu(
	state: web::Data<AppState>,
	path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.menu.get(path.into_inner()).await?))
}

pub async fn create_menu(
	state: web::Data<AppState>,
	body: web::Json<MenuPayload>,
) -> Result<HttpResponse, ApiError> {
	state.menu.create(&body).await?;
	Ok(message(MENU_CREATED))
}

pub async fn update_menu(
	state: web::Data<AppState>,
	path: web::Path<i64>,
	body: web::Json<MenuPayload>,
) -> Result<HttpResponse, ApiError> {
	state.menu.update(path.into_inner(), &body).await?;
	Ok(message(MENU_UPDATED))
}

pub async fn delete_menu(
	state: web::Data<AppState>,
	path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
	state.menu.delete(path.into_inner()).await?;
	Ok(message(MENU_DELETED))
}

pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.orders.list().await?))
}

/// Create an order; the response id is the new order's id
pub async fn create_order(
	state: web::Data<AppState>,
	body: web::Json<OrderPayload>,
) -> Result<HttpResponse, ApiError> {
	let id = state.orders.create(&body).await?;
	Ok(HttpResponse::Ok().json(CreatedResponse {
		message: ORDER_CREATED.to_string(),
		id,
	}))
}

pub async fn update_order(
	state: web::Data<AppState>,
	path: web::Path<i64>,
	body: web::Json<OrderPayload>,
) -> Result<HttpResponse, ApiError> {
	state.orders.update(path.into_inner(), &body).await?;
	Ok(message(ORDER_UPDATED))
}

pub async fn delete_order(
	state: web::Data<AppState>,
	path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
	state.orders.delete(path.into_inner()).await?;
	Ok(message(ORDER_DELETED))
}

pub async fn list_payments(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.payments.list().await?))
}

pub async fn create_payment(
	state: web::Data<AppState>,
	body: web::Json<PaymentPayload>,
) -> Result<HttpResponse, ApiError> {
	let id = state
		.payments
		.create(&body)
		.await?
		.ok_or_else(|| ApiError::internal("failed to create payment"))?;
	Ok(HttpResponse::Ok().json(CreatedResponse {
		message: PAYMENT_CREATED.to_string(),
		id,
	}))
}

pub async fn update_payment(
	state: web::Data<AppState>,
	identity: web::ReqData<Identity>,
	path: web::Path<i64>,
	body: web::Json<PaymentUpdatePayload>,
) -> Result<HttpResponse, ApiError> {
	let id = path.into_inner();
	debug!(target: "payments", id, user_id = identity.user_id, "Payment update requested");
	state.payments.update(id, &body).await?;
	Ok(message(PAYMENT_UPDATED))
}

pub async fn delete_payment(
	state: web::Data<AppState>,
	path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
	state.payments.delete(path.into_inner()).await?;
	Ok(message(PAYMENT_DELETED))
}

/// Run one reconciliation pass on demand
pub async fn reconcile_payments(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.reconciler.run_once().await?))
}

pub async fn stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
	Ok(HttpResponse::Ok().json(state.stats.get().await?))
}
