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

//! The typed client against a live server on a loopback port

mod common;

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::ServerHandle};
use resto_sdk::{
	client::{Client, ClientError},
	types::{
		MenuInput, NewPayment, OrderInput, OrderItem, PAYMENT_METHOD_QRIS, PAYMENT_STATUS_PAID,
		PaymentUpdate, ReconcileReport, Stats,
	},
};
use resto_server::{
	configure_app,
	middleware::{CorsMiddleware, LoggingMiddleware},
};

use common::*;

/// Serve the app on an ephemeral port, returning the client base URL
async fn spawn_server(db: Arc<SqliteExecutor>) -> (String, ServerHandle) {
	let state = state(db);
	let server = HttpServer::new(move || {
		let state = state.clone();
		App::new()
			.wrap(CorsMiddleware)
			.wrap(LoggingMiddleware)
			.configure(move |cfg| configure_app(cfg, state, 64 * 1024))
	})
	.workers(1)
	.disable_signals()
	.bind(("127.0.0.1", 0))
	.unwrap();

	let addr = server.addrs()[0];
	let server = server.run();
	let handle = server.handle();
	actix_rt::spawn(server);
	(format!("http://{}/api", addr), handle)
}

#[actix_web::test]
async fn client_round_trips_every_response_shape() {
	let db = Arc::new(SqliteExecutor::new());
	seed_admin(db.as_ref()).await;
	let (base_url, handle) = spawn_server(db).await;

	let mut client = Client::new(&base_url).unwrap();
	let token = client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
	assert_eq!(client.token(), Some(token.as_str()));

	let created = client
		.create_menu(&MenuInput {
			nama_menu: "Nasi Goreng".to_string(),
			harga: 20000,
			kategori: "makanan".to_string(),
		})
		.await
		.unwrap();
	assert_eq!(created.message, "Menu berhasil ditambahkan");

	let menu = client.list_menu().await.unwrap();
	assert_eq!(menu.len(), 1);
	assert_eq!(client.get_menu(menu[0].id).await.unwrap(), Some(menu[0].clone()));
	assert_eq!(client.get_menu(999).await.unwrap(), None);

	let order = client
		.create_order(&OrderInput::from_items("Budi", vec![OrderItem::from(&menu[0])]))
		.await
		.unwrap();
	let orders = client.list_orders().await.unwrap();
	assert_eq!(orders[0].id, order.id);
	assert_eq!(orders[0].items(), Some(vec![OrderItem::from(&menu[0])]));

	let payments = client.list_payments().await.unwrap();
	assert_eq!(payments.len(), 1);
	client
		.update_payment(
			payments[0].id,
			&PaymentUpdate {
				metode: PAYMENT_METHOD_QRIS.to_string(),
				status: PAYMENT_STATUS_PAID.to_string(),
			},
		)
		.await
		.unwrap();

	let manual = client
		.create_payment(&NewPayment {
			pesanan_id: order.id,
			nama_pelanggan: "Budi".to_string(),
			total_harga: 5000,
			metode: PAYMENT_METHOD_QRIS.to_string(),
		})
		.await
		.unwrap();
	assert!(manual.id > payments[0].id);
	client.delete_payment(manual.id).await.unwrap();

	assert_eq!(
		client.stats().await.unwrap(),
		Stats {
			total_menu: 1,
			total_pesanan: 1,
			total_pendapatan: 20000
		}
	);
	assert_eq!(
		client.reconcile_payments().await.unwrap(),
		ReconcileReport::default()
	);

	client.delete_order(order.id).await.unwrap();
	client.delete_menu(menu[0].id).await.unwrap();
	assert!(client.list_payments().await.unwrap().is_empty());

	handle.stop(true).await;
}

#[actix_web::test]
async fn client_maps_error_statuses() {
	let db = Arc::new(SqliteExecutor::new());
	seed_admin(db.as_ref()).await;
	let (base_url, handle) = spawn_server(db).await;

	let anonymous = Client::new(&base_url).unwrap();
	assert!(matches!(
		anonymous.list_orders().await,
		Err(ClientError::Authentication(_))
	));

	let stale = Client::new(&base_url).unwrap().with_token("not-a-token");
	assert!(matches!(stale.stats().await, Err(ClientError::Authentication(_))));

	let mut client = Client::new(&base_url).unwrap();
	assert!(matches!(
		client.login(ADMIN_EMAIL, "salah").await,
		Err(ClientError::Authentication(_))
	));
	client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

	let err = client
		.create_order(&OrderInput::from_items("", Vec::new()))
		.await
		.unwrap_err();
	match err {
		ClientError::InvalidRequest(message) => assert!(message.contains("incomplete order data")),
		other => panic!("unexpected error: {other}"),
	}

	handle.stop(true).await;
}
