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

//! Background reconciliation task
//!
//! Runs [`Reconciler::run_once`] on a fixed interval for the lifetime of the
//! server. An interval of zero disables the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::services::Reconciler;

/// Handle to the running reconciliation task
pub struct ReconcileWorker {
	handle: Option<JoinHandle<()>>,
}

impl ReconcileWorker {
	/// Spawn the periodic task on the current runtime
	pub fn start(reconciler: Arc<Reconciler>, interval_secs: u64) -> Self {
		if interval_secs == 0 {
			info!(target: "reconciler", "Payment reconciler disabled");
			return Self { handle: None };
		}

		let period = Duration::from_secs(interval_secs);
		let handle = tokio::spawn(async move {
			let mut timer = interval(period);
			timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				timer.tick().await;
				if let Err(e) = reconciler.run_once().await {
					error!(target: "reconciler", error = %e, "Reconciliation pass failed");
				}
			}
		});

		info!(target: "reconciler", interval_secs, "Payment reconciler started");
		Self {
			handle: Some(handle),
		}
	}

	pub fn is_running(&self) -> bool {
		self.handle.as_ref().is_some_and(|h| !h.is_finished())
	}

	/// Stop the task
	pub fn shutdown(mut self) {
		if let Some(handle) = self.handle.take() {
			handle.abort();
			info!(target: "reconciler", "Payment reconciler stopped");
		}
	}
}

impl Drop for ReconcileWorker {
	fn drop(&mut self) {
		if let Some(handle) = self.handle.take() {
			handle.abort();
		}
	}
}
