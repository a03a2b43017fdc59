use anyhow::Result;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use super::notifier::AlertNotifier;
use super::service;
use crate::shared::config::AlertsConfig;

/// Фоновый воркер: периодическое обнаружение тревог и очистка старых.
pub struct AlertWorker {
    notifier: Arc<dyn AlertNotifier>,
    interval_seconds: u64,
    retention_days: i64,
}

impl AlertWorker {
    pub fn new(notifier: Arc<dyn AlertNotifier>, config: &AlertsConfig) -> Self {
        Self {
            notifier,
            interval_seconds: config.scan_interval_secs,
            retention_days: config.retention_days,
        }
    }

    /// Запускает цикл; первая проверка выполняется сразу.
    pub async fn run_loop(&self) {
        info!(
            "Alert worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.scan_once().await {
                error!("Error during alert scan: {:?}", e);
            }
        }
    }

    async fn scan_once(&self) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        service::detect(self.notifier.as_ref(), today).await?;
        service::purge_treated(self.retention_days).await?;
        Ok(())
    }
}
