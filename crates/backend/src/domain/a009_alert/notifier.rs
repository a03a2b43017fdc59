use async_trait::async_trait;
use contracts::domain::a009_alert::aggregate::Alert;
use contracts::enums::AlertLevel;

/// Канал оповещения о новых тревогах
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()>;
}

/// Оповещение через лог. Почтовая рассылка не реализована.
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, alert: &Alert) -> anyhow::Result<()> {
        match alert.level {
            AlertLevel::Critical => tracing::warn!(
                "Alerte {} [{}]: {}",
                alert.level,
                alert.kind,
                alert.message
            ),
            _ => tracing::info!(
                "Alerte {} [{}]: {}",
                alert.level,
                alert.kind,
                alert.message
            ),
        }
        Ok(())
    }
}
