use contracts::domain::a009_alert::aggregate::Alert;
use contracts::domain::common::AggregateId;
use contracts::enums::AlertLevel;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonSize};

use crate::domain::a009_alert::api;
use crate::shared::format::format_timestamp;
use crate::shared::icons::icon;
use crate::shared::indicators::{alert_level_color, StatusBadge};

/// Сначала критичные, внутри уровня сначала новые
pub fn sort_alerts(alerts: &mut [Alert]) {
    fn rank(level: AlertLevel) -> u8 {
        match level {
            AlertLevel::Critical => 0,
            AlertLevel::Warning => 1,
            AlertLevel::Info => 2,
        }
    }
    alerts.sort_by(|a, b| {
        rank(a.level)
            .cmp(&rank(b.level))
            .then(b.metadata.created_at.cmp(&a.metadata.created_at))
    });
}

/// Непрочитанные алерты проекта; прочитанный алерт убирается из списка
#[component]
pub fn UnreadAlerts(project_id: String, alerts: Vec<Alert>) -> impl IntoView {
    let mut alerts = alerts;
    sort_alerts(&mut alerts);
    let (alerts, set_alerts) = signal(alerts);
    let (error, set_error) = signal(None::<String>);
    let project_id = StoredValue::new(project_id);

    let read_one = move |id: String| {
        spawn_local(async move {
            match api::mark_read(&id).await {
                Ok(alert) => set_alerts.update(|list| list.retain(|a| a.id != alert.id)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let read_all = move |_| {
        spawn_local(async move {
            match api::mark_all_read(&project_id.get_value()).await {
                Ok(_) => set_alerts.set(Vec::new()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="section">
            <div class="section__header">
                <h3 class="section__title">
                    {icon("alert")}
                    {move || format!(" Alertes non lues ({})", alerts.with(|a| a.len()))}
                </h3>
                <Button
                    size=ButtonSize::Small
                    on_click=read_all
                    disabled=Signal::derive(move || alerts.with(|a| a.is_empty()))
                >
                    "Tout marquer comme lu"
                </Button>
            </div>

            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <Show
                when=move || !alerts.with(|a| a.is_empty())
                fallback=|| view! { <div class="page__empty">"Aucune alerte"</div> }
            >
                <ul class="alert-list">
                    <For
                        each=move || alerts.get()
                        key=|a| a.id
                        children=move |a| {
                            let id = a.id.as_string();
                            view! {
                                <li class="alert-list__item">
                                    <StatusBadge label=a.level.display_name() color=alert_level_color(a.level) />
                                    <span class="alert-list__kind">{a.kind.display_name()}</span>
                                    <span class="alert-list__message">{a.message}</span>
                                    <span class="alert-list__date">{format_timestamp(&a.metadata.created_at)}</span>
                                    <button class="alert-list__read" title="Marquer comme lu" on:click=move |_| read_one(id.clone())>
                                        {icon("check")}
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use contracts::domain::a009_alert::aggregate::AlertId;
    use contracts::domain::common::EntityMetadata;
    use contracts::enums::{AlertKind, AlertStatus};

    fn alert(level: AlertLevel, age_hours: i64, message: &str) -> Alert {
        let mut metadata = EntityMetadata::new();
        metadata.created_at = Utc::now() - Duration::hours(age_hours);
        Alert {
            id: AlertId::new_v4(),
            project_id: None,
            phase_id: None,
            operation_id: None,
            kind: AlertKind::BudgetOverrun,
            level,
            message: message.into(),
            status: AlertStatus::Unread,
            read_by: None,
            read_at: None,
            metadata,
        }
    }

    #[test]
    fn test_sort_alerts_critical_then_newest() {
        let mut list = vec![
            alert(AlertLevel::Info, 1, "info"),
            alert(AlertLevel::Critical, 10, "old critical"),
            alert(AlertLevel::Warning, 2, "warning"),
            alert(AlertLevel::Critical, 3, "new critical"),
        ];
        sort_alerts(&mut list);
        let order: Vec<_> = list.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(order, vec!["new critical", "old critical", "warning", "info"]);
    }
}
