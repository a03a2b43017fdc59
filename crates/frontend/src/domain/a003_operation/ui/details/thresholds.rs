use contracts::domain::a004_threshold::aggregate::{validate_ordering, Threshold, ThresholdDto};
use contracts::domain::common::AggregateId;
use contracts::shared::status_color::StatusColor;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Input, InputType};

use crate::domain::a004_threshold::api;
use crate::shared::format::format_number;
use crate::shared::indicators::StatusDot;

fn parse_value(raw: &str, label: &str) -> Result<f64, String> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("Valeur {} invalide", label))
}

/// Разбор трёх порогов с проверкой зелёный < жёлтый < красный
pub fn parse_thresholds(green: &str, yellow: &str, red: &str) -> Result<ThresholdDto, String> {
    let dto = ThresholdDto {
        green: parse_value(green, "verte")?,
        yellow: parse_value(yellow, "jaune")?,
        red: parse_value(red, "rouge")?,
    };
    validate_ordering(dto.green, dto.yellow, dto.red)?;
    Ok(dto)
}

/// Пороги стоимости операции. Первый набор редактируется на месте,
/// если наборов нет, создаётся новый.
#[component]
pub fn ThresholdEditor(
    operation_id: String,
    thresholds: Vec<Threshold>,
    color: Option<StatusColor>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let current = thresholds.first().cloned();
    let green = RwSignal::new(current.as_ref().map(|t| t.green.to_string()).unwrap_or_default());
    let yellow = RwSignal::new(current.as_ref().map(|t| t.yellow.to_string()).unwrap_or_default());
    let red = RwSignal::new(current.as_ref().map(|t| t.red.to_string()).unwrap_or_default());
    let (error, set_error) = signal(None::<String>);
    let existing_id = StoredValue::new(current.as_ref().map(|t| t.id.as_string()));
    let operation_id = StoredValue::new(operation_id);

    let save = move |_| {
        let dto = match parse_thresholds(
            &green.get_untracked(),
            &yellow.get_untracked(),
            &red.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        let existing = existing_id.get_value();
        let op_id = operation_id.get_value();
        spawn_local(async move {
            let result = match existing {
                Some(id) => api::update_threshold(&id, &dto).await.map(|_| ()),
                None => api::create_threshold(&op_id, &dto).await.map(|_| ()),
            };
            match result {
                Ok(()) => {
                    set_error.set(None);
                    on_saved.run(());
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="section">
            <div class="section__header">
                <h3 class="section__title">"Seuils de coût"</h3>
                {color.map(|c| view! { <StatusDot color=c title="Coût réel par rapport aux seuils" /> })}
            </div>
            {current.map(|t| view! {
                <div class="threshold-summary">
                    {format!(
                        "Vert ≤ {}  ·  Jaune ≤ {}  ·  Rouge ≥ {}",
                        format_number(t.green, 2),
                        format_number(t.yellow, 2),
                        format_number(t.red, 2),
                    )}
                    {t.modified_by.map(|by| view! { <span class="threshold-summary__by">{format!(" (modifié par {})", by)}</span> })}
                </div>
            })}
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
            <Flex gap=FlexGap::Small>
                <Input value=green input_type=InputType::Number placeholder="Vert" />
                <Input value=yellow input_type=InputType::Number placeholder="Jaune" />
                <Input value=red input_type=InputType::Number placeholder="Rouge" />
                <Button appearance=ButtonAppearance::Primary on_click=save>
                    {move || if existing_id.with_value(|id| id.is_some()) { "Modifier" } else { "Définir" }}
                </Button>
            </Flex>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_thresholds_accepts_increasing_values() {
        let dto = parse_thresholds("1000", "2000,5", "3000").unwrap();
        assert_eq!(dto.green, 1000.0);
        assert_eq!(dto.yellow, 2000.5);
        assert_eq!(dto.red, 3000.0);
    }

    #[test]
    fn test_parse_thresholds_rejects_bad_order() {
        assert_eq!(
            parse_thresholds("2000", "1000", "3000").unwrap_err(),
            "La valeur verte doit être inférieure à la valeur jaune"
        );
        assert_eq!(
            parse_thresholds("1000", "3000", "3000").unwrap_err(),
            "La valeur jaune doit être inférieure à la valeur rouge"
        );
        assert!(parse_thresholds("-1", "2", "3").is_err());
        assert!(parse_thresholds("x", "2", "3").is_err());
    }
}
