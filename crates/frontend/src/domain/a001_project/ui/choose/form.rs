use chrono::NaiveDate;
use contracts::domain::a001_project::aggregate::ProjectDto;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Button, ButtonAppearance, Flex, FlexGap, Input, InputType};

use crate::domain::a001_project::api;

fn parse_date(value: &str, label: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{}: date invalide", label))
}

/// Поля формы превращаются в запрос на создание
pub fn build_project_dto(
    name: &str,
    location: &str,
    budget: &str,
    start: &str,
    end: &str,
) -> Result<ProjectDto, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Le nom du projet est obligatoire".into());
    }
    let initial_budget = budget
        .trim()
        .replace(' ', "")
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| "Budget initial invalide".to_string())?;
    if initial_budget < 0.0 {
        return Err("Le budget initial ne peut pas être négatif".into());
    }
    let start_date = parse_date(start, "Date de début")?;
    let planned_end_date = parse_date(end, "Date de fin prévue")?;
    if planned_end_date < start_date {
        return Err("La date de fin prévue précède la date de début".into());
    }

    let location = location.trim();
    Ok(ProjectDto {
        id: None,
        name: name.to_string(),
        description: None,
        location: (!location.is_empty()).then(|| location.to_string()),
        initial_budget,
        start_date,
        planned_end_date,
        actual_end_date: None,
        status: None,
        responsible_id: None,
        cost_alert_threshold: None,
        delay_alert_threshold: None,
    })
}

#[component]
pub fn NewProjectForm(
    #[prop(into)] on_created: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let name = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let budget = RwSignal::new(String::new());
    let start = RwSignal::new(String::new());
    let end = RwSignal::new(String::new());
    let (error, set_error) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    let submit = move |_| {
        let dto = match build_project_dto(
            &name.get_untracked(),
            &location.get_untracked(),
            &budget.get_untracked(),
            &start.get_untracked(),
            &end.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::create_project(&dto).await {
                Ok(id) => {
                    log::info!("Project created: {}", id);
                    on_created.run(());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="form-card">
            <h3 class="form-card__title">"Nouveau projet"</h3>
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
            <div class="form-card__grid">
                <label>"Nom"</label>
                <Input value=name placeholder="Nom du projet" />
                <label>"Localisation"</label>
                <Input value=location placeholder="Adresse du projet" />
                <label>"Budget initial (DA)"</label>
                <Input value=budget input_type=InputType::Number />
                <label>"Date de début"</label>
                <input
                    type="date"
                    prop:value=move || start.get()
                    on:input=move |ev| start.set(event_target_value(&ev))
                />
                <label>"Date de fin prévue"</label>
                <input
                    type="date"
                    prop:value=move || end.get()
                    on:input=move |ev| end.set(event_target_value(&ev))
                />
            </div>
            <Flex gap=FlexGap::Small>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || saving.get())
                >
                    "Créer"
                </Button>
                <Button on_click=move |_| on_cancel.run(())>"Annuler"</Button>
            </Flex>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_project_dto() {
        let dto = build_project_dto(
            " Forage Nord ",
            "",
            "1 500 000,50",
            "2024-01-10",
            "2024-06-30",
        )
        .unwrap();
        assert_eq!(dto.name, "Forage Nord");
        assert_eq!(dto.location, None);
        assert_eq!(dto.initial_budget, 1_500_000.5);
        assert_eq!(dto.start_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_build_project_dto_rejects_bad_input() {
        assert!(build_project_dto("", "x", "10", "2024-01-01", "2024-02-01").is_err());
        assert!(build_project_dto("P", "x", "abc", "2024-01-01", "2024-02-01").is_err());
        assert!(build_project_dto("P", "x", "-5", "2024-01-01", "2024-02-01").is_err());
        assert!(build_project_dto("P", "x", "10", "01/01/2024", "2024-02-01").is_err());
        assert_eq!(
            build_project_dto("P", "x", "10", "2024-03-01", "2024-02-01").unwrap_err(),
            "La date de fin prévue précède la date de début"
        );
    }
}
