//! Traffic-light indicators and status badges shared by the pages

use contracts::enums::{
    AlertLevel, ProblemStatus, ReportStatus, Severity, SolutionStatus, WorkStatus,
};
use contracts::shared::status_color::{StatusColor, StatusMetrics};
use leptos::prelude::*;
use thaw::{Badge, BadgeAppearance, BadgeColor};

use super::format::{format_money, format_percent};

pub fn work_status_color(status: WorkStatus) -> BadgeColor {
    match status {
        WorkStatus::Planned => BadgeColor::Informative,
        WorkStatus::InProgress => BadgeColor::Brand,
        WorkStatus::Finished => BadgeColor::Success,
        WorkStatus::Suspended => BadgeColor::Warning,
    }
}

pub fn severity_color(severity: Severity) -> BadgeColor {
    match severity {
        Severity::Low => BadgeColor::Subtle,
        Severity::Medium => BadgeColor::Informative,
        Severity::High => BadgeColor::Warning,
        Severity::Critical => BadgeColor::Danger,
    }
}

pub fn problem_status_color(status: ProblemStatus) -> BadgeColor {
    match status {
        ProblemStatus::Open => BadgeColor::Danger,
        ProblemStatus::InProgress => BadgeColor::Warning,
        ProblemStatus::Resolved => BadgeColor::Success,
        ProblemStatus::Closed => BadgeColor::Subtle,
    }
}

pub fn solution_status_color(status: SolutionStatus) -> BadgeColor {
    match status {
        SolutionStatus::Proposed => BadgeColor::Informative,
        SolutionStatus::Validated => BadgeColor::Brand,
        SolutionStatus::Rejected => BadgeColor::Danger,
        SolutionStatus::Implemented => BadgeColor::Success,
    }
}

pub fn report_status_color(status: ReportStatus) -> BadgeColor {
    match status {
        ReportStatus::Pending => BadgeColor::Warning,
        ReportStatus::Processed => BadgeColor::Success,
        ReportStatus::Rejected => BadgeColor::Danger,
    }
}

pub fn alert_level_color(level: AlertLevel) -> BadgeColor {
    match level {
        AlertLevel::Info => BadgeColor::Informative,
        AlertLevel::Warning => BadgeColor::Warning,
        AlertLevel::Critical => BadgeColor::Danger,
    }
}

/// Tinted badge with a fixed label
#[component]
pub fn StatusBadge(label: &'static str, color: BadgeColor) -> impl IntoView {
    view! {
        <Badge appearance=BadgeAppearance::Tint color=color>
            {label}
        </Badge>
    }
}

/// Coloured dot with an optional caption
#[component]
pub fn StatusDot(color: StatusColor, #[prop(optional, into)] title: String) -> impl IntoView {
    view! {
        <span class=format!("status-dot {}", color.css_class()) title=title></span>
    }
}

/// Horizontal bar filled to `value` percent, coloured by status
#[component]
pub fn ProgressBar(value: f64, color: StatusColor) -> impl IntoView {
    let width = value.clamp(0.0, 100.0);
    view! {
        <div class="progress-bar">
            <div
                class=format!("progress-bar__fill {}", color.css_class())
                style=format!("width: {:.1}%;", width)
            ></div>
            <span class="progress-bar__label">{format_percent(value)}</span>
        </div>
    }
}

/// Time and cost indicators of a phase or an operation
#[component]
pub fn MetricsPanel(metrics: StatusMetrics) -> impl IntoView {
    view! {
        <div class="metrics-panel">
            <div class="metrics-panel__item">
                <span class="metrics-panel__label">"Avancement"</span>
                <ProgressBar value=metrics.progress color=metrics.progress_color />
            </div>
            <div class="metrics-panel__item">
                <StatusDot color=metrics.time_color title="Délai" />
                <span class="metrics-panel__label">"Délai"</span>
                <span class="metrics-panel__value">
                    {format!(
                        "{} / {} jours ({})",
                        metrics.elapsed_days,
                        metrics.planned_days,
                        format_percent(metrics.time_ratio),
                    )}
                </span>
            </div>
            <div class="metrics-panel__item">
                <StatusDot color=metrics.cost_color title="Coût" />
                <span class="metrics-panel__label">"Coût"</span>
                <span class="metrics-panel__value">
                    {format!(
                        "{} / {} ({})",
                        format_money(metrics.actual_cost),
                        format_money(metrics.planned_cost),
                        format_percent(metrics.cost_ratio),
                    )}
                </span>
            </div>
        </div>
    }
}
