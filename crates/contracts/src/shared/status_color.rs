//! Светофорные индикаторы фаз и операций.
//!
//! Коэффициенты считаются как «освоено по плану» против «израсходовано по факту»:
//! 100% и выше означает, что работа идёт не хуже плана.

use serde::{Deserialize, Serialize};

use crate::domain::a004_threshold::aggregate::Threshold;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    /// CSS-модификатор индикатора
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusColor::Green => "status--green",
            StatusColor::Yellow => "status--yellow",
            StatusColor::Red => "status--red",
        }
    }
}

/// Границы для коэффициентов, в процентах
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub green: f64,
    pub yellow: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            green: 100.0,
            yellow: 80.0,
        }
    }
}

impl ThresholdSet {
    pub fn color(&self, ratio: f64) -> StatusColor {
        if ratio >= self.green {
            StatusColor::Green
        } else if ratio >= self.yellow {
            StatusColor::Yellow
        } else {
            StatusColor::Red
        }
    }
}

/// Временной коэффициент: плановые дни, «заработанные» прогрессом, к прошедшим дням
pub fn time_ratio(progress: f64, planned_days: i64, elapsed_days: i64) -> f64 {
    if elapsed_days <= 0 {
        return 100.0;
    }
    (progress / 100.0 * planned_days as f64) / elapsed_days as f64 * 100.0
}

/// Стоимостной коэффициент: освоенная стоимость к фактическим затратам
pub fn cost_ratio(progress: f64, planned_cost: f64, actual_cost: f64) -> f64 {
    if actual_cost <= 0.0 {
        return 100.0;
    }
    (progress / 100.0 * planned_cost) / actual_cost * 100.0
}

pub fn progress_color(progress: f64) -> StatusColor {
    if progress >= 50.0 {
        StatusColor::Green
    } else if progress >= 20.0 {
        StatusColor::Yellow
    } else {
        StatusColor::Red
    }
}

/// Цвет полосы потребления на дашборде: и недоосвоение, и перерасход красные
pub fn consumption_color(value: f64, max: f64) -> StatusColor {
    if max <= 0.0 {
        return StatusColor::Red;
    }
    let pct = value / max * 100.0;
    if pct < 30.0 {
        StatusColor::Red
    } else if pct < 70.0 {
        StatusColor::Yellow
    } else if pct <= 90.0 {
        StatusColor::Green
    } else {
        StatusColor::Red
    }
}

/// Цвет фактической стоимости операции относительно её порогов
pub fn operation_cost_color(actual_cost: f64, threshold: &Threshold) -> StatusColor {
    if actual_cost >= threshold.red {
        StatusColor::Red
    } else if actual_cost >= threshold.yellow {
        StatusColor::Yellow
    } else {
        StatusColor::Green
    }
}

/// Сводка индикаторов одной фазы или операции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMetrics {
    pub progress: f64,
    pub planned_days: i64,
    pub elapsed_days: i64,
    pub planned_cost: f64,
    pub actual_cost: f64,
    pub time_ratio: f64,
    pub cost_ratio: f64,
    pub time_color: StatusColor,
    pub cost_color: StatusColor,
    pub progress_color: StatusColor,
}

impl StatusMetrics {
    pub fn compute(
        progress: f64,
        planned_days: i64,
        elapsed_days: i64,
        planned_cost: f64,
        actual_cost: f64,
        thresholds: ThresholdSet,
    ) -> Self {
        let time = time_ratio(progress, planned_days, elapsed_days);
        let cost = cost_ratio(progress, planned_cost, actual_cost);
        Self {
            progress,
            planned_days,
            elapsed_days,
            planned_cost,
            actual_cost,
            time_ratio: time,
            cost_ratio: cost,
            time_color: thresholds.color(time),
            cost_color: thresholds.color(cost),
            progress_color: progress_color(progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a003_operation::aggregate::OperationId;
    use crate::domain::a004_threshold::aggregate::ThresholdDto;

    #[test]
    fn test_time_ratio() {
        assert_eq!(time_ratio(50.0, 20, 10), 100.0);
        assert_eq!(time_ratio(25.0, 20, 10), 50.0);
        assert_eq!(time_ratio(0.0, 20, 0), 100.0);
    }

    #[test]
    fn test_cost_ratio() {
        assert_eq!(cost_ratio(50.0, 1000.0, 400.0), 125.0);
        assert_eq!(cost_ratio(50.0, 1000.0, 0.0), 100.0);
    }

    #[test]
    fn test_threshold_set_boundaries() {
        let t = ThresholdSet::default();
        assert_eq!(t.color(100.0), StatusColor::Green);
        assert_eq!(t.color(99.9), StatusColor::Yellow);
        assert_eq!(t.color(80.0), StatusColor::Yellow);
        assert_eq!(t.color(79.9), StatusColor::Red);
    }

    #[test]
    fn test_progress_color() {
        assert_eq!(progress_color(50.0), StatusColor::Green);
        assert_eq!(progress_color(20.0), StatusColor::Yellow);
        assert_eq!(progress_color(19.0), StatusColor::Red);
    }

    #[test]
    fn test_consumption_color() {
        assert_eq!(consumption_color(10.0, 100.0), StatusColor::Red);
        assert_eq!(consumption_color(50.0, 100.0), StatusColor::Yellow);
        assert_eq!(consumption_color(90.0, 100.0), StatusColor::Green);
        assert_eq!(consumption_color(95.0, 100.0), StatusColor::Red);
        assert_eq!(consumption_color(5.0, 0.0), StatusColor::Red);
    }

    #[test]
    fn test_operation_cost_color() {
        let t = Threshold::new_for_insert(
            OperationId::new_v4(),
            &ThresholdDto { green: 100.0, yellow: 200.0, red: 300.0 },
            "u",
        );
        assert_eq!(operation_cost_color(150.0, &t), StatusColor::Green);
        assert_eq!(operation_cost_color(200.0, &t), StatusColor::Yellow);
        assert_eq!(operation_cost_color(300.0, &t), StatusColor::Red);
    }

    #[test]
    fn test_metrics_bundle() {
        let m = StatusMetrics::compute(40.0, 30, 10, 1000.0, 500.0, ThresholdSet::default());
        assert!((m.time_ratio - 120.0).abs() < 1e-9);
        assert_eq!(m.time_color, StatusColor::Green);
        assert!((m.cost_ratio - 80.0).abs() < 1e-9);
        assert_eq!(m.cost_color, StatusColor::Yellow);
        assert_eq!(m.progress_color, StatusColor::Yellow);
    }
}
