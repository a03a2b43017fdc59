use contracts::domain::a007_solution::aggregate::{Solution, SolutionDto};
use contracts::enums::SolutionStatus;
use gloo_net::http::Method;

use crate::shared::api_utils::{get_json, send_empty, send_json};

pub async fn fetch_for_project(project_id: &str) -> Result<Vec<Solution>, String> {
    get_json(&format!("/api/projects/{}/solutions", project_id)).await
}

/// Валидация или отклонение идут обычным обновлением
pub async fn set_status(solution: &Solution, status: SolutionStatus) -> Result<Solution, String> {
    let dto = SolutionDto {
        problem_id: solution.problem_id.to_string(),
        description: solution.description.clone(),
        solution_type: solution.solution_type.clone(),
        estimated_cost: solution.estimated_cost,
        estimated_delay_days: solution.estimated_delay_days,
        status: Some(status),
    };
    send_json(Method::PUT, &format!("/api/solutions/{}", solution.id), &dto).await
}

pub async fn implement(id: &str) -> Result<Solution, String> {
    send_empty(Method::PATCH, &format!("/api/solutions/{}/implement", id)).await
}
