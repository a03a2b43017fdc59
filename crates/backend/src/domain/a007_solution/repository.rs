use chrono::Utc;
use contracts::domain::a006_problem::aggregate::ProblemId;
use contracts::domain::a007_solution::aggregate::{Solution, SolutionFilter, SolutionId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::SolutionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_solution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub problem_id: String,
    pub description: String,
    pub solution_type: String,
    pub estimated_cost: Option<f64>,
    pub estimated_delay_days: Option<i32>,
    pub proposed_by: String,
    pub status: String,
    pub validated_by: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Solution {
    fn from(m: Model) -> Self {
        Solution {
            id: SolutionId(Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4())),
            problem_id: ProblemId(Uuid::parse_str(&m.problem_id).unwrap_or_default()),
            description: m.description,
            solution_type: m.solution_type,
            estimated_cost: m.estimated_cost,
            estimated_delay_days: m.estimated_delay_days,
            proposed_by: m.proposed_by,
            status: SolutionStatus::from_code(&m.status).unwrap_or_default(),
            validated_by: m.validated_by,
            metadata: EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                version: m.version,
            },
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(s: &Solution) -> ActiveModel {
    ActiveModel {
        id: Set(s.id.value().to_string()),
        problem_id: Set(s.problem_id.value().to_string()),
        description: Set(s.description.clone()),
        solution_type: Set(s.solution_type.clone()),
        estimated_cost: Set(s.estimated_cost),
        estimated_delay_days: Set(s.estimated_delay_days),
        proposed_by: Set(s.proposed_by.clone()),
        status: Set(s.status.code().to_string()),
        validated_by: Set(s.validated_by.clone()),
        created_at: Set(Some(s.metadata.created_at)),
        updated_at: Set(Some(s.metadata.updated_at)),
        version: Set(s.metadata.version),
    }
}

/// Решения по фильтру. Проблема и статус отбираются в SQL, остальное в памяти.
pub async fn list(filter: &SolutionFilter) -> anyhow::Result<Vec<Solution>> {
    let mut query = Entity::find();
    if let Some(problem_id) = filter.problem_id.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::ProblemId.eq(problem_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    let items = query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Solution::from)
        .filter(|s| filter.matches(s))
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Solution>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(s: &Solution) -> anyhow::Result<Uuid> {
    to_active(s).insert(conn()).await?;
    Ok(s.id.value())
}

pub async fn update(s: &Solution) -> anyhow::Result<()> {
    let mut active = to_active(s);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
