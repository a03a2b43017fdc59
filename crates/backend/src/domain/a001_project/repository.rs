use chrono::{NaiveDate, Utc};
use contracts::domain::a001_project::aggregate::{Project, ProjectFilter, ProjectId};
use contracts::domain::common::EntityMetadata;
use contracts::enums::WorkStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub initial_budget: f64,
    pub current_cost: f64,
    pub start_date: NaiveDate,
    pub planned_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: String,
    pub responsible_id: Option<String>,
    pub cost_alert_threshold: f64,
    pub delay_alert_threshold: f64,
    pub progress: f64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Project {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Project {
            id: ProjectId(uuid),
            name: m.name,
            description: m.description,
            location: m.location,
            initial_budget: m.initial_budget,
            current_cost: m.current_cost,
            start_date: m.start_date,
            planned_end_date: m.planned_end_date,
            actual_end_date: m.actual_end_date,
            status: WorkStatus::from_code(&m.status).unwrap_or_default(),
            responsible_id: m.responsible_id,
            cost_alert_threshold: m.cost_alert_threshold,
            delay_alert_threshold: m.delay_alert_threshold,
            progress: m.progress,
            metadata,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(p: &Project) -> ActiveModel {
    ActiveModel {
        id: Set(p.id.value().to_string()),
        name: Set(p.name.clone()),
        description: Set(p.description.clone()),
        location: Set(p.location.clone()),
        initial_budget: Set(p.initial_budget),
        current_cost: Set(p.current_cost),
        start_date: Set(p.start_date),
        planned_end_date: Set(p.planned_end_date),
        actual_end_date: Set(p.actual_end_date),
        status: Set(p.status.code().to_string()),
        responsible_id: Set(p.responsible_id.clone()),
        cost_alert_threshold: Set(p.cost_alert_threshold),
        delay_alert_threshold: Set(p.delay_alert_threshold),
        progress: Set(p.progress),
        created_at: Set(Some(p.metadata.created_at)),
        updated_at: Set(Some(p.metadata.updated_at)),
        version: Set(p.metadata.version),
    }
}

pub async fn list(filter: &ProjectFilter) -> anyhow::Result<Vec<Project>> {
    let mut query = Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.code()));
    }
    if let Some(responsible) = filter.responsible_id.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(Column::ResponsibleId.eq(responsible));
    }
    if let Some(text) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(Column::Name.contains(text))
                .add(Column::Location.contains(text)),
        );
    }
    let items = query
        .order_by_desc(Column::StartDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn list_by_statuses(statuses: &[WorkStatus]) -> anyhow::Result<Vec<Project>> {
    let codes: Vec<&str> = statuses.iter().map(|s| s.code()).collect();
    let items = Entity::find()
        .filter(Column::Status.is_in(codes))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Project>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(project: &Project) -> anyhow::Result<Uuid> {
    to_active(project).insert(conn()).await?;
    Ok(project.id.value())
}

pub async fn update(project: &Project) -> anyhow::Result<()> {
    let mut active = to_active(project);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

/// Записать пересчитанные затраты и прогресс
pub async fn update_rollup(id: Uuid, current_cost: f64, progress: f64) -> anyhow::Result<()> {
    use sea_orm::sea_query::Expr;
    Entity::update_many()
        .col_expr(Column::CurrentCost, Expr::value(current_cost))
        .col_expr(Column::Progress, Expr::value(progress))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
