//! Fundraising projects (campaigns).
//!
//! A project is a weak reference target: pledges, offerings and expenses may
//! point at it, and [`ProjectProgress`](crate::ProjectProgress) aggregates
//! across them.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub committee_id: Option<Uuid>,
    /// Fundraising target, in minor units.
    pub goal_minor: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, committee_id: Option<Uuid>, goal_minor: Option<i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            committee_id,
            goal_minor,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub committee_id: Option<String>,
    pub goal_minor: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::committees::Entity",
        from = "Column::CommitteeId",
        to = "super::committees::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Committees,
}

impl Related<super::committees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Committees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            committee_id: ActiveValue::Set(project.committee_id.map(|id| id.to_string())),
            goal_minor: ActiveValue::Set(project.goal_minor),
            created_at: ActiveValue::Set(project.created_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "project")?,
            name: model.name,
            committee_id: parse_optional_uuid(model.committee_id.as_deref(), "committee")?,
            goal_minor: model.goal_minor,
            created_at: model.created_at,
        })
    }
}
