//! Committees: organizational sub-units owning an income/expense ledger.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Committee {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "committees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pledges::Entity")]
    Pledges,
    #[sea_orm(has_many = "super::offerings::Entity")]
    Offerings,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::pledges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pledges.def()
    }
}

impl Related<super::offerings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offerings.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Committee> for ActiveModel {
    fn from(committee: &Committee) -> Self {
        Self {
            id: ActiveValue::Set(committee.id.to_string()),
            name: ActiveValue::Set(committee.name.clone()),
            created_at: ActiveValue::Set(committee.created_at),
        }
    }
}

impl TryFrom<Model> for Committee {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "committee")?,
            name: model.name,
            created_at: model.created_at,
        })
    }
}
