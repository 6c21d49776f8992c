//! Committee income records not tied to a pledge.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{ensure_positive, parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingCategory {
    Tithe,
    Offering,
    Firstfruit,
    Donation,
    Other,
}

impl OfferingCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tithe => "tithe",
            Self::Offering => "offering",
            Self::Firstfruit => "firstfruit",
            Self::Donation => "donation",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for OfferingCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tithe" => Ok(Self::Tithe),
            "offering" => Ok(Self::Offering),
            "firstfruit" => Ok(Self::Firstfruit),
            "donation" => Ok(Self::Donation),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidInput(format!(
                "invalid offering category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub category: OfferingCategory,
    pub concept: String,
    pub project_id: Option<Uuid>,
    pub registered_by: String,
    pub created_at: DateTime<Utc>,
}

impl Offering {
    pub fn new(
        committee_id: Uuid,
        amount_minor: i64,
        occurred_on: NaiveDate,
        category: OfferingCategory,
        concept: String,
        registered_by: String,
    ) -> ResultEngine<Self> {
        ensure_positive(amount_minor, "amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            committee_id,
            amount_minor,
            occurred_on,
            category,
            concept,
            project_id: None,
            registered_by,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offerings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub committee_id: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub category: String,
    pub concept: String,
    pub project_id: Option<String>,
    pub registered_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::committees::Entity",
        from = "Column::CommitteeId",
        to = "super::committees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Committees,
}

impl Related<super::committees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Committees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Offering> for ActiveModel {
    fn from(offering: &Offering) -> Self {
        Self {
            id: ActiveValue::Set(offering.id.to_string()),
            committee_id: ActiveValue::Set(offering.committee_id.to_string()),
            amount_minor: ActiveValue::Set(offering.amount_minor),
            occurred_on: ActiveValue::Set(offering.occurred_on),
            category: ActiveValue::Set(offering.category.as_str().to_string()),
            concept: ActiveValue::Set(offering.concept.clone()),
            project_id: ActiveValue::Set(offering.project_id.map(|id| id.to_string())),
            registered_by: ActiveValue::Set(offering.registered_by.clone()),
            created_at: ActiveValue::Set(offering.created_at),
        }
    }
}

impl TryFrom<Model> for Offering {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "offering")?,
            committee_id: parse_uuid(&model.committee_id, "committee")?,
            amount_minor: model.amount_minor,
            occurred_on: model.occurred_on,
            category: OfferingCategory::try_from(model.category.as_str())?,
            concept: model.concept,
            project_id: parse_optional_uuid(model.project_id.as_deref(), "project")?,
            registered_by: model.registered_by,
            created_at: model.created_at,
        })
    }
}
