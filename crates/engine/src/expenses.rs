//! Committee outflow records.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, PaymentMethod, ResultEngine,
    util::{ensure_positive, parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub concept: String,
    pub payment_method: PaymentMethod,
    pub project_id: Option<Uuid>,
    /// Reference to a stored receipt (file key, URL); opaque to the engine.
    pub receipt_ref: Option<String>,
    pub note: Option<String>,
    pub registered_by: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        committee_id: Uuid,
        amount_minor: i64,
        occurred_on: NaiveDate,
        concept: String,
        payment_method: PaymentMethod,
        registered_by: String,
    ) -> ResultEngine<Self> {
        ensure_positive(amount_minor, "amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            committee_id,
            amount_minor,
            occurred_on,
            concept,
            payment_method,
            project_id: None,
            receipt_ref: None,
            note: None,
            registered_by,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub committee_id: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub concept: String,
    pub payment_method: String,
    pub project_id: Option<String>,
    pub receipt_ref: Option<String>,
    pub note: Option<String>,
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

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            committee_id: ActiveValue::Set(expense.committee_id.to_string()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            occurred_on: ActiveValue::Set(expense.occurred_on),
            concept: ActiveValue::Set(expense.concept.clone()),
            payment_method: ActiveValue::Set(expense.payment_method.as_str().to_string()),
            project_id: ActiveValue::Set(expense.project_id.map(|id| id.to_string())),
            receipt_ref: ActiveValue::Set(expense.receipt_ref.clone()),
            note: ActiveValue::Set(expense.note.clone()),
            registered_by: ActiveValue::Set(expense.registered_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            committee_id: parse_uuid(&model.committee_id, "committee")?,
            amount_minor: model.amount_minor,
            occurred_on: model.occurred_on,
            concept: model.concept,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            project_id: parse_optional_uuid(model.project_id.as_deref(), "project")?,
            receipt_ref: model.receipt_ref,
            note: model.note,
            registered_by: model.registered_by,
            created_at: model.created_at,
        })
    }
}
