//! Payment primitives.
//!
//! A `Payment` is an immutable application of funds to exactly one pledge.
//! Rows are only ever inserted by payment registration.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{ensure_positive, parse_uuid},
};

/// How funds were handed over. Shared by payments and expenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Check,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::Check => "check",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "check" => Ok(Self::Check),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidInput(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub pledge_id: Uuid,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub registered_by: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        pledge_id: Uuid,
        amount_minor: i64,
        paid_on: NaiveDate,
        method: PaymentMethod,
        note: Option<String>,
        registered_by: String,
    ) -> ResultEngine<Self> {
        ensure_positive(amount_minor, "amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            pledge_id,
            amount_minor,
            paid_on,
            method,
            note,
            registered_by,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub pledge_id: String,
    pub amount_minor: i64,
    pub paid_on: Date,
    pub method: String,
    pub note: Option<String>,
    pub registered_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pledges::Entity",
        from = "Column::PledgeId",
        to = "super::pledges::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Pledges,
}

impl Related<super::pledges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pledges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            pledge_id: ActiveValue::Set(payment.pledge_id.to_string()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            paid_on: ActiveValue::Set(payment.paid_on),
            method: ActiveValue::Set(payment.method.as_str().to_string()),
            note: ActiveValue::Set(payment.note.clone()),
            registered_by: ActiveValue::Set(payment.registered_by.clone()),
            created_at: ActiveValue::Set(payment.created_at),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "payment")?,
            pledge_id: parse_uuid(&model.pledge_id, "pledge")?,
            amount_minor: model.amount_minor,
            paid_on: model.paid_on,
            method: PaymentMethod::try_from(model.method.as_str())?,
            note: model.note,
            registered_by: model.registered_by,
            created_at: model.created_at,
        })
    }
}
