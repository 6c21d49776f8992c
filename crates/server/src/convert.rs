//! Mapping between engine values and their JSON representations.

use api_types::{
    movement::{Expense, Offering, OfferingCategory},
    payment::{Payment, PaymentMethod},
    pledge::{Pledge, PledgeState, PledgeStatus},
};

pub(crate) fn map_status(status: engine::PledgeStatus) -> PledgeStatus {
    match status {
        engine::PledgeStatus::Active => PledgeStatus::Active,
        engine::PledgeStatus::Completed => PledgeStatus::Completed,
        engine::PledgeStatus::Cancelled => PledgeStatus::Cancelled,
    }
}

pub(crate) fn status_from_api(status: PledgeStatus) -> engine::PledgeStatus {
    match status {
        PledgeStatus::Active => engine::PledgeStatus::Active,
        PledgeStatus::Completed => engine::PledgeStatus::Completed,
        PledgeStatus::Cancelled => engine::PledgeStatus::Cancelled,
    }
}

pub(crate) fn map_state(state: engine::PledgeState) -> PledgeState {
    match state {
        engine::PledgeState::Active => PledgeState::Active,
        engine::PledgeState::Overdue => PledgeState::Overdue,
        engine::PledgeState::Completed => PledgeState::Completed,
        engine::PledgeState::Cancelled => PledgeState::Cancelled,
    }
}

pub(crate) fn state_from_api(state: PledgeState) -> engine::PledgeState {
    match state {
        PledgeState::Active => engine::PledgeState::Active,
        PledgeState::Overdue => engine::PledgeState::Overdue,
        PledgeState::Completed => engine::PledgeState::Completed,
        PledgeState::Cancelled => engine::PledgeState::Cancelled,
    }
}

pub(crate) fn map_method(method: engine::PaymentMethod) -> PaymentMethod {
    match method {
        engine::PaymentMethod::Cash => PaymentMethod::Cash,
        engine::PaymentMethod::Transfer => PaymentMethod::Transfer,
        engine::PaymentMethod::Check => PaymentMethod::Check,
        engine::PaymentMethod::Other => PaymentMethod::Other,
    }
}

pub(crate) fn method_from_api(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::Cash => engine::PaymentMethod::Cash,
        PaymentMethod::Transfer => engine::PaymentMethod::Transfer,
        PaymentMethod::Check => engine::PaymentMethod::Check,
        PaymentMethod::Other => engine::PaymentMethod::Other,
    }
}

pub(crate) fn map_category(category: engine::OfferingCategory) -> OfferingCategory {
    match category {
        engine::OfferingCategory::Tithe => OfferingCategory::Tithe,
        engine::OfferingCategory::Offering => OfferingCategory::Offering,
        engine::OfferingCategory::Firstfruit => OfferingCategory::Firstfruit,
        engine::OfferingCategory::Donation => OfferingCategory::Donation,
        engine::OfferingCategory::Other => OfferingCategory::Other,
    }
}

pub(crate) fn category_from_api(category: OfferingCategory) -> engine::OfferingCategory {
    match category {
        OfferingCategory::Tithe => engine::OfferingCategory::Tithe,
        OfferingCategory::Offering => engine::OfferingCategory::Offering,
        OfferingCategory::Firstfruit => engine::OfferingCategory::Firstfruit,
        OfferingCategory::Donation => engine::OfferingCategory::Donation,
        OfferingCategory::Other => engine::OfferingCategory::Other,
    }
}

pub(crate) fn pledge_view(snapshot: engine::PledgeSnapshot) -> Pledge {
    let engine::PledgeSnapshot {
        pledge,
        state,
        pending_minor,
    } = snapshot;
    Pledge {
        id: pledge.id,
        debtor_id: pledge.debtor_id,
        committee_id: pledge.committee_id,
        project_id: pledge.project_id,
        purpose: pledge.purpose,
        amount_total_minor: pledge.amount_total_minor,
        amount_collected_minor: pledge.amount_collected_minor,
        pending_minor,
        due_date: pledge.due_date,
        status: map_status(pledge.status),
        state: map_state(state),
        created_at: pledge.created_at,
        updated_at: pledge.updated_at,
        created_by: pledge.created_by,
        last_updated_by: pledge.last_updated_by,
    }
}

pub(crate) fn payment_view(payment: engine::Payment) -> Payment {
    Payment {
        id: payment.id,
        pledge_id: payment.pledge_id,
        amount_minor: payment.amount_minor,
        date: payment.paid_on,
        method: map_method(payment.method),
        note: payment.note,
        registered_by: payment.registered_by,
        created_at: payment.created_at,
    }
}

pub(crate) fn offering_view(offering: engine::Offering) -> Offering {
    Offering {
        id: offering.id,
        committee_id: offering.committee_id,
        amount_minor: offering.amount_minor,
        date: offering.occurred_on,
        category: map_category(offering.category),
        concept: offering.concept,
        project_id: offering.project_id,
        registered_by: offering.registered_by,
        created_at: offering.created_at,
    }
}

pub(crate) fn expense_view(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        committee_id: expense.committee_id,
        amount_minor: expense.amount_minor,
        date: expense.occurred_on,
        concept: expense.concept,
        payment_method: map_method(expense.payment_method),
        project_id: expense.project_id,
        receipt_ref: expense.receipt_ref,
        note: expense.note,
        registered_by: expense.registered_by,
        created_at: expense.created_at,
    }
}
