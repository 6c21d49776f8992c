mod common;

use engine::{
    BalanceChangeCause, CreatePledgeCmd, CreateProjectCmd, EngineError, EngineEvent,
    MovementListFilter, OfferingCategory, PaymentMethod, PledgeStatus, RecordExpenseCmd,
    RecordOfferingCmd, RegisterPaymentCmd, UpdateMovementCmd,
};
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

use common::{committee_pledge, date, engine_with_db, seed, today};

fn offering(committee: Uuid, amount_minor: i64) -> RecordOfferingCmd {
    RecordOfferingCmd::new(committee, "treasurer", amount_minor, today(), "Sunday service")
}

fn expense(committee: Uuid, amount_minor: i64) -> RecordExpenseCmd {
    RecordExpenseCmd::new(committee, "treasurer", amount_minor, today(), "Sound equipment")
}

#[tokio::test]
async fn balance_sums_offerings_pledge_payments_and_expenses() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;

    engine.record_offering(offering(committee, 300_000)).await.unwrap();
    engine
        .record_offering(offering(committee, 200_000).category(OfferingCategory::Tithe))
        .await
        .unwrap();
    engine.record_expense(expense(committee, 120_000)).await.unwrap();

    let pledge_id = committee_pledge(&engine, member, committee, 250_000).await;
    engine
        .register_payment(RegisterPaymentCmd::new(pledge_id, "treasurer", 200_000, today()))
        .await
        .unwrap();

    let balance = engine.committee_balance(committee).await.unwrap();
    assert_eq!(balance.offering_income_minor, 500_000);
    assert_eq!(balance.pledge_income_minor, 200_000);
    assert_eq!(balance.total_income_minor, 700_000);
    assert_eq!(balance.total_expense_minor, 120_000);
    assert_eq!(balance.balance_minor, 580_000);
}

#[tokio::test]
async fn balance_ignores_other_committees_and_unscoped_pledges() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;
    let other = engine.new_committee("Damas").await.unwrap();

    engine.record_offering(offering(other, 9_999)).await.unwrap();
    let unscoped = engine
        .new_pledge(CreatePledgeCmd::new(member, "treasurer", 5_000, date(2026, 12, 1)))
        .await
        .unwrap();
    engine
        .register_payment(RegisterPaymentCmd::new(unscoped, "treasurer", 5_000, today()))
        .await
        .unwrap();

    let balance = engine.committee_balance(committee).await.unwrap();
    assert_eq!(balance.total_income_minor, 0);
    assert_eq!(balance.balance_minor, 0);

    let err = engine.committee_balance(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn balance_follows_every_commit() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;
    let pledge_id = committee_pledge(&engine, member, committee, 10_000).await;

    engine
        .register_payment(RegisterPaymentCmd::new(pledge_id, "treasurer", 4_000, today()))
        .await
        .unwrap();
    assert_eq!(engine.committee_balance(committee).await.unwrap().balance_minor, 4_000);

    let expense_id = engine.record_expense(expense(committee, 6_000)).await.unwrap();
    assert_eq!(engine.committee_balance(committee).await.unwrap().balance_minor, -2_000);

    engine
        .update_expense(UpdateMovementCmd::new(committee, expense_id).amount_minor(1_000))
        .await
        .unwrap();
    assert_eq!(engine.committee_balance(committee).await.unwrap().balance_minor, 3_000);

    engine.delete_expense(committee, expense_id).await.unwrap();
    assert_eq!(engine.committee_balance(committee).await.unwrap().balance_minor, 4_000);

    // Money collected before a cancellation stays income.
    engine.cancel_pledge(pledge_id, "pastor").await.unwrap();
    assert_eq!(engine.committee_balance(committee).await.unwrap().balance_minor, 4_000);
}

#[tokio::test]
async fn movements_are_validated() {
    let (engine, _db) = engine_with_db().await;
    let (_member, committee) = seed(&engine).await;

    let err = engine.record_offering(offering(committee, 0)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine.record_expense(expense(Uuid::new_v4(), 10)).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .record_expense(RecordExpenseCmd::new(committee, "treasurer", 10, today(), "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .record_offering(offering(committee, 10).project_id(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn movements_list_by_range_and_project() {
    let (engine, _db) = engine_with_db().await;
    let (_member, committee) = seed(&engine).await;
    let project = engine
        .new_project(CreateProjectCmd::new("Roof").committee_id(committee))
        .await
        .unwrap();

    engine
        .record_offering(RecordOfferingCmd::new(
            committee,
            "treasurer",
            100,
            date(2026, 9, 1),
            "September",
        ))
        .await
        .unwrap();
    engine
        .record_offering(offering(committee, 200).project_id(project))
        .await
        .unwrap();
    engine
        .record_expense(
            expense(committee, 50)
                .payment_method(PaymentMethod::Transfer)
                .receipt_ref("receipts/2026/10/001.pdf"),
        )
        .await
        .unwrap();

    let all = engine
        .offerings(committee, &MovementListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.iter().map(|o| o.amount_minor).collect::<Vec<_>>(), vec![100, 200]);

    let october = engine
        .offerings(
            committee,
            &MovementListFilter {
                from: Some(date(2026, 10, 1)),
                to: Some(date(2026, 10, 31)),
                project_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(october.len(), 1);

    let for_project = engine
        .offerings(
            committee,
            &MovementListFilter {
                project_id: Some(project),
                ..MovementListFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(for_project.len(), 1);
    assert_eq!(for_project[0].project_id, Some(project));

    let expenses = engine
        .expenses(committee, &MovementListFilter::default())
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].payment_method, PaymentMethod::Transfer);
    assert_eq!(
        expenses[0].receipt_ref.as_deref(),
        Some("receipts/2026/10/001.pdf")
    );
}

#[tokio::test]
async fn movement_edits_are_scoped_to_their_committee() {
    let (engine, _db) = engine_with_db().await;
    let (_member, committee) = seed(&engine).await;
    let other = engine.new_committee("Damas").await.unwrap();
    let offering_id = engine.record_offering(offering(committee, 500)).await.unwrap();

    let err = engine
        .update_offering(UpdateMovementCmd::new(other, offering_id).amount_minor(1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    let err = engine.delete_offering(other, offering_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .update_offering(UpdateMovementCmd::new(committee, offering_id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let updated = engine
        .update_offering(
            UpdateMovementCmd::new(committee, offering_id)
                .concept("Harvest festival")
                .occurred_on(date(2026, 10, 4)),
        )
        .await
        .unwrap();
    assert_eq!(updated.concept, "Harvest festival");
    assert_eq!(updated.occurred_on, date(2026, 10, 4));
    assert_eq!(updated.amount_minor, 500);
}

#[tokio::test]
async fn project_progress_aggregates_its_pledges_and_movements() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;
    let project = engine
        .new_project(
            CreateProjectCmd::new("New roof")
                .committee_id(committee)
                .goal_minor(1_000_000),
        )
        .await
        .unwrap();

    let pledge_id = engine
        .new_pledge(
            CreatePledgeCmd::new(member, "treasurer", 400_000, date(2027, 1, 1))
                .committee_id(committee)
                .project_id(project),
        )
        .await
        .unwrap();
    let cancelled = engine
        .new_pledge(
            CreatePledgeCmd::new(member, "treasurer", 50_000, date(2027, 1, 1)).project_id(project),
        )
        .await
        .unwrap();
    engine.cancel_pledge(cancelled, "pastor").await.unwrap();
    engine
        .register_payment(RegisterPaymentCmd::new(pledge_id, "treasurer", 150_000, today()))
        .await
        .unwrap();
    engine
        .record_offering(offering(committee, 30_000).project_id(project))
        .await
        .unwrap();
    engine
        .record_expense(expense(committee, 80_000).project_id(project))
        .await
        .unwrap();

    let progress = engine.project_progress(project).await.unwrap();
    assert_eq!(progress.goal_minor, Some(1_000_000));
    assert_eq!(progress.pledged_minor, 400_000);
    assert_eq!(progress.collected_minor, 150_000);
    assert_eq!(progress.offerings_minor, 30_000);
    assert_eq!(progress.expenses_minor, 80_000);
    assert_eq!(progress.net_minor, 100_000);
}

#[tokio::test]
async fn committee_names_are_unique_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    engine.new_committee("Alabanza").await.unwrap();

    let err = engine.new_committee("  ALABANZA ").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = engine.new_committee("").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn project_goal_must_be_positive() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .new_project(CreateProjectCmd::new("Van").goal_minor(0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .new_project(CreateProjectCmd::new("Van").committee_id(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn member_with_pledges_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;
    let pledge_id = committee_pledge(&engine, member, committee, 1_000).await;
    engine.cancel_pledge(pledge_id, "pastor").await.unwrap();

    let err = engine.delete_member(member).await.unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let loner = engine.new_member("Marta").await.unwrap();
    engine.delete_member(loner).await.unwrap();
    let err = engine.member(loner).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn committed_mutations_publish_events() {
    let (engine, _db) = engine_with_db().await;
    let (member, committee) = seed(&engine).await;
    let pledge_id = committee_pledge(&engine, member, committee, 10_000).await;
    let mut rx = engine.subscribe();

    let outcome = engine
        .register_payment(RegisterPaymentCmd::new(pledge_id, "treasurer", 10_000, today()))
        .await
        .unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::PledgeChanged {
            pledge_id,
            status: PledgeStatus::Completed,
            amount_collected_minor: 10_000,
        }
    );
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::BalanceChanged {
            committee_id: committee,
            cause: BalanceChangeCause::Payment(outcome.payment_id),
        }
    );

    let offering_id = engine.record_offering(offering(committee, 1)).await.unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::BalanceChanged {
            committee_id: committee,
            cause: BalanceChangeCause::Offering(offering_id),
        }
    );

    // Failed mutations publish nothing.
    engine.record_offering(offering(committee, -1)).await.unwrap_err();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
