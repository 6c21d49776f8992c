#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{CreatePledgeCmd, Engine, FixedClock};
use migration::MigratorTrait;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    date(2026, 10, 15)
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .clock(FixedClock(today()))
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// File-backed database: several pooled connections really race.
pub async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .clock(FixedClock(today()))
        .build()
        .await
        .unwrap();
    (engine, path)
}

/// A member and a committee to hang pledges and movements on.
pub async fn seed(engine: &Engine) -> (Uuid, Uuid) {
    let member = engine.new_member("Ana Gómez").await.unwrap();
    let committee = engine.new_committee("Jóvenes").await.unwrap();
    (member, committee)
}

pub async fn committee_pledge(
    engine: &Engine,
    member: Uuid,
    committee: Uuid,
    amount_total_minor: i64,
) -> Uuid {
    engine
        .new_pledge(
            CreatePledgeCmd::new(member, "treasurer", amount_total_minor, date(2026, 12, 31))
                .committee_id(committee)
                .purpose("building fund"),
        )
        .await
        .unwrap()
}
