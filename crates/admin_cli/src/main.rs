use std::error::Error;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{CreatePledgeCmd, CreateProjectCmd, Engine, Money, PaymentMethod, RegisterPaymentCmd};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "diezmo_admin")]
#[command(about = "Admin utilities for Diezmo (bootstrap members, committees, pledges)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./diezmo.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Member(Member),
    Committee(Committee),
    Project(Project),
    Pledge(Pledge),
    Payment(Payment),
    /// Prints the recomputed balance of a committee.
    Balance(BalanceArgs),
}

#[derive(Args, Debug)]
struct Member {
    #[command(subcommand)]
    command: MemberCommand,
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    Create(NameArgs),
    List,
}

#[derive(Args, Debug)]
struct Committee {
    #[command(subcommand)]
    command: CommitteeCommand,
}

#[derive(Subcommand, Debug)]
enum CommitteeCommand {
    Create(NameArgs),
    List,
}

#[derive(Args, Debug)]
struct NameArgs {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Project {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Create(ProjectCreateArgs),
}

#[derive(Args, Debug)]
struct ProjectCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    committee: Option<Uuid>,
    /// Fundraising goal, e.g. `25000.00`.
    #[arg(long)]
    goal: Option<Money>,
}

#[derive(Args, Debug)]
struct Pledge {
    #[command(subcommand)]
    command: PledgeCommand,
}

#[derive(Subcommand, Debug)]
enum PledgeCommand {
    Create(PledgeCreateArgs),
}

#[derive(Args, Debug)]
struct PledgeCreateArgs {
    #[arg(long)]
    member: Uuid,
    /// Committed amount, e.g. `1500.00`.
    #[arg(long)]
    amount: Money,
    /// Due date as `YYYY-MM-DD`.
    #[arg(long)]
    due: NaiveDate,
    #[arg(long)]
    purpose: Option<String>,
    #[arg(long)]
    committee: Option<Uuid>,
    #[arg(long)]
    project: Option<Uuid>,
    #[arg(long, default_value = "admin")]
    actor: String,
}

#[derive(Args, Debug)]
struct Payment {
    #[command(subcommand)]
    command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
enum PaymentCommand {
    Register(PaymentRegisterArgs),
}

#[derive(Args, Debug)]
struct PaymentRegisterArgs {
    #[arg(long)]
    pledge: Uuid,
    #[arg(long)]
    amount: Money,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "cash", value_parser = parse_method)]
    method: PaymentMethod,
    #[arg(long)]
    note: Option<String>,
    #[arg(long, default_value = "admin")]
    actor: String,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[arg(long)]
    committee: Uuid,
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::try_from(raw.to_lowercase().as_str()).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Member(Member {
            command: MemberCommand::Create(args),
        }) => {
            let id = engine.new_member(&args.name).await?;
            println!("created member: {} ({id})", args.name);
        }
        Command::Member(Member {
            command: MemberCommand::List,
        }) => {
            for member in engine.members().await? {
                println!("{}\t{}", member.id, member.name);
            }
        }
        Command::Committee(Committee {
            command: CommitteeCommand::Create(args),
        }) => {
            let id = engine.new_committee(&args.name).await?;
            println!("created committee: {} ({id})", args.name);
        }
        Command::Committee(Committee {
            command: CommitteeCommand::List,
        }) => {
            for committee in engine.committees().await? {
                println!("{}\t{}", committee.id, committee.name);
            }
        }
        Command::Project(Project {
            command: ProjectCommand::Create(args),
        }) => {
            let mut cmd = CreateProjectCmd::new(&args.name);
            if let Some(committee) = args.committee {
                cmd = cmd.committee_id(committee);
            }
            if let Some(goal) = args.goal {
                cmd = cmd.goal_minor(goal.minor());
            }
            let id = engine.new_project(cmd).await?;
            println!("created project: {} ({id})", args.name);
        }
        Command::Pledge(Pledge {
            command: PledgeCommand::Create(args),
        }) => {
            let mut cmd =
                CreatePledgeCmd::new(args.member, args.actor, args.amount.minor(), args.due);
            if let Some(purpose) = args.purpose {
                cmd = cmd.purpose(purpose);
            }
            if let Some(committee) = args.committee {
                cmd = cmd.committee_id(committee);
            }
            if let Some(project) = args.project {
                cmd = cmd.project_id(project);
            }
            let id = engine.new_pledge(cmd).await?;
            println!("created pledge: {} due {} ({id})", args.amount, args.due);
        }
        Command::Payment(Payment {
            command: PaymentCommand::Register(args),
        }) => {
            let date = args.date.unwrap_or_else(|| engine.today());
            let mut cmd =
                RegisterPaymentCmd::new(args.pledge, args.actor, args.amount.minor(), date)
                    .method(args.method);
            if let Some(note) = args.note {
                cmd = cmd.note(note);
            }
            let outcome = engine.register_payment(cmd).await?;
            println!(
                "registered payment {}: collected {} ({})",
                outcome.payment_id,
                Money::new(outcome.amount_collected_minor),
                outcome.status.as_str()
            );
        }
        Command::Balance(args) => {
            let balance = engine.committee_balance(args.committee).await?;
            println!("offerings: {}", Money::new(balance.offering_income_minor));
            println!("pledges:   {}", Money::new(balance.pledge_income_minor));
            println!("expenses:  {}", Money::new(balance.total_expense_minor));
            println!("balance:   {}", Money::new(balance.balance_minor));
        }
    }

    Ok(())
}
