//! Members, committees and projects: the records pledges and movements
//! reference.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Committee, CreateProjectCmd, EngineError, Member, Project, ResultEngine, committees, members,
    pledges, projects,
    util::{ensure_positive, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a member who can commit pledges.
    pub async fn new_member(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "member name")?;
        with_tx!(self, |db_tx| {
            let member = Member::new(name);
            members::ActiveModel::from(&member).insert(&db_tx).await?;
            tracing::info!(member_id = %member.id, "member created");
            Ok(member.id)
        })
    }

    pub async fn member(&self, member_id: Uuid) -> ResultEngine<Member> {
        with_tx!(self, |db_tx| {
            let model = self.require_member(&db_tx, member_id).await?;
            Member::try_from(model)
        })
    }

    /// All members, ordered by name.
    pub async fn members(&self) -> ResultEngine<Vec<Member>> {
        let models = members::Entity::find()
            .order_by_asc(members::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Member::try_from).collect()
    }

    /// Deletes a member.
    ///
    /// Refused with `InvariantViolation` while any pledge (of any status)
    /// references the member.
    pub async fn delete_member(&self, member_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, member_id).await?;
            let pledges = pledges::Entity::find()
                .filter(pledges::Column::DebtorId.eq(member_id.to_string()))
                .count(&db_tx)
                .await?;
            if pledges > 0 {
                return Err(EngineError::InvariantViolation(format!(
                    "member is referenced by {pledges} pledge(s)"
                )));
            }
            members::Entity::delete_by_id(member_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(%member_id, "member deleted");
            Ok(())
        })
    }

    /// Create a committee. Names are unique, case-insensitively.
    pub async fn new_committee(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "committee name")?;
        with_tx!(self, |db_tx| {
            let exists = committees::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!(
                    "committee '{name}' already exists"
                )));
            }

            let committee = Committee::new(name);
            committees::ActiveModel::from(&committee)
                .insert(&db_tx)
                .await?;
            tracing::info!(committee_id = %committee.id, "committee created");
            Ok(committee.id)
        })
    }

    pub async fn committee(&self, committee_id: Uuid) -> ResultEngine<Committee> {
        with_tx!(self, |db_tx| {
            let model = self.require_committee(&db_tx, committee_id).await?;
            Committee::try_from(model)
        })
    }

    /// All committees, ordered by name.
    pub async fn committees(&self) -> ResultEngine<Vec<Committee>> {
        let models = committees::Entity::find()
            .order_by_asc(committees::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Committee::try_from).collect()
    }

    /// Create a fundraising project, optionally owned by a committee.
    pub async fn new_project(&self, cmd: CreateProjectCmd) -> ResultEngine<Uuid> {
        let CreateProjectCmd {
            name,
            committee_id,
            goal_minor,
        } = cmd;
        let name = normalize_required_name(&name, "project name")?;
        if let Some(goal_minor) = goal_minor {
            ensure_positive(goal_minor, "goal")?;
        }
        with_tx!(self, |db_tx| {
            self.require_optional_committee(&db_tx, committee_id)
                .await?;
            let project = Project::new(name, committee_id, goal_minor);
            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            tracing::info!(project_id = %project.id, "project created");
            Ok(project.id)
        })
    }

    pub async fn project(&self, project_id: Uuid) -> ResultEngine<Project> {
        with_tx!(self, |db_tx| {
            let model = self.require_project(&db_tx, project_id).await?;
            Project::try_from(model)
        })
    }
}
