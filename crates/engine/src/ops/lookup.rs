use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, committees, members, pledges, projects};

use super::Engine;

/// Generates `find_*` and `require_*` methods for an entity keyed by a UUID
/// string.
macro_rules! impl_lookup {
    ($find_fn:ident, $require_fn:ident, $entity:path, $model:ty, $err_msg:literal) => {
        pub(super) async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<Option<$model>> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
        ) -> ResultEngine<$model> {
            self.$find_fn(db, id)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_lookup!(
        find_member,
        require_member,
        members::Entity,
        members::Model,
        "member"
    );

    impl_lookup!(
        find_committee,
        require_committee,
        committees::Entity,
        committees::Model,
        "committee"
    );

    impl_lookup!(
        find_project,
        require_project,
        projects::Entity,
        projects::Model,
        "project"
    );

    impl_lookup!(
        find_pledge,
        require_pledge,
        pledges::Entity,
        pledges::Model,
        "pledge"
    );

    /// Reads a pledge row holding an exclusive row lock until the transaction
    /// ends.
    ///
    /// SQLite has no row locks (writers are serialized per database), so the
    /// lock clause is only emitted for backends that understand it; the
    /// conditional update in payment registration covers SQLite.
    pub(super) async fn require_pledge_for_update(
        &self,
        db: &DatabaseTransaction,
        id: Uuid,
    ) -> ResultEngine<pledges::Model> {
        let mut query = pledges::Entity::find_by_id(id.to_string());
        if db.get_database_backend() != DbBackend::Sqlite {
            query = query.lock_exclusive();
        }
        query
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("pledge".to_string()))
    }

    pub(super) async fn require_optional_committee(
        &self,
        db: &DatabaseTransaction,
        id: Option<Uuid>,
    ) -> ResultEngine<()> {
        if let Some(id) = id {
            self.require_committee(db, id).await?;
        }
        Ok(())
    }

    pub(super) async fn require_optional_project(
        &self,
        db: &DatabaseTransaction,
        id: Option<Uuid>,
    ) -> ResultEngine<()> {
        if let Some(id) = id {
            self.require_project(db, id).await?;
        }
        Ok(())
    }
}
