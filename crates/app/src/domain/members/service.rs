//! Members service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::members::{
        data::NewMember,
        errors::MembersServiceError,
        records::{MemberRecord, MemberUuid},
        repository::PgMembersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgMembersService {
    db: Db,
    repository: PgMembersRepository,
}

impl PgMembersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgMembersRepository::new(),
        }
    }
}

#[async_trait]
impl MembersService for PgMembersService {
    async fn create_member(&self, member: NewMember) -> Result<MemberRecord, MembersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_member(&mut tx, member).await?;

        tx.commit().await?;

        info!(member_uuid = %created.uuid, "created member");

        Ok(created)
    }

    async fn get_member(&self, member: MemberUuid) -> Result<MemberRecord, MembersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_member(&mut tx, member).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait MembersService: Send + Sync {
    /// Creates a member with an opening mileage balance.
    async fn create_member(&self, member: NewMember) -> Result<MemberRecord, MembersServiceError>;

    /// Retrieve a member and their mileage balance.
    async fn get_member(&self, member: MemberUuid) -> Result<MemberRecord, MembersServiceError>;
}
