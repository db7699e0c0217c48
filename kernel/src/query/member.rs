use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{
    Member, MemberEmail, MemberFilter, MemberId, MemberStatus, Page, SelectLimit, SelectOffset,
};
use crate::KernelError;

#[async_trait::async_trait]
pub trait MemberQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError>;
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError>;
    async fn find_by_email(
        &self,
        con: &mut Self::Transaction,
        email: &MemberEmail,
    ) -> error_stack::Result<Option<Member>, KernelError>;
    async fn exists_by_email(
        &self,
        con: &mut Self::Transaction,
        email: &MemberEmail,
    ) -> error_stack::Result<bool, KernelError>;
    async fn find_page(
        &self,
        con: &mut Self::Transaction,
        filter: &MemberFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Page<Member>, KernelError>;
    async fn count_by(
        &self,
        con: &mut Self::Transaction,
        filter: &MemberFilter,
    ) -> error_stack::Result<i64, KernelError>;
    async fn count_by_status(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<(MemberStatus, i64)>, KernelError>;
}

pub trait DependOnMemberQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type MemberQuery: MemberQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn member_query(&self) -> &Self::MemberQuery;
}
