use error_stack::ResultExt;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::MemberQuery;
use kernel::interface::update::MemberModifier;
use kernel::prelude::entity::{
    CreatedAt, Member, MemberEmail, MemberFilter, MemberId, MemberName, MemberPassword,
    MemberPhone, MemberStatus, Page, SelectLimit, SelectOffset, UpdatedAt,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresMemberRepository;

#[async_trait::async_trait]
impl MemberQuery for PostgresMemberRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        PgMemberInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        PgMemberInternal::find_by_id(con, id, true).await
    }

    async fn find_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &MemberEmail,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        PgMemberInternal::find_by_email(con, email).await
    }

    async fn exists_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &MemberEmail,
    ) -> error_stack::Result<bool, KernelError> {
        PgMemberInternal::exists_by_email(con, email).await
    }

    async fn find_page(
        &self,
        con: &mut PostgresTransaction,
        filter: &MemberFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Page<Member>, KernelError> {
        let items = PgMemberInternal::find_all(con, filter, limit, offset).await?;
        let total = PgMemberInternal::count_by(con, filter).await?;
        Ok(Page::new(items, total, limit.clone(), offset.clone()))
    }

    async fn count_by(
        &self,
        con: &mut PostgresTransaction,
        filter: &MemberFilter,
    ) -> error_stack::Result<i64, KernelError> {
        PgMemberInternal::count_by(con, filter).await
    }

    async fn count_by_status(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<(MemberStatus, i64)>, KernelError> {
        PgMemberInternal::count_by_status(con).await
    }
}

#[async_trait::async_trait]
impl MemberModifier for PostgresMemberRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        PgMemberInternal::create(con, member).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        PgMemberInternal::update(con, member).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        member_id: &MemberId,
    ) -> error_stack::Result<(), KernelError> {
        PgMemberInternal::delete(con, member_id).await
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    member_id: Uuid,
    email: String,
    password: String,
    name: String,
    phone: Option<String>,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<MemberRow> for Member {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: MemberRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<MemberStatus>()
            .change_context(KernelError::Internal)?;
        Ok(Member::new(
            MemberId::new(value.member_id),
            MemberEmail::new(value.email),
            MemberPassword::new(value.password),
            MemberName::new(value.name),
            value.phone.map(MemberPhone::new),
            status,
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        ))
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MemberFilter) {
    match filter {
        MemberFilter::All => {}
        MemberFilter::NameContains(name) => {
            builder
                .push(" WHERE strpos(name, ")
                .push_bind(name.clone())
                .push(") > 0");
        }
        MemberFilter::Status(status) => {
            builder.push(" WHERE status = ").push_bind(status.as_str());
        }
        MemberFilter::CreatedBetween { from, to } => {
            builder
                .push(" WHERE created_at BETWEEN ")
                .push_bind(*from)
                .push(" AND ")
                .push_bind(*to);
        }
    }
}

pub(in crate::database) struct PgMemberInternal;

impl PgMemberInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &MemberId,
        lock: bool,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT member_id, email, password, name, phone, status, created_at, updated_at
            FROM members
            WHERE member_id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT member_id, email, password, name, phone, status, created_at, updated_at
            FROM members
            WHERE member_id = $1
            "#
        };
        let row = sqlx::query_as::<_, MemberRow>(query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Member::try_from).transpose()
    }

    async fn find_by_email(
        con: &mut PgConnection,
        email: &MemberEmail,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        let row = sqlx::query_as::<_, MemberRow>(
            // language=postgresql
            r#"
            SELECT member_id, email, password, name, phone, status, created_at, updated_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Member::try_from).transpose()
    }

    async fn exists_by_email(
        con: &mut PgConnection,
        email: &MemberEmail,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)
            "#,
        )
        .bind(email.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn find_all(
        con: &mut PgConnection,
        filter: &MemberFilter,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Member>, KernelError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            // language=postgresql
            r#"
            SELECT member_id, email, password, name, phone, status, created_at, updated_at
            FROM members
            "#,
        );
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, member_id DESC LIMIT ")
            .push_bind(i64::from(*limit.as_ref()))
            .push(" OFFSET ")
            .push_bind(i64::from(*offset.as_ref()));
        let rows = builder
            .build_query_as::<MemberRow>()
            .fetch_all(con)
            .await
            .convert_error()?;
        rows.into_iter().map(Member::try_from).collect()
    }

    async fn count_by(
        con: &mut PgConnection,
        filter: &MemberFilter,
    ) -> error_stack::Result<i64, KernelError> {
        // language=postgresql
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM members");
        push_filter(&mut builder, filter);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(con)
            .await
            .convert_error()
    }

    async fn count_by_status(
        con: &mut PgConnection,
    ) -> error_stack::Result<Vec<(MemberStatus, i64)>, KernelError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            // language=postgresql
            r#"
            SELECT status, COUNT(*)
            FROM members
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter()
            .map(|(status, count)| -> error_stack::Result<_, KernelError> {
                let status = status
                    .parse::<MemberStatus>()
                    .change_context(KernelError::Internal)?;
                Ok((status, count))
            })
            .collect()
    }

    async fn create(
        con: &mut PgConnection,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO members (member_id, email, password, name, phone, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(member.id().as_ref())
        .bind(member.email().as_ref())
        .bind(member.password().as_ref())
        .bind(member.name().as_ref())
        .bind(member.phone().as_ref().map(AsRef::<String>::as_ref))
        .bind(member.status().as_str())
        .bind(member.created_at().as_ref())
        .bind(member.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE members
            SET password = $2, name = $3, phone = $4, status = $5, updated_at = $6
            WHERE member_id = $1
            "#,
        )
        .bind(member.id().as_ref())
        .bind(member.password().as_ref())
        .bind(member.name().as_ref())
        .bind(member.phone().as_ref().map(AsRef::<String>::as_ref))
        .bind(member.status().as_str())
        .bind(member.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        member_id: &MemberId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
