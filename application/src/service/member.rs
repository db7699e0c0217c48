use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnMemberQuery, MemberQuery};
use kernel::interface::update::{DependOnMemberModifier, MemberModifier};
use kernel::prelude::entity::{
    CreatedAt, Member, MemberEmail, MemberFilter, MemberId, MemberName, MemberPassword,
    MemberPhone, MemberStatus, Page, SelectLimit, SelectOffset, UpdatedAt,
};
use kernel::{KernelError, Resource};

use crate::transfer::{
    ChangePasswordDto, GetMemberByEmailDto, GetMemberDto, ListMembersDto, MemberDto,
    MemberIdDto, RegisterMemberDto, StatusCountDto, UpdateProfileDto,
};

fn member_not_found(id: &MemberId) -> Report<KernelError> {
    Report::new(KernelError::NotFound(Resource::Member))
        .attach_printable(format!("Member not found: {}", id.as_ref()))
}

#[async_trait::async_trait]
pub trait GetMemberService: 'static + Sync + Send + DependOnMemberQuery {
    async fn get_member(&self, dto: GetMemberDto) -> error_stack::Result<MemberDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = MemberId::new(dto.id);
        let member = self
            .member_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| member_not_found(&id))?;
        Ok(MemberDto::from(member))
    }

    async fn get_member_by_email(
        &self,
        dto: GetMemberByEmailDto,
    ) -> error_stack::Result<MemberDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let email = MemberEmail::new(dto.email);
        let member = self
            .member_query()
            .find_by_email(&mut connection, &email)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Resource::Member))
                    .attach_printable(format!("Member not found: email {}", email.as_ref()))
            })?;
        Ok(MemberDto::from(member))
    }

    async fn list_members(
        &self,
        dto: ListMembersDto,
    ) -> error_stack::Result<Page<MemberDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let page = self
            .member_query()
            .find_page(
                &mut connection,
                &dto.filter,
                &SelectLimit::new(dto.limit),
                &SelectOffset::new(dto.offset),
            )
            .await?;
        Ok(page.map(MemberDto::from))
    }

    async fn count_active_members(&self) -> error_stack::Result<i64, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        self.member_query()
            .count_by(&mut connection, &MemberFilter::Status(MemberStatus::Active))
            .await
    }

    async fn count_members_by_status(
        &self,
    ) -> error_stack::Result<Vec<StatusCountDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let counts = self.member_query().count_by_status(&mut connection).await?;
        Ok(counts.into_iter().map(StatusCountDto::from).collect())
    }
}

impl<T> GetMemberService for T where T: DependOnMemberQuery {}

#[async_trait::async_trait]
pub trait RegisterMemberService:
    'static + Sync + Send + DependOnMemberQuery + DependOnMemberModifier
{
    async fn register_member(
        &self,
        dto: RegisterMemberDto,
    ) -> error_stack::Result<MemberDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let email = MemberEmail::new(dto.email);
        if self
            .member_query()
            .exists_by_email(&mut connection, &email)
            .await?
        {
            return Err(Report::new(KernelError::DuplicateResource)
                .attach_printable(format!("Email already in use: {}", email.as_ref())));
        }

        let created_at = CreatedAt::<Member>::now();
        let updated_at = UpdatedAt::new(*created_at.as_ref());
        let member = Member::new(
            MemberId::generate(),
            email,
            MemberPassword::new(dto.password),
            MemberName::new(dto.name),
            dto.phone.map(MemberPhone::new),
            dto.status.unwrap_or_default(),
            created_at,
            updated_at,
        );
        self.member_modifier()
            .create(&mut connection, &member)
            .await?;
        connection.commit().await?;

        tracing::info!(id = %member.id().as_ref(), "Member registered");
        Ok(MemberDto::from(member))
    }
}

impl<T> RegisterMemberService for T where T: DependOnMemberQuery + DependOnMemberModifier {}

#[async_trait::async_trait]
pub trait UpdateMemberService:
    'static + Sync + Send + DependOnMemberQuery + DependOnMemberModifier
{
    async fn update_profile(
        &self,
        dto: UpdateProfileDto,
    ) -> error_stack::Result<MemberDto, KernelError> {
        let id = MemberId::new(dto.id);
        let name = MemberName::new(dto.name);
        let phone = dto.phone.map(MemberPhone::new);
        let member = modify_member(self, &id, |member| member.update_profile(name, phone)).await?;
        tracing::info!(id = %id.as_ref(), "Member profile updated");
        Ok(member)
    }

    // TODO: verify `current_password` against the stored credential once passwords are hashed.
    async fn change_password(
        &self,
        dto: ChangePasswordDto,
    ) -> error_stack::Result<MemberDto, KernelError> {
        if dto.new_password != dto.confirmation {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("New password and confirmation do not match"));
        }
        let id = MemberId::new(dto.id);
        let password = MemberPassword::new(dto.new_password);
        let member = modify_member(self, &id, |member| member.change_password(password)).await?;
        tracing::info!(id = %id.as_ref(), "Member password changed");
        Ok(member)
    }

    async fn withdraw_member(&self, dto: MemberIdDto) -> error_stack::Result<MemberDto, KernelError> {
        let id = MemberId::new(dto.id);
        let member = modify_member(self, &id, Member::withdraw).await?;
        tracing::info!(id = %id.as_ref(), "Member withdrawn");
        Ok(member)
    }

    async fn activate_member(&self, dto: MemberIdDto) -> error_stack::Result<MemberDto, KernelError> {
        let id = MemberId::new(dto.id);
        let member = modify_member(self, &id, Member::activate).await?;
        tracing::info!(id = %id.as_ref(), "Member activated");
        Ok(member)
    }

    async fn deactivate_member(
        &self,
        dto: MemberIdDto,
    ) -> error_stack::Result<MemberDto, KernelError> {
        let id = MemberId::new(dto.id);
        let member = modify_member(self, &id, Member::deactivate).await?;
        tracing::info!(id = %id.as_ref(), "Member deactivated");
        Ok(member)
    }
}

impl<T> UpdateMemberService for T where T: DependOnMemberQuery + DependOnMemberModifier {}

async fn modify_member<S, F>(
    service: &S,
    id: &MemberId,
    f: F,
) -> error_stack::Result<MemberDto, KernelError>
where
    S: DependOnMemberQuery + DependOnMemberModifier + ?Sized,
    F: FnOnce(&mut Member) + Send,
{
    let mut connection = service.database_connection().transact().await?;
    let mut member = service
        .member_query()
        .find_by_id_for_update(&mut connection, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;
    f(&mut member);
    service
        .member_modifier()
        .update(&mut connection, &member)
        .await?;
    connection.commit().await?;
    Ok(MemberDto::from(member))
}

#[async_trait::async_trait]
pub trait DeleteMemberService:
    'static + Sync + Send + DependOnMemberQuery + DependOnMemberModifier
{
    async fn delete_member(&self, dto: MemberIdDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = MemberId::new(dto.id);
        if self
            .member_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?
            .is_none()
        {
            return Err(member_not_found(&id));
        }
        self.member_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        tracing::info!(id = %id.as_ref(), "Member deleted");
        Ok(())
    }
}

impl<T> DeleteMemberService for T where T: DependOnMemberQuery + DependOnMemberModifier {}

#[cfg(test)]
mod test {
    use time::Duration;
    use uuid::Uuid;

    use kernel::prelude::entity::{MemberFilter, MemberStatus};
    use kernel::{KernelError, Resource};

    use crate::mock::MockDatabase;
    use crate::service::{
        DeleteMemberService, GetMemberService, RegisterMemberService, UpdateMemberService,
    };
    use crate::transfer::{
        ChangePasswordDto, GetMemberByEmailDto, GetMemberDto, ListMembersDto, MemberIdDto,
        RegisterMemberDto, UpdateProfileDto,
    };

    fn register_dto(email: &str) -> RegisterMemberDto {
        RegisterMemberDto {
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            name: "Hong Gildong".to_string(),
            phone: Some("010-1234-5678".to_string()),
            status: None,
        }
    }

    fn stored_password(db: &MockDatabase, id: Uuid) -> String {
        let store = db.snapshot();
        let member = store
            .members
            .iter()
            .find(|member| member.id().as_ref() == &id)
            .unwrap();
        member.password().as_ref().clone()
    }

    #[tokio::test]
    async fn register_defaults_to_active() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();

        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.id.get_version_num(), 7);
        assert_eq!(stored_password(&db, member.id), "Passw0rd!");

        let found = db
            .get_member_by_email(GetMemberByEmailDto {
                email: "hong@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(found, member);
    }

    #[tokio::test]
    async fn register_keeps_supplied_status() {
        let db = MockDatabase::default();
        let mut dto = register_dto("kim@example.com");
        dto.status = Some(MemberStatus::Inactive);
        let member = db.register_member(dto).await.unwrap();
        assert_eq!(member.status, MemberStatus::Inactive);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = MockDatabase::default();
        let lookup = || GetMemberByEmailDto {
            email: "hong@example.com".to_string(),
        };
        let error = db.get_member_by_email(lookup()).await.unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound(Resource::Member));

        let first = db.register_member(register_dto("hong@example.com")).await.unwrap();
        assert_eq!(db.get_member_by_email(lookup()).await.unwrap().id, first.id);

        let error = db
            .register_member(register_dto("hong@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.current_context(), &KernelError::DuplicateResource);
        assert_eq!(db.snapshot().members.len(), 1);
    }

    #[tokio::test]
    async fn password_mismatch_fails_before_lookup() {
        let db = MockDatabase::default();
        let error = db
            .change_password(ChangePasswordDto {
                id: Uuid::now_v7(),
                current_password: "Passw0rd!".to_string(),
                new_password: "N3wPassw0rd!".to_string(),
                confirmation: "Other0ne!".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidArgument);
    }

    #[tokio::test]
    async fn change_password_overwrites_credential() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();
        db.change_password(ChangePasswordDto {
            id: member.id,
            current_password: "anything".to_string(),
            new_password: "N3wPassw0rd!".to_string(),
            confirmation: "N3wPassw0rd!".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(stored_password(&db, member.id), "N3wPassw0rd!");

        let error = db
            .change_password(ChangePasswordDto {
                id: Uuid::now_v7(),
                current_password: "anything".to_string(),
                new_password: "N3wPassw0rd!".to_string(),
                confirmation: "N3wPassw0rd!".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound(Resource::Member));
    }

    #[tokio::test]
    async fn update_profile_changes_name_and_phone_only() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();
        let updated = db
            .update_profile(UpdateProfileDto {
                id: member.id,
                name: "Kim Cheolsu".to_string(),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Kim Cheolsu");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.email, member.email);
        assert_eq!(updated.status, member.status);
        assert_eq!(stored_password(&db, member.id), "Passw0rd!");
    }

    #[tokio::test]
    async fn withdraw_keeps_the_record() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();
        db.withdraw_member(MemberIdDto { id: member.id }).await.unwrap();

        let found = db.get_member(GetMemberDto { id: member.id }).await.unwrap();
        assert_eq!(found.status, MemberStatus::Deleted);
        assert_eq!(found.email, "hong@example.com");
    }

    #[tokio::test]
    async fn status_operations_are_unconditional() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();
        let id = MemberIdDto { id: member.id };

        db.withdraw_member(MemberIdDto { id: member.id }).await.unwrap();
        let activated = db.activate_member(id).await.unwrap();
        assert_eq!(activated.status, MemberStatus::Active);
        let deactivated = db
            .deactivate_member(MemberIdDto { id: member.id })
            .await
            .unwrap();
        assert_eq!(deactivated.status, MemberStatus::Inactive);

        let error = db
            .activate_member(MemberIdDto { id: Uuid::now_v7() })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound(Resource::Member));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let db = MockDatabase::default();
        let member = db.register_member(register_dto("hong@example.com")).await.unwrap();
        db.delete_member(MemberIdDto { id: member.id }).await.unwrap();

        let error = db
            .get_member(GetMemberDto { id: member.id })
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound(Resource::Member));
        assert!(db.snapshot().members.is_empty());
    }

    #[tokio::test]
    async fn counts_by_status() {
        let db = MockDatabase::default();
        for n in 0..3 {
            db.register_member(register_dto(&format!("user{n}@example.com")))
                .await
                .unwrap();
        }
        let withdrawn = db.register_member(register_dto("gone@example.com")).await.unwrap();
        db.withdraw_member(MemberIdDto { id: withdrawn.id }).await.unwrap();

        assert_eq!(db.count_active_members().await.unwrap(), 3);
        let counts = db.count_members_by_status().await.unwrap();
        let deleted = counts
            .iter()
            .find(|count| count.status == MemberStatus::Deleted)
            .unwrap();
        assert_eq!(deleted.count, 1);
    }

    #[tokio::test]
    async fn listings_filter_by_name_and_join_date() {
        let db = MockDatabase::default();
        let hong = db.register_member(register_dto("hong@example.com")).await.unwrap();
        let mut other = register_dto("kim@example.com");
        other.name = "Kim Cheolsu".to_string();
        db.register_member(other).await.unwrap();

        let page = db
            .list_members(ListMembersDto {
                filter: MemberFilter::NameContains("Hong".to_string()),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(page.total(), 1);
        assert_eq!(page.items()[0].id, hong.id);

        let page = db
            .list_members(ListMembersDto {
                filter: MemberFilter::CreatedBetween {
                    from: hong.created_at,
                    to: hong.created_at + Duration::hours(1),
                },
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(page.total(), 2);

        let page = db
            .list_members(ListMembersDto {
                filter: MemberFilter::CreatedBetween {
                    from: hong.created_at - Duration::hours(2),
                    to: hong.created_at - Duration::hours(1),
                },
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(page.total(), 0);
    }
}
