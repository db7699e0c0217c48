use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructMember, Member, MemberFilter, MemberStatus};

/// Member as handed to callers. The credential is never part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub status: MemberStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Member> for MemberDto {
    fn from(value: Member) -> Self {
        let DestructMember {
            id,
            email,
            name,
            phone,
            status,
            created_at,
            updated_at,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            phone: phone.map(Into::into),
            status,
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

pub struct GetMemberDto {
    pub id: Uuid,
}

pub struct GetMemberByEmailDto {
    pub email: String,
}

#[derive(Debug)]
pub struct ListMembersDto {
    pub filter: MemberFilter,
    pub limit: i32,
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCountDto {
    pub status: MemberStatus,
    pub count: i64,
}

impl From<(MemberStatus, i64)> for StatusCountDto {
    fn from((status, count): (MemberStatus, i64)) -> Self {
        Self { status, count }
    }
}

#[derive(Debug)]
pub struct RegisterMemberDto {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub status: Option<MemberStatus>,
}

pub struct UpdateProfileDto {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct ChangePasswordDto {
    pub id: Uuid,
    pub current_password: String,
    pub new_password: String,
    pub confirmation: String,
}

/// Target of a status-only operation (withdraw, activate, deactivate, delete).
pub struct MemberIdDto {
    pub id: Uuid,
}
