use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{
    ChangePasswordDto, GetMemberByEmailDto, GetMemberDto, ListMembersDto, MemberIdDto,
    RegisterMemberDto, UpdateProfileDto,
};
use kernel::prelude::entity::{MemberFilter, MemberStatus};

use crate::controller::{Intake, TryIntake};
use crate::request::{PageQuery, ValidationErrors};

#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    phone: Option<String>,
    status: Option<MemberStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: Option<String>,
    new_password: Option<String>,
    password_confirm: Option<String>,
}

#[derive(Debug)]
pub struct GetMemberRequest {
    id: Uuid,
}

impl GetMemberRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetMemberByEmailRequest {
    email: String,
}

impl GetMemberByEmailRequest {
    pub fn new(email: String) -> Self {
        Self { email }
    }
}

/// Targets a member for withdraw, activate, deactivate and delete.
#[derive(Debug)]
pub struct MemberIdRequest {
    id: Uuid,
}

impl MemberIdRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    name: String,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl NameQuery {
    pub fn into_parts(self) -> (String, PageQuery) {
        (self.name, PageQuery::new(self.limit, self.offset))
    }
}

#[derive(Debug, Deserialize)]
pub struct JoinedQuery {
    #[serde(with = "time::serde::rfc3339")]
    from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    to: OffsetDateTime,
    limit: Option<i32>,
    offset: Option<i32>,
}

pub struct MemberTransformer;

impl TryIntake<RegisterMemberRequest> for MemberTransformer {
    type To = RegisterMemberDto;
    type Error = ValidationErrors;
    fn emit(&self, input: RegisterMemberRequest) -> Result<Self::To, Self::Error> {
        let mut errors = ValidationErrors::new();
        errors.email(&input.email);
        errors.password("password", "Password", &input.password);
        errors.name(&input.name);
        errors.phone(&input.phone);
        errors.finish(RegisterMemberDto {
            email: input.email.unwrap_or_default(),
            password: input.password.unwrap_or_default(),
            name: input.name.unwrap_or_default(),
            phone: input.phone,
            status: input.status,
        })
    }
}

impl TryIntake<(Uuid, UpdateProfileRequest)> for MemberTransformer {
    type To = UpdateProfileDto;
    type Error = ValidationErrors;
    fn emit(&self, input: (Uuid, UpdateProfileRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let mut errors = ValidationErrors::new();
        errors.name(&input.name);
        errors.phone(&input.phone);
        errors.finish(UpdateProfileDto {
            id,
            name: input.name.unwrap_or_default(),
            phone: input.phone,
        })
    }
}

impl TryIntake<(Uuid, ChangePasswordRequest)> for MemberTransformer {
    type To = ChangePasswordDto;
    type Error = ValidationErrors;
    fn emit(&self, input: (Uuid, ChangePasswordRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let mut errors = ValidationErrors::new();
        errors.required("currentPassword", "Current password", &input.current_password);
        errors.password("newPassword", "New password", &input.new_password);
        errors.required("passwordConfirm", "Password confirmation", &input.password_confirm);
        errors.finish(ChangePasswordDto {
            id,
            current_password: input.current_password.unwrap_or_default(),
            new_password: input.new_password.unwrap_or_default(),
            confirmation: input.password_confirm.unwrap_or_default(),
        })
    }
}

impl TryIntake<(MemberFilter, PageQuery)> for MemberTransformer {
    type To = ListMembersDto;
    type Error = ValidationErrors;
    fn emit(&self, input: (MemberFilter, PageQuery)) -> Result<Self::To, Self::Error> {
        let (filter, page) = input;
        let mut errors = ValidationErrors::new();
        let (limit, offset) = page.resolve(&mut errors);
        errors.finish(ListMembersDto {
            filter,
            limit,
            offset,
        })
    }
}

impl TryIntake<JoinedQuery> for MemberTransformer {
    type To = ListMembersDto;
    type Error = ValidationErrors;
    fn emit(&self, input: JoinedQuery) -> Result<Self::To, Self::Error> {
        let mut errors = ValidationErrors::new();
        if input.from > input.to {
            errors.add("from", "from must not be after to");
        }
        let (limit, offset) = PageQuery::new(input.limit, input.offset).resolve(&mut errors);
        errors.finish(ListMembersDto {
            filter: MemberFilter::CreatedBetween {
                from: input.from,
                to: input.to,
            },
            limit,
            offset,
        })
    }
}

impl Intake<GetMemberRequest> for MemberTransformer {
    type To = GetMemberDto;
    fn emit(&self, input: GetMemberRequest) -> Self::To {
        GetMemberDto { id: input.id }
    }
}

impl Intake<GetMemberByEmailRequest> for MemberTransformer {
    type To = GetMemberByEmailDto;
    fn emit(&self, input: GetMemberByEmailRequest) -> Self::To {
        GetMemberByEmailDto { email: input.email }
    }
}

impl Intake<MemberIdRequest> for MemberTransformer {
    type To = MemberIdDto;
    fn emit(&self, input: MemberIdRequest) -> Self::To {
        MemberIdDto { id: input.id }
    }
}
