mod email;
mod filter;
mod id;
mod name;
mod password;
mod phone;
mod status;

pub use self::{email::*, filter::*, id::*, name::*, password::*, phone::*, status::*};
use crate::entity::{CreatedAt, UpdatedAt};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Member {
    id: MemberId,
    email: MemberEmail,
    password: MemberPassword,
    name: MemberName,
    phone: Option<MemberPhone>,
    status: MemberStatus,
    created_at: CreatedAt<Member>,
    updated_at: UpdatedAt<Member>,
}

impl Member {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: MemberId,
        email: MemberEmail,
        password: MemberPassword,
        name: MemberName,
        phone: Option<MemberPhone>,
        status: MemberStatus,
        created_at: CreatedAt<Member>,
        updated_at: UpdatedAt<Member>,
    ) -> Self {
        Self {
            id,
            email,
            password,
            name,
            phone,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn update_profile(&mut self, name: MemberName, phone: Option<MemberPhone>) {
        self.name = name;
        self.phone = phone;
        self.touch();
    }

    pub fn change_password(&mut self, password: MemberPassword) {
        self.password = password;
        self.touch();
    }

    /// Soft delete. The record stays and is only flagged.
    pub fn withdraw(&mut self) {
        self.set_status(MemberStatus::Deleted);
    }

    pub fn activate(&mut self) {
        self.set_status(MemberStatus::Active);
    }

    pub fn deactivate(&mut self) {
        self.set_status(MemberStatus::Inactive);
    }

    fn set_status(&mut self, status: MemberStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = UpdatedAt::now();
    }
}
