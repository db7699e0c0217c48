use time::OffsetDateTime;

use crate::entity::{Member, MemberStatus};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MemberFilter {
    All,
    NameContains(String),
    Status(MemberStatus),
    /// Registration instant within `from..=to`.
    CreatedBetween {
        from: OffsetDateTime,
        to: OffsetDateTime,
    },
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            MemberFilter::All => true,
            MemberFilter::NameContains(name) => member.name().as_ref().contains(name.as_str()),
            MemberFilter::Status(status) => member.status() == status,
            MemberFilter::CreatedBetween { from, to } => {
                let created: &OffsetDateTime = member.created_at().as_ref();
                from <= created && created <= to
            }
        }
    }
}
