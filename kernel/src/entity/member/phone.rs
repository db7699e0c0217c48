use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct MemberPhone(String);

impl MemberPhone {
    pub fn new(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }
}
