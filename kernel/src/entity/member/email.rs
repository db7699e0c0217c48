use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln)]
pub struct MemberEmail(String);

impl MemberEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}
