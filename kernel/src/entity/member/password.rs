use std::fmt::{Debug, Formatter};

use vodca::{AsRefln, Fromln};

/// Stored credential. Never printed and never serialized.
#[derive(Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct MemberPassword(String);

impl MemberPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }
}

impl Debug for MemberPassword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("MemberPassword(<redacted>)")
    }
}

#[cfg(test)]
mod test {
    use super::MemberPassword;

    #[test]
    fn debug_output_hides_credential() {
        let password = MemberPassword::new("Secr3t!pass");
        assert!(!format!("{password:?}").contains("Secr3t"));
    }
}
