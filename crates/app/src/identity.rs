use std::env;
use std::fmt;

/// Signed-in user shown in the header. Display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub email: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let display_name = env::var("LEVELUP_USER_NAME").ok()?;
        if display_name.trim().is_empty() {
            return None;
        }
        let email = env::var("LEVELUP_USER_EMAIL")
            .ok()
            .filter(|email| !email.trim().is_empty());
        Some(Self {
            display_name,
            email,
        })
    }
}

/// Header line for an optional identity.
pub struct Greeting<'a>(pub Option<&'a Identity>);

impl fmt::Display for Greeting<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(Identity {
                display_name,
                email: Some(email),
            }) => write!(f, "{display_name} ({email})"),
            Some(identity) => f.write_str(&identity.display_name),
            None => f.write_str("Guest / Not signed in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_when_signed_out() {
        assert_eq!(Greeting(None).to_string(), "Guest / Not signed in");
    }

    #[test]
    fn shows_name_and_email() {
        let identity = Identity {
            display_name: "Ada".into(),
            email: Some("ada@example.com".into()),
        };
        assert_eq!(Greeting(Some(&identity)).to_string(), "Ada (ada@example.com)");
    }
}
