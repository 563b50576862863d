//! Caller roles. Ordered guest < user < university < admin.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Guest,
    User,
    University,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::University => "university",
            Role::Admin => "admin",
        }
    }

    pub fn at_least(self, minimum: Role) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "university" => Ok(Role::University),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 4] = [Role::Guest, Role::User, Role::University, Role::Admin];

    #[test]
    fn order_is_total_and_reflexive() {
        for (i, a) in ALL.iter().enumerate() {
            assert!(a.at_least(*a));
            for b in &ALL[i + 1..] {
                assert!(b.at_least(*a));
                assert!(!a.at_least(*b));
            }
        }
    }

    #[test]
    fn order_is_transitive() {
        for a in ALL {
            for b in ALL {
                for c in ALL {
                    if a.at_least(b) && b.at_least(c) {
                        assert!(a.at_least(c));
                    }
                }
            }
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" university ".parse::<Role>(), Ok(Role::University));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Guest);
    }
}
