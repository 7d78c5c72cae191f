use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A named identification candidate attached to a row.
///
/// Two identities are considered the same compound when their names match
/// and, when both carry one, their compound ids match as well.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakIdentity {
    pub name: String,
    pub compound_id: Option<String>,
}

impl PeakIdentity {
    pub fn new(name: &str) -> Self {
        PeakIdentity {
            name: name.to_string(),
            compound_id: None,
        }
    }

    pub fn with_compound_id(name: &str, compound_id: &str) -> Self {
        PeakIdentity {
            name: name.to_string(),
            compound_id: Some(compound_id.to_string()),
        }
    }
}

impl PartialEq for PeakIdentity {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name {
            return false;
        }
        match (&self.compound_id, &other.compound_id) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl Display for PeakIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.compound_id {
            Some(id) => write!(f, "{} [{}]", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_name() {
        assert_eq!(PeakIdentity::new("glucose"), PeakIdentity::new("glucose"));
        assert_ne!(PeakIdentity::new("glucose"), PeakIdentity::new("fructose"));
    }

    #[test]
    fn test_equality_with_compound_ids() {
        let a = PeakIdentity::with_compound_id("glucose", "HMDB0000122");
        let b = PeakIdentity::with_compound_id("glucose", "HMDB0000122");
        let c = PeakIdentity::with_compound_id("glucose", "HMDB9999999");
        assert_eq!(a, b);
        assert_ne!(a, c);
        // A missing compound id on one side does not break the match
        assert_eq!(a, PeakIdentity::new("glucose"));
    }
}
