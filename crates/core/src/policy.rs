//! Failure policies attached to external dependencies.

use serde::{Deserialize, Serialize};

/// What a pipeline stage does when its external dependency fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and continue with an empty result (fail-open).
    Degrade,

    /// Return the failure to the caller (fail-closed).
    Propagate,
}

impl FailurePolicy {
    /// Parse a policy name as used in config files and environment variables.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrade" | "open" => Some(Self::Degrade),
            "propagate" | "closed" => Some(Self::Propagate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degrade => "degrade",
            Self::Propagate => "propagate",
        }
    }

    pub fn degrades(&self) -> bool {
        matches!(self, Self::Degrade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(FailurePolicy::parse("degrade"), Some(FailurePolicy::Degrade));
        assert_eq!(FailurePolicy::parse("Open"), Some(FailurePolicy::Degrade));
        assert_eq!(
            FailurePolicy::parse("propagate"),
            Some(FailurePolicy::Propagate)
        );
        assert_eq!(FailurePolicy::parse("closed"), Some(FailurePolicy::Propagate));
        assert_eq!(FailurePolicy::parse("retry"), None);
    }

    #[test]
    fn test_policy_yaml_names() {
        let policy: FailurePolicy = serde_yaml::from_str("degrade").unwrap();
        assert_eq!(policy, FailurePolicy::Degrade);
        assert_eq!(serde_yaml::to_string(&FailurePolicy::Propagate).unwrap().trim(), "propagate");
        for policy in [FailurePolicy::Degrade, FailurePolicy::Propagate] {
            assert_eq!(FailurePolicy::parse(policy.as_str()), Some(policy));
        }
    }
}
