use super::*;

/// What to do when a payer name is already in the ledger.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Duplicates {
    /// Append another record; confirmations are not idempotent.
    #[default]
    Allow,
    /// Refuse with [`Rejection::Duplicate`]. Names compare case-insensitively.
    Reject,
}

impl std::str::FromStr for Duplicates {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duplicates policy: {}", other)),
        }
    }
}

impl std::fmt::Display for Duplicates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Admission policy applied to every payment.
///
/// Over-subscription is not configurable: settled games always refuse
/// further payments and the last share is capped at the balance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    duplicates: Duplicates,
}

impl Policy {
    pub fn new(duplicates: Duplicates) -> Self {
        Self { duplicates }
    }
    pub fn duplicates(&self) -> Duplicates {
        self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_policy_names() {
        assert_eq!("allow".parse::<Duplicates>(), Ok(Duplicates::Allow));
        assert_eq!(" Reject ".parse::<Duplicates>(), Ok(Duplicates::Reject));
        assert!("sometimes".parse::<Duplicates>().is_err());
    }
}
