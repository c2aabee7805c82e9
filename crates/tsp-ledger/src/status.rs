/// Settlement status, always derived from the payment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No payments yet.
    Pending,
    /// Some payments, not yet settled.
    Partial,
    /// Declared players all paid, or the total is covered.
    Settled,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Partial => write!(f, "partial"),
            Self::Settled => write!(f, "settled"),
        }
    }
}
