use super::*;
use tsp_core::*;

/// A friend's self-reported payment confirmation, validated.
///
/// Names are free text and references are never checked against a
/// payment rail; both only have to be present and fit their columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    name: String,
    upi_ref: String,
    user: Option<UserId>,
}

impl Payer {
    pub fn new(name: &str, upi_ref: &str, user: Option<UserId>) -> Result<Self, Rejection> {
        let name = name.trim();
        let upi_ref = upi_ref.trim();
        if name.is_empty() {
            return Err(Rejection::Invalid("Player name is required".into()));
        }
        if upi_ref.is_empty() {
            return Err(Rejection::Invalid(
                "UPI Transaction ID is required to confirm payment".into(),
            ));
        }
        if upi_ref.eq_ignore_ascii_case(ORGANISER_REF) {
            return Err(Rejection::Invalid(format!(
                "{} is reserved for the organiser's advance",
                ORGANISER_REF
            )));
        }
        if name.chars().count() > PLAYER_NAME_MAX {
            return Err(Rejection::Invalid(format!(
                "player name exceeds {} characters",
                PLAYER_NAME_MAX
            )));
        }
        if upi_ref.chars().count() > UPI_REF_MAX {
            return Err(Rejection::Invalid(format!(
                "UPI reference exceeds {} characters",
                UPI_REF_MAX
            )));
        }
        Ok(Self {
            name: name.to_string(),
            upi_ref: upi_ref.to_string(),
            user,
        })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn upi_ref(&self) -> &str {
        &self.upi_ref
    }
    pub fn user(&self) -> Option<UserId> {
        self.user
    }
}
