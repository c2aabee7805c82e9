use super::*;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Timelike;
use tsp_core::*;

/// The user who booked the slot, as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organiser {
    id: UserId,
    name: String,
    handle: String,
}

impl Organiser {
    pub fn new(id: UserId, name: String, handle: String) -> Self {
        Self { id, name, handle }
    }
    /// Placeholder for users the directory does not know.
    pub fn anonymous(id: UserId) -> Self {
        Self::new(id, ANONYMOUS.to_string(), ANONYMOUS.to_string())
    }
    pub fn id(&self) -> UserId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Login handle; the part before `@` of an email login.
    pub fn handle(&self) -> &str {
        &self.handle
    }
}

/// The venue being booked, snapshotted when the game is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turf {
    id: TurfId,
    name: String,
    location: String,
    owner_upi: Option<String>,
}

impl Turf {
    pub fn new(id: TurfId, name: String, location: String, owner_upi: Option<String>) -> Self {
        Self {
            id,
            name,
            location,
            owner_upi: owner_upi.filter(|u| !u.trim().is_empty()),
        }
    }
    /// Placeholder for turfs the directory does not know.
    pub fn unlisted(id: TurfId) -> Self {
        Self::new(id, String::new(), String::new(), None)
    }
    pub fn id(&self) -> TurfId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn owner_upi(&self) -> Option<&str> {
        self.owner_upi.as_deref()
    }
}

/// Date and start time of a one-hour booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    date: NaiveDate,
    time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }
    pub fn date(&self) -> NaiveDate {
        self.date
    }
    pub fn time(&self) -> NaiveTime {
        self.time
    }
    /// Hour label used in game ids, e.g. `09AM` or `18PM`.
    pub fn label(&self) -> String {
        let hour = self.time.hour();
        format!("{:02}{}", hour, if hour < 12 { "AM" } else { "PM" })
    }
    /// `HH:MM`, as the client displays it.
    pub fn clock(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Parses `YYYY-MM-DD` and `HH:MM` (or `HH:MM:SS`).
impl TryFrom<(&str, &str)> for Slot {
    type Error = Rejection;
    fn try_from((date, time): (&str, &str)) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| Rejection::Invalid(format!("invalid date: {}", date)))?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
            .map_err(|_| Rejection::Invalid(format!("invalid start time: {}", time)))?;
        Ok(Self::new(date, time))
    }
}

/// How the organiser pays at booking time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Organiser pays the advance, friends pay shares.
    Split,
    /// Organiser pays everything up front.
    #[default]
    Online,
    /// Paid at the venue; nothing is recorded up front.
    Offline,
}

impl Kind {
    /// Organiser's contribution recorded when the game is created.
    pub fn advance(&self, total: Amount) -> Amount {
        match self {
            Self::Split => total.percent(ADVANCE_PERCENT),
            Self::Online => total,
            Self::Offline => Amount::ZERO,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Split => write!(f, "split"),
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl TryFrom<&str> for Kind {
    type Error = Rejection;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "split" => Ok(Self::Split),
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(Rejection::Invalid(format!("invalid booking type: {}", s))),
        }
    }
}

/// Everything about the underlying slot booking that a game settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    organiser: Organiser,
    turf: Turf,
    slot: Slot,
    kind: Kind,
}

impl Booking {
    pub fn new(organiser: Organiser, turf: Turf, slot: Slot, kind: Kind) -> Self {
        Self {
            organiser,
            turf,
            slot,
            kind,
        }
    }
    pub fn organiser(&self) -> &Organiser {
        &self.organiser
    }
    pub fn turf(&self) -> &Turf {
        &self.turf
    }
    pub fn slot(&self) -> &Slot {
        &self.slot
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn slot_parses_short_and_long_times() {
        let a = Slot::try_from(("2026-10-18", "09:00")).unwrap();
        let b = Slot::try_from(("2026-10-18", "09:00:00")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.clock(), "09:00");
    }
    #[test]
    fn slot_rejects_garbage() {
        assert!(Slot::try_from(("18/10/2026", "09:00")).is_err());
        assert!(Slot::try_from(("2026-10-18", "9am")).is_err());
    }
    #[test]
    fn slot_label_marks_meridiem() {
        assert_eq!(Slot::try_from(("2026-10-18", "09:00")).unwrap().label(), "09AM");
        assert_eq!(Slot::try_from(("2026-10-18", "18:00")).unwrap().label(), "18PM");
    }
    #[test]
    fn advance_follows_kind() {
        let total = Amount::rupees(1200);
        assert_eq!(Kind::Split.advance(total), Amount::rupees(240));
        assert_eq!(Kind::Online.advance(total), total);
        assert_eq!(Kind::Offline.advance(total), Amount::ZERO);
    }
    #[test]
    fn blank_owner_upi_is_absent() {
        let turf = Turf::new(1, "Arena".into(), "Pune".into(), Some("  ".into()));
        assert_eq!(turf.owner_upi(), None);
    }
}
