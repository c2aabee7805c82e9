use super::*;
use tsp_core::*;

/// Shareable game identifier.
///
/// Possession of the id is the only credential needed to view a game or
/// pay into it, so ids carry [`GAME_ID_ENTROPY`] random bytes behind a
/// readable `{handle}-{slot}` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(String);

impl GameId {
    const MAX_LEN: usize = 128;
    const HANDLE_LEN: usize = 24;

    /// Mints a fresh id for an organiser's slot.
    pub fn mint(organiser: &Organiser, slot: &Slot) -> Self {
        use rand::Rng;
        let ref mut bytes = [0u8; GAME_ID_ENTROPY];
        rand::rng().fill(bytes);
        let noise = bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        Self(format!(
            "{}-{}-{}",
            Self::handle(organiser.handle()),
            slot.label(),
            noise
        ))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// URL-safe, lowercased organiser handle.
    fn handle(raw: &str) -> String {
        let handle = raw
            .split('@')
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .take(Self::HANDLE_LEN)
            .collect::<String>()
            .to_ascii_lowercase();
        match handle.is_empty() {
            true => ANONYMOUS.to_string(),
            false => handle,
        }
    }
}

/// Accepts any URL-safe id, including ones minted before ids carried entropy.
impl TryFrom<&str> for GameId {
    type Error = Rejection;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        let ok = !s.is_empty()
            && s.len() <= Self::MAX_LEN
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        match ok {
            true => Ok(Self(s.to_string())),
            false => Err(Rejection::NotFound(s.to_string())),
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for GameId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn slot() -> Slot {
        Slot::try_from(("2026-10-18", "09:00")).unwrap()
    }
    #[test]
    fn minted_ids_carry_prefix_and_noise() {
        let organiser = Organiser::new(7, "Rahul".into(), "Rahul@mail.com".into());
        let id = GameId::mint(&organiser, &slot());
        let (prefix, noise) = id.as_str().rsplit_once('-').unwrap();
        assert_eq!(prefix, "rahul-09AM");
        assert_eq!(noise.len(), 2 * GAME_ID_ENTROPY);
        assert!(noise.chars().all(|c| c.is_ascii_hexdigit()));
    }
    #[test]
    fn minted_ids_differ() {
        let organiser = Organiser::anonymous(1);
        assert_ne!(
            GameId::mint(&organiser, &slot()),
            GameId::mint(&organiser, &slot())
        );
    }
    #[test]
    fn unsafe_handles_fall_back() {
        let organiser = Organiser::new(1, "x".into(), "@@//".into());
        assert!(GameId::mint(&organiser, &slot()).as_str().starts_with("player-09AM-"));
    }
    #[test]
    fn parses_legacy_ids() {
        assert_eq!(GameId::try_from("rahul-09AM").unwrap().as_str(), "rahul-09AM");
    }
    #[test]
    fn rejects_malformed_ids() {
        assert!(GameId::try_from("").is_err());
        assert!(GameId::try_from("a/b").is_err());
        assert!(GameId::try_from("x".repeat(129).as_str()).is_err());
    }
}
