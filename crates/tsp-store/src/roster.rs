use super::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tsp_core::TurfId;
use tsp_core::UserId;
use tsp_ledger::Organiser;
use tsp_ledger::Turf;

/// In-memory [`Directory`], for running without the booking database.
///
/// Loaded from a JSON file shaped like
///
/// ```json
/// {
///   "organisers": [{ "id": 1, "name": "Rahul", "handle": "rahul" }],
///   "turfs": [{ "id": 3, "name": "Green Arena", "location": "Pune", "owner_upi": "arena@upi" }]
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct Roster {
    organisers: HashMap<UserId, Organiser>,
    turfs: HashMap<TurfId, Turf>,
}

#[derive(Deserialize)]
struct File {
    #[serde(default)]
    organisers: Vec<OrganiserRow>,
    #[serde(default)]
    turfs: Vec<TurfRow>,
}

#[derive(Deserialize)]
struct OrganiserRow {
    id: UserId,
    name: String,
    handle: Option<String>,
}

#[derive(Deserialize)]
struct TurfRow {
    id: TurfId,
    name: String,
    #[serde(default)]
    location: String,
    owner_upi: Option<String>,
}

impl Roster {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read directory {}: {}", path.display(), e))?;
        let roster = Self::parse(&text)?;
        log::info!(
            "loaded directory {} ({} organisers, {} turfs)",
            path.display(),
            roster.organisers.len(),
            roster.turfs.len()
        );
        Ok(roster)
    }
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let file = serde_json::from_str::<File>(json)?;
        let roster = file
            .organisers
            .into_iter()
            .map(|o| {
                let handle = o.handle.unwrap_or_else(|| o.name.clone());
                Organiser::new(o.id, o.name, handle)
            })
            .fold(Self::default(), Self::with_organiser);
        let roster = file
            .turfs
            .into_iter()
            .map(|t| Turf::new(t.id, t.name, t.location, t.owner_upi))
            .fold(roster, Self::with_turf);
        Ok(roster)
    }
    pub fn with_organiser(mut self, organiser: Organiser) -> Self {
        self.organisers.insert(organiser.id(), organiser);
        self
    }
    pub fn with_turf(mut self, turf: Turf) -> Self {
        self.turfs.insert(turf.id(), turf);
        self
    }
}

#[async_trait::async_trait]
impl Directory for Roster {
    async fn organiser(&self, user: UserId) -> Result<Organiser, StoreError> {
        Ok(self
            .organisers
            .get(&user)
            .cloned()
            .unwrap_or_else(|| Organiser::anonymous(user)))
    }
    async fn turf(&self, turf: TurfId) -> Result<Turf, StoreError> {
        Ok(self
            .turfs
            .get(&turf)
            .cloned()
            .unwrap_or_else(|| Turf::unlisted(turf)))
    }
}
