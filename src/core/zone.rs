use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Identifier of a map region (ISO 3166-1 alpha-3 in the default table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Bidding-zone aliases shipped with the dashboard.
///
/// The first block mirrors the zones the price endpoint queries; the rest are
/// spellings other upstream feeds use for the same regions.
pub const DEFAULT_ZONE_ALIASES: &[(&str, &str)] = &[
    ("CH", "CHE"),
    ("DE", "DEU"),
    ("FR", "FRA"),
    ("AT", "AUT"),
    ("IT", "ITA"),
    ("NL", "NLD"),
    ("BE", "BEL"),
    ("DK1", "DNK"),
    ("NO2", "NOR"),
    ("SE3", "SWE"),
    ("FI", "FIN"),
    ("PL", "POL"),
    ("ES", "ESP"),
    ("UK", "GBR"),
    ("GB", "GBR"),
    ("DE_LU", "DEU"),
    ("DE-LU", "DEU"),
    ("DK2", "DNK"),
    ("NO1", "NOR"),
    ("NO3", "NOR"),
    ("NO4", "NOR"),
    ("NO5", "NOR"),
    ("SE1", "SWE"),
    ("SE2", "SWE"),
    ("SE4", "SWE"),
];

/// Case-insensitive, many-to-one lookup from zone code to region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneResolver {
    aliases: IndexMap<String, RegionId>,
}

impl Default for ZoneResolver {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ZONE_ALIASES.iter().copied())
            .unwrap_or_else(|_| Self::empty())
    }
}

impl ZoneResolver {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    /// Builds a resolver from `(zone_code, region_id)` pairs.
    ///
    /// Codes are folded to upper case. Blank codes or region ids and a code
    /// listed twice with two different regions are rejected.
    pub fn from_pairs<I, Z, R>(pairs: I) -> DashResult<Self>
    where
        I: IntoIterator<Item = (Z, R)>,
        Z: AsRef<str>,
        R: AsRef<str>,
    {
        let mut aliases = IndexMap::new();
        for (zone, region) in pairs {
            let zone = normalize_code(zone.as_ref());
            let region = region.as_ref().trim();
            if zone.is_empty() || region.is_empty() {
                return Err(DashError::InvalidConfig(
                    "zone alias entries must have non-empty zone and region".to_owned(),
                ));
            }
            let region = RegionId::new(region);
            if let Some(existing) = aliases.get(&zone) {
                if existing != &region {
                    return Err(DashError::InvalidConfig(format!(
                        "zone `{zone}` aliased to both `{existing}` and `{region}`"
                    )));
                }
                continue;
            }
            aliases.insert(zone, region);
        }
        Ok(Self { aliases })
    }

    #[must_use]
    pub fn resolve(&self, zone_code: &str) -> Option<&RegionId> {
        self.aliases.get(&normalize_code(zone_code))
    }

    /// Distinct regions in first-seen order.
    #[must_use]
    pub fn regions(&self) -> Vec<&RegionId> {
        let mut regions: Vec<&RegionId> = Vec::new();
        for region in self.aliases.values() {
            if !regions.contains(&region) {
                regions.push(region);
            }
        }
        regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
