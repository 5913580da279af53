//! Shadbala extraction from the full component breakdown.
//!
//! The compute service reports Shadbala as
//! `shadbala.components.normalized[planet][pillar]` with optional totals
//! (`shadbala.totals.{normalized,rupa,virupa,tier}`) and per-planet classical
//! figures under `shadbala.components.virupa_rupa[planet]`. This module turns
//! that into typed planets plus a ranking for the strength views.

use crate::coerce::{field, is_truthy, num, opt_text, path};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The nine grahas, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanetId {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl PlanetId {
    pub const ALL: [PlanetId; 9] = [
        PlanetId::Sun,
        PlanetId::Moon,
        PlanetId::Mars,
        PlanetId::Mercury,
        PlanetId::Jupiter,
        PlanetId::Venus,
        PlanetId::Saturn,
        PlanetId::Rahu,
        PlanetId::Ketu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanetId::Sun => "Sun",
            PlanetId::Moon => "Moon",
            PlanetId::Mars => "Mars",
            PlanetId::Mercury => "Mercury",
            PlanetId::Jupiter => "Jupiter",
            PlanetId::Venus => "Venus",
            PlanetId::Saturn => "Saturn",
            PlanetId::Rahu => "Rahu",
            PlanetId::Ketu => "Ketu",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }

    /// Life themes the planet signifies.
    pub fn themes(&self) -> [&'static str; 4] {
        match self {
            PlanetId::Sun => ["leadership", "vitality", "ego", "authority"],
            PlanetId::Moon => ["mood", "care", "rhythm", "memory"],
            PlanetId::Mars => ["courage", "drive", "initiative", "defense"],
            PlanetId::Mercury => ["logic", "communication", "trade", "analysis"],
            PlanetId::Jupiter => ["wisdom", "growth", "ethics", "teaching"],
            PlanetId::Venus => ["love", "aesthetics", "comfort", "social"],
            PlanetId::Saturn => ["discipline", "time", "structure", "duty"],
            PlanetId::Rahu => ["innovation", "edge", "unconventional", "hype"],
            PlanetId::Ketu => ["detachment", "intuition", "mysticism", "release"],
        }
    }
}

impl std::fmt::Display for PlanetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six Shadbala components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarKey {
    Sthana,
    Dig,
    Kala,
    Cheshta,
    Naisargika,
    Drik,
}

impl PillarKey {
    pub const ALL: [PillarKey; 6] = [
        PillarKey::Sthana,
        PillarKey::Dig,
        PillarKey::Kala,
        PillarKey::Cheshta,
        PillarKey::Naisargika,
        PillarKey::Drik,
    ];

    /// Payload key
    pub fn as_str(&self) -> &'static str {
        match self {
            PillarKey::Sthana => "sthana",
            PillarKey::Dig => "dig",
            PillarKey::Kala => "kala",
            PillarKey::Cheshta => "cheshta",
            PillarKey::Naisargika => "naisargika",
            PillarKey::Drik => "drik",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }

    /// Plain-language label
    pub fn plain_label(&self) -> &'static str {
        match self {
            PillarKey::Sthana => "Positional",
            PillarKey::Dig => "Direction",
            PillarKey::Kala => "Time",
            PillarKey::Cheshta => "Motion",
            PillarKey::Naisargika => "Innate",
            PillarKey::Drik => "Aspects",
        }
    }

    /// Classical Sanskrit label
    pub fn classical_label(&self) -> &'static str {
        match self {
            PillarKey::Sthana => "Sthāna Bala",
            PillarKey::Dig => "Dik Bala",
            PillarKey::Kala => "Kāla Bala",
            PillarKey::Cheshta => "Cheṣṭā Bala",
            PillarKey::Naisargika => "Naiṣargika Bala",
            PillarKey::Drik => "Dṛk Bala",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            PillarKey::Sthana => "Sign/house placement, uccha/neecha mix",
            PillarKey::Dig => "Angular strength by natural direction",
            PillarKey::Kala => "Diurnal/nocturnal, tithi, hora, etc.",
            PillarKey::Cheshta => "Speed/phase like retro/fast/slow",
            PillarKey::Naisargika => "Inherent (planet-specific) baseline",
            PillarKey::Drik => "Aspectual support vs affliction",
        }
    }

    /// Label for the active naming mode.
    pub fn label(&self, classical: bool) -> &'static str {
        if classical {
            self.classical_label()
        } else {
            self.plain_label()
        }
    }
}

pub type PillarMap = BTreeMap<PillarKey, f64>;

/// Classical rupa/virupa figures for one planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalStrength {
    pub virupa: i64,
    pub rupa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    pub virupa_components: PillarMap,
    pub rupa_components: PillarMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPlanet {
    pub id: PlanetId,
    /// Normalized total, 0..1
    pub total: f64,
    pub pillars: PillarMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classical: Option<ClassicalStrength>,
}

impl ExtractedPlanet {
    fn rupa(&self) -> f64 {
        self.classical.as_ref().map(|c| c.rupa).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedShadbala {
    /// Planets present in the payload, in graha order
    pub planets: Vec<ExtractedPlanet>,
    /// Sorted by normalized total desc, ties by rupa desc
    pub ranking: Vec<PlanetId>,
}

impl ExtractedShadbala {
    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn get(&self, id: PlanetId) -> Option<&ExtractedPlanet> {
        self.planets.iter().find(|p| p.id == id)
    }

    /// Planets in the boss bucket, in graha order.
    pub fn bosses(&self) -> Vec<PlanetId> {
        self.planets
            .iter()
            .filter(|p| crate::scales::is_boss(p.total))
            .map(|p| p.id)
            .collect()
    }

    /// Planets in the support bucket, in graha order.
    pub fn weak(&self) -> Vec<PlanetId> {
        self.planets
            .iter()
            .filter(|p| crate::scales::is_weak(p.total))
            .map(|p| p.id)
            .collect()
    }

    /// One-line summary for sharing.
    pub fn share_text(&self) -> String {
        fn join(ids: &[PlanetId]) -> String {
            if ids.is_empty() {
                "—".to_string()
            } else {
                ids.iter().map(PlanetId::as_str).collect::<Vec<_>>().join(", ")
            }
        }
        format!(
            "My Shadbala → Boss: {} | Weak: {}",
            join(&self.bosses()),
            join(&self.weak())
        )
    }
}

/// Known pillars with numeric values, ignoring anything else.
fn pillar_map(node: Option<&Value>) -> PillarMap {
    node.and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| Some((PillarKey::from_key(k)?, v.as_f64()?)))
                .collect()
        })
        .unwrap_or_default()
}

fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}

fn classical(sb: &Value, id: &str) -> Option<ClassicalStrength> {
    let vr = path(sb, &[&format!("components.virupa_rupa.{}", id)]);
    let vr_totals = vr.and_then(|v| field(Some(v), &["totals"]));
    let vr_rupa = field(vr_totals, &["rupa"]);
    let vr_virupa = field(vr_totals, &["virupa"]);
    let g_rupa = path(sb, &[&format!("totals.rupa.{}", id)]).filter(|v| !v.is_null());
    let g_virupa = path(sb, &[&format!("totals.virupa.{}", id)]).filter(|v| !v.is_null());

    if vr_rupa.is_none() && vr_virupa.is_none() && g_rupa.is_none() && g_virupa.is_none() {
        return None;
    }

    let components = vr.and_then(|v| field(Some(v), &["components"]));
    Some(ClassicalStrength {
        virupa: num(vr_virupa.or(g_virupa)).round() as i64,
        rupa: round_to(num(vr_rupa.or(g_rupa)), 6),
        tier: opt_text(path(sb, &[&format!("totals.tier.{}", id)])),
        virupa_components: pillar_map(field(components, &["virupa"])),
        rupa_components: pillar_map(field(components, &["rupa"])),
    })
}

/// Extract typed Shadbala from a raw compute response.
///
/// Only planets with an entry under `components.normalized` are kept. The
/// total prefers the server's normalized total and otherwise averages the
/// pillars that are present.
pub fn extract_shadbala(raw: &Value) -> ExtractedShadbala {
    let sb = match field(Some(raw), &["shadbala"]) {
        Some(sb) if sb.is_object() => sb,
        _ => return ExtractedShadbala::default(),
    };

    let planets: Vec<ExtractedPlanet> = PlanetId::ALL
        .into_iter()
        .filter_map(|id| {
            let name = id.as_str();
            let node = path(sb, &[&format!("components.normalized.{}", name)]).filter(|v| is_truthy(v))?;
            let pillars = pillar_map(Some(node));

            let total = match path(sb, &[&format!("totals.normalized.{}", name)]).and_then(Value::as_f64) {
                Some(t) => t,
                None if pillars.is_empty() => 0.0,
                None => pillars.values().sum::<f64>() / pillars.len() as f64,
            };

            Some(ExtractedPlanet {
                id,
                total,
                pillars,
                classical: classical(sb, name),
            })
        })
        .collect();

    let mut order: Vec<&ExtractedPlanet> = planets.iter().collect();
    order.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| b.rupa().total_cmp(&a.rupa()))
    });
    let ranking = order.into_iter().map(|p| p.id).collect();

    ExtractedShadbala { planets, ranking }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({"shadbala": {
            "components": {
                "normalized": {
                    "Moon": {"sthana": 0.4, "dig": 0.6, "mystery": 9},
                    "Sun": {"sthana": 0.9, "kala": 0.7},
                    "Mars": {"dig": 0.5}
                },
                "virupa_rupa": {
                    "Sun": {"totals": {"rupa": 6.1234567, "virupa": 367.4}, "components": {"rupa": {"sthana": 2.1}}}
                }
            },
            "totals": {
                "normalized": {"Sun": 0.5, "Mars": 0.5},
                "rupa": {"Mars": 7.0},
                "tier": {"Sun": "strong"}
            }
        }})
    }

    #[test]
    fn test_planets_in_graha_order() {
        let s = extract_shadbala(&sample());
        let ids: Vec<PlanetId> = s.planets.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PlanetId::Sun, PlanetId::Moon, PlanetId::Mars]);
    }

    #[test]
    fn test_total_falls_back_to_pillar_mean() {
        let s = extract_shadbala(&sample());
        let moon = s.get(PlanetId::Moon).unwrap();
        assert!((moon.total - 0.5).abs() < 1e-9);
        assert_eq!(moon.pillars.len(), 2);
        assert!(moon.classical.is_none());
    }

    #[test]
    fn test_classical_figures() {
        let s = extract_shadbala(&sample());
        let sun = s.get(PlanetId::Sun).unwrap().classical.as_ref().unwrap();
        assert_eq!(sun.virupa, 367);
        assert_eq!(sun.rupa, 6.123457);
        assert_eq!(sun.tier.as_deref(), Some("strong"));
        assert_eq!(sun.rupa_components.get(&PillarKey::Sthana), Some(&2.1));

        let mars = s.get(PlanetId::Mars).unwrap().classical.as_ref().unwrap();
        assert_eq!(mars.rupa, 7.0);
        assert_eq!(mars.virupa, 0);
    }

    #[test]
    fn test_ranking_ties_break_on_rupa() {
        // All three total 0.5; Mars rupa 7.0 > Sun 6.12 > Moon 0.
        let s = extract_shadbala(&sample());
        assert_eq!(s.ranking, vec![PlanetId::Mars, PlanetId::Sun, PlanetId::Moon]);
    }

    #[test]
    fn test_missing_or_flat_shadbala() {
        assert!(extract_shadbala(&json!({})).is_empty());
        assert!(extract_shadbala(&json!({"shadbala": {"Sun": 0.8}})).is_empty());
        assert!(extract_shadbala(&json!({"shadbala": [1, 2]})).is_empty());
    }

    #[test]
    fn test_share_text() {
        let raw = json!({"shadbala": {"components": {"normalized": {
            "Sun": {"sthana": 0.9}, "Venus": {"dig": 0.2}, "Moon": {"kala": 0.6}
        }}}});
        let s = extract_shadbala(&raw);
        assert_eq!(s.share_text(), "My Shadbala → Boss: Sun | Weak: Venus");
        assert_eq!(ExtractedShadbala::default().share_text(), "My Shadbala → Boss: — | Weak: —");
    }

    #[test]
    fn test_pillar_labels() {
        assert_eq!(PillarKey::Dig.label(false), "Direction");
        assert_eq!(PillarKey::Dig.label(true), "Dik Bala");
        assert_eq!(PlanetId::from_name(" venus "), Some(PlanetId::Venus));
        assert_eq!(PlanetId::from_name("Pluto"), None);
    }
}
