//! Normalized compute response.
//!
//! Every section is optional. A section that would be empty is `None`,
//! so views decide whether to render it with a presence check.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Headline signs for the chart owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rising: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nakshatra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayanamsha: Option<String>,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        self.sun.is_none()
            && self.moon.is_none()
            && self.rising.is_none()
            && self.nakshatra.is_none()
            && self.ayanamsha.is_none()
    }
}

/// A body's placement. `degree` is a longitude in [0, 360) by convention
/// and is not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub body: String,
    pub sign: String,
    pub degree: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<u32>,
    pub retro: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nakshatra: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    pub house: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lord: Option<String>,
    pub degree: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyStrength {
    pub body: String,
    pub score: f64,
}

/// One Shadbala pillar (or planet total) with its normalized value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarValue {
    pub pillar: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseStrength {
    pub house: u32,
    pub score: f64,
    pub benefics: f64,
    pub malefics: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ashtakavarga {
    pub headers: Vec<String>,
    pub rows: Vec<AshtakavargaRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AshtakavargaRow {
    pub name: String,
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashaSystem {
    pub system: String,
    pub items: Vec<DashaPeriod>,
}

/// Period boundaries are opaque date strings from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub name: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transit {
    pub date: String,
    pub hits: Vec<TransitHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitHit {
    pub body: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Yoga {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Remedy {
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoshaLevel {
    Low,
    #[default]
    Med,
    High,
}

impl DoshaLevel {
    /// Unknown spellings fall back to `Med`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "mild" => DoshaLevel::Low,
            "high" | "severe" => DoshaLevel::High,
            _ => DoshaLevel::Med,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dosha {
    pub title: String,
    pub level: DoshaLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Titled bullet list (recommendations, notes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub title: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Divisional {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Panchanga entry for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: String,
    pub tithi: String,
    pub nakshatra: String,
    pub yoga: String,
    pub karana: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rasi_houses: Option<Vec<ChartHouse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chalit_houses: Option<Vec<ChartHouse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vargas: Option<Vec<Varga>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartHouse {
    pub house: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    pub bodies: Vec<String>,
}

/// Divisional chart grid: bodies per house, with the ascendant's index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Varga {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc_idx: Option<u32>,
    pub houses: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classical_reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub categories: Vec<PredictionCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionCategory {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PredictionItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionItem {
    pub title: String,
    pub text: String,
    pub from: String,
    pub to: String,
    pub score: f64,
}

/// Generic table for the raw/table view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub head: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Astrocartography {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<Vec<AcgAdvice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<PlanetLines>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<AcgPlace>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcgAdvice {
    pub topic: String,
    pub items: Vec<String>,
}

/// Rising and setting polylines for one planet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetLines {
    pub planet: String,
    #[serde(rename = "ASC")]
    pub asc: Vec<GeoPoint>,
    #[serde(rename = "DSC")]
    pub dsc: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcgPlace {
    pub city: String,
    pub country: String,
    pub score: f64,
    pub why: String,
}

/// The normalized compute response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Norm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<Position>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub houses: Option<Vec<HouseCusp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<BodyStrength>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadbala: Option<Vec<PillarValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bhava_bala: Option<Vec<HouseStrength>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ashtakavarga: Option<Ashtakavarga>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<Aspect>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashas: Option<Vec<DashaSystem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transits: Option<Vec<Transit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yogas: Option<Vec<Yoga>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remedies: Option<Vec<Remedy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doshas: Option<Vec<Dosha>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Guidance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Guidance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divisional: Option<Vec<Divisional>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Vec<CalendarDay>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<Charts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Predictions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kundli_yogas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acg: Option<Astrocartography>,
    /// Top-level payload keys no section consumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
    /// Untouched input, kept for the raw/debug view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

/// Section names as serialized, in display order.
pub const SECTION_NAMES: [&str; 23] = [
    "identity",
    "positions",
    "houses",
    "strengths",
    "shadbala",
    "bhavaBala",
    "ashtakavarga",
    "aspects",
    "dashas",
    "transits",
    "yogas",
    "remedies",
    "doshas",
    "recommendations",
    "notes",
    "divisional",
    "calendar",
    "charts",
    "predictions",
    "kundliYogas",
    "tables",
    "acg",
    "extras",
];

impl Norm {
    /// Norm carrying only the raw payload.
    pub fn raw_only(raw: Value) -> Self {
        Self {
            raw: Some(raw),
            ..Default::default()
        }
    }

    /// Names of the populated sections, in display order.
    pub fn sections(&self) -> Vec<&'static str> {
        let present = [
            self.identity.is_some(),
            self.positions.is_some(),
            self.houses.is_some(),
            self.strengths.is_some(),
            self.shadbala.is_some(),
            self.bhava_bala.is_some(),
            self.ashtakavarga.is_some(),
            self.aspects.is_some(),
            self.dashas.is_some(),
            self.transits.is_some(),
            self.yogas.is_some(),
            self.remedies.is_some(),
            self.doshas.is_some(),
            self.recommendations.is_some(),
            self.notes.is_some(),
            self.divisional.is_some(),
            self.calendar.is_some(),
            self.charts.is_some(),
            self.predictions.is_some(),
            self.kundli_yogas.is_some(),
            self.tables.is_some(),
            self.acg.is_some(),
            self.extras.is_some(),
        ];
        SECTION_NAMES
            .into_iter()
            .zip(present)
            .filter(|(_, on)| *on)
            .map(|(name, _)| name)
            .collect()
    }

    /// True when nothing but `raw` is set.
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dosha_level_parse() {
        assert_eq!(DoshaLevel::parse("HIGH"), DoshaLevel::High);
        assert_eq!(DoshaLevel::parse("low"), DoshaLevel::Low);
        assert_eq!(DoshaLevel::parse("whatever"), DoshaLevel::Med);
    }

    #[test]
    fn test_raw_only_serializes_raw_null() {
        let norm = Norm::raw_only(Value::Null);
        assert!(norm.is_empty());
        let json = serde_json::to_string(&norm).unwrap();
        assert_eq!(json, r#"{"raw":null}"#);
    }

    #[test]
    fn test_sections_lists_present_fields() {
        let norm = Norm {
            shadbala: Some(vec![PillarValue {
                pillar: "Sun".to_string(),
                value: 0.8,
            }]),
            ..Default::default()
        };
        assert_eq!(norm.sections(), vec!["shadbala"]);
    }
}
