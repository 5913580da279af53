//! Astrocartography city rows and the filters applied to them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Angle of a planetary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Angle {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "MC")]
    Mc,
    #[serde(rename = "DSC")]
    Dsc,
    #[serde(rename = "IC")]
    Ic,
}

impl Angle {
    pub const ALL: [Angle; 4] = [Angle::Asc, Angle::Mc, Angle::Dsc, Angle::Ic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Angle::Asc => "ASC",
            Angle::Mc => "MC",
            Angle::Dsc => "DSC",
            Angle::Ic => "IC",
        }
    }
}

impl FromStr for Angle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Angle::ALL
            .into_iter()
            .find(|a| a.as_str() == upper)
            .ok_or_else(|| format!("unknown angle '{}' (expected ASC, MC, DSC or IC)", s))
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One city near a planetary line, as served by the cities endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcgCityRow {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub planet: Option<String>,
    #[serde(default)]
    pub angle: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub advice: Option<String>,
}

/// Filter over city rows. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityFilter {
    /// Case-insensitive substring of the country
    pub country: Option<String>,
    /// Case-insensitive substring of the city name
    pub city: Option<String>,
    /// Planet name, case-insensitive equality
    pub planet: Option<String>,
    pub angle: Option<Angle>,
    /// Keep only rows with a line hit (a known distance)
    pub hit_only: bool,
    /// Keep only rows within this distance; rows without one are dropped
    pub max_distance_km: Option<f64>,
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
        _ => true,
    }
}

impl CityFilter {
    pub fn matches(&self, row: &AcgCityRow) -> bool {
        if !contains_ci(&row.country, &self.country) || !contains_ci(&row.name, &self.city) {
            return false;
        }

        if let Some(planet) = self.planet.as_deref().filter(|p| !p.is_empty()) {
            let row_planet = row.planet.as_deref().unwrap_or("");
            if !row_planet.eq_ignore_ascii_case(planet) {
                return false;
            }
        }

        if let Some(angle) = self.angle {
            let row_angle = row.angle.as_deref().unwrap_or("");
            if !row_angle.eq_ignore_ascii_case(angle.as_str()) {
                return false;
            }
        }

        if self.hit_only && row.distance_km.is_none() {
            return false;
        }

        if let Some(max) = self.max_distance_km {
            match row.distance_km {
                Some(d) if d <= max => {}
                _ => return false,
            }
        }

        true
    }

    /// Matching rows sorted by distance, rows without a distance last.
    pub fn apply<'a>(&self, rows: &'a [AcgCityRow]) -> Vec<&'a AcgCityRow> {
        let mut out: Vec<&AcgCityRow> = rows.iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| by_distance(a.distance_km, b.distance_km));
        out
    }
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct planets across rows, sorted by name.
pub fn planets(rows: &[AcgCityRow]) -> Vec<String> {
    let mut out: Vec<String> = rows
        .iter()
        .filter_map(|r| r.planet.clone())
        .filter(|p| !p.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, country: &str, planet: &str, angle: &str, d: Option<f64>) -> AcgCityRow {
        AcgCityRow {
            name: name.to_string(),
            country: country.to_string(),
            planet: Some(planet.to_string()),
            angle: Some(angle.to_string()),
            distance_km: d,
            ..Default::default()
        }
    }

    fn rows() -> Vec<AcgCityRow> {
        vec![
            row("Lisbon", "Portugal", "Venus", "MC", Some(120.0)),
            row("Porto", "Portugal", "Jupiter", "ASC", None),
            row("Madrid", "Spain", "venus", "mc", Some(40.5)),
            row("Paris", "France", "Saturn", "IC", Some(800.0)),
        ]
    }

    #[test]
    fn test_default_filter_sorts_by_distance_missing_last() {
        let rows = rows();
        let names: Vec<&str> = CityFilter::default()
            .apply(&rows)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Madrid", "Lisbon", "Paris", "Porto"]);
    }

    #[test]
    fn test_country_and_city_substrings() {
        let rows = rows();
        let f = CityFilter {
            country: Some("PORT".to_string()),
            city: Some("or".to_string()),
            ..Default::default()
        };
        let out = f.apply(&rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Porto");
    }

    #[test]
    fn test_planet_and_angle_ignore_case() {
        let rows = rows();
        let f = CityFilter {
            planet: Some("VENUS".to_string()),
            angle: Some(Angle::Mc),
            ..Default::default()
        };
        assert_eq!(f.apply(&rows).len(), 2);
    }

    #[test]
    fn test_distance_filters() {
        let rows = rows();
        let hits = CityFilter { hit_only: true, ..Default::default() };
        assert_eq!(hits.apply(&rows).len(), 3);

        let near = CityFilter { max_distance_km: Some(120.0), ..Default::default() };
        let names: Vec<&str> = near.apply(&rows).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Madrid", "Lisbon"]);
    }

    #[test]
    fn test_planets_distinct_sorted() {
        let p = planets(&rows());
        assert_eq!(p, vec!["Jupiter", "Saturn", "Venus", "venus"]);
    }

    #[test]
    fn test_angle_parse() {
        assert_eq!("dsc".parse::<Angle>(), Ok(Angle::Dsc));
        assert!("north".parse::<Angle>().is_err());
    }

    #[test]
    fn test_row_deserializes_with_defaults() {
        let r: AcgCityRow = serde_json::from_str(r#"{"name": "Goa", "lat": 15.5}"#).unwrap();
        assert_eq!(r.name, "Goa");
        assert!(r.distance_km.is_none());
        assert_eq!(r.lon, 0.0);
    }
}
