//! Response normalizer for compute API payloads.
//!
//! `normalize` takes any JSON value and returns a [`Norm`]. It never fails:
//! a section that is missing, renamed, or malformed comes out empty and is
//! then dropped to `None`.
//!
//! # Sections
//!
//! - `chart`: identity, positions, houses, chart grids
//! - `strength`: strengths, Shadbala, Bhava Bala, Ashtakavarga
//! - `timeline`: aspects, dashas, transits, panchanga calendar
//! - `reading`: yogas, remedies, doshas, guidance, predictions
//! - `tables`: generic tables, synthesized when none are supplied
//! - `astrocartography`: ACG lines, places and advice

mod astrocartography;
mod chart;
mod reading;
mod strength;
mod tables;
mod timeline;

use crate::coerce::is_truthy;
use crate::collection::non_empty;
use crate::norm::Norm;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level keys owned by a section. Anything else lands in `extras`, even
/// when a section also peeks into it (`meta.ayanamsha`, `identity.sun`).
pub const KNOWN_KEYS: &[&str] = &[
    "basics", "core", "positions", "planets", "placements", "houses", "bhava", "strengths",
    "planet_strengths", "shadbala", "shad_bala", "bhavaBala", "bhava_bala", "ashtakavarga",
    "ashta", "aspects", "dashas", "dasha", "transits", "yogas", "remedies", "upaya", "doshas",
    "recommendations", "tips", "notes", "insights", "divisional", "varga", "calendar",
    "panchanga", "charts", "asc", "tables", "tabular", "table", "kundli_predictions",
    "kundliPredictions", "predictions", "kundli", "acg", "ACG", "astro_cartography",
    "astroCartography",
];

/// Normalize a compute response.
///
/// Falsy input (`null`, `false`, `0`, `""`) short-circuits to a `Norm`
/// holding only `raw`.
pub fn normalize(raw: &Value) -> Norm {
    if !is_truthy(raw) {
        return Norm::raw_only(raw.clone());
    }

    let positions = chart::positions(raw);
    let houses = chart::houses(raw);
    let identity = chart::identity(raw, &positions, &houses);

    let tables = tables::collect(raw, &positions, &houses);

    let (predictions, kundli_yogas) = reading::predictions(raw);

    let norm = Norm {
        identity: (!identity.is_empty()).then_some(identity),
        strengths: non_empty(strength::strengths(raw)),
        shadbala: non_empty(strength::shadbala(raw)),
        bhava_bala: non_empty(strength::bhava_bala(raw)),
        ashtakavarga: strength::ashtakavarga(raw),
        aspects: non_empty(timeline::aspects(raw)),
        dashas: non_empty(timeline::dashas(raw)),
        transits: non_empty(timeline::transits(raw)),
        calendar: non_empty(timeline::calendar(raw)),
        yogas: non_empty(reading::yogas(raw)),
        remedies: non_empty(reading::remedies(raw)),
        doshas: non_empty(reading::doshas(raw)),
        recommendations: non_empty(reading::recommendations(raw)),
        notes: non_empty(reading::notes(raw)),
        divisional: non_empty(reading::divisional(raw)),
        charts: chart::charts(raw),
        predictions,
        kundli_yogas,
        tables: non_empty(tables),
        acg: astrocartography::acg(raw),
        extras: extras(raw),
        positions: non_empty(positions),
        houses: non_empty(houses),
        raw: Some(raw.clone()),
    };

    debug!(sections = ?norm.sections(), "normalized compute payload");
    norm
}

/// Normalize a payload that may be missing altogether.
pub fn normalize_opt(raw: Option<&Value>) -> Norm {
    match raw {
        Some(v) => normalize(v),
        None => Norm::raw_only(Value::Null),
    }
}

fn extras(raw: &Value) -> Option<Map<String, Value>> {
    let map = raw.as_object()?;
    let rest: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    (!rest.is_empty()).then_some(rest)
}

/// First truthy candidate, mirroring how the API moved sections around.
fn first_truthy<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a Value> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| is_truthy(v))
}
