//! Astrocartography: planet lines, recommended places and advice.

use crate::coerce::{field, is_truthy, num, text};
use crate::collection::{non_empty, to_seq, Collection};
use crate::norm::{AcgAdvice, AcgPlace, Astrocartography, GeoPoint, PlanetLines};
use serde_json::Value;

/// A point given as `{lat, lon}` (or `latitude`/`lng`/`longitude`) or as
/// a `[lat, lon]` pair.
fn point(p: &Value) -> GeoPoint {
    match p {
        Value::Array(pair) => GeoPoint {
            lat: num(pair.first()),
            lon: num(pair.get(1)),
        },
        _ => GeoPoint {
            lat: num(field(Some(p), &["lat", "latitude"])),
            lon: num(field(Some(p), &["lon", "lng", "longitude"])),
        },
    }
}

fn polyline(node: Option<&Value>) -> Vec<GeoPoint> {
    to_seq(node).into_iter().map(point).collect()
}

pub(super) fn acg(raw: &Value) -> Option<Astrocartography> {
    let node = field(
        Some(raw),
        &["acg", "ACG", "astro_cartography", "astroCartography"],
    )
    .filter(|v| is_truthy(v))?;
    let node_ref = Some(node);

    let lines = match field(node_ref, &["lines"]) {
        Some(lines) if lines.is_object() => non_empty(
            Collection::of(Some(lines))
                .entries()
                .into_iter()
                .map(|(planet, l)| PlanetLines {
                    planet,
                    asc: polyline(field(Some(l), &["ASC"])),
                    dsc: polyline(field(Some(l), &["DSC"])),
                })
                .collect(),
        ),
        _ => None,
    };

    let places = field(node_ref, &["places", "cities", "recommendations", "best_places"])
        .and_then(|p| {
            non_empty(
                to_seq(Some(p))
                    .into_iter()
                    .map(|p| {
                        let p = Some(p);
                        AcgPlace {
                            city: text(field(p, &["city", "name"])),
                            country: text(field(p, &["country"])),
                            score: num(field(p, &["score", "rank"])),
                            why: text(field(p, &["why", "reason", "note"])),
                        }
                    })
                    .collect(),
            )
        });

    let advice = match field(node_ref, &["advice"]) {
        Some(a) if a.is_object() => non_empty(
            Collection::of(Some(a))
                .entries()
                .into_iter()
                .map(|(topic, items)| AcgAdvice {
                    topic,
                    items: to_seq(Some(items)).into_iter().map(|i| text(Some(i))).collect(),
                })
                .collect(),
        ),
        _ => None,
    };

    if advice.is_none() && lines.is_none() && places.is_none() {
        return None;
    }

    Some(Astrocartography {
        advice,
        lines,
        places,
    })
}
