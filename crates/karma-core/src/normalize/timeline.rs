//! Time-ordered sections: aspects, dashas, transits and the panchanga calendar.

use crate::coerce::{field, num, text};
use crate::collection::{to_seq, Collection};
use crate::norm::{Aspect, CalendarDay, DashaPeriod, DashaSystem, Transit, TransitHit};
use serde_json::Value;

pub(super) fn aspects(raw: &Value) -> Vec<Aspect> {
    to_seq(raw.get("aspects"))
        .into_iter()
        .map(|a| {
            let a = Some(a);
            Aspect {
                from: text(field(a, &["from"])),
                to: text(field(a, &["to"])),
                kind: text(field(a, &["type", "aspect"])),
            }
        })
        .collect()
}

/// Dashas come either as a list of systems with `items`/`periods`, or keyed
/// by system name with the running periods under `active`.
pub(super) fn dashas(raw: &Value) -> Vec<DashaSystem> {
    match field(Some(raw), &["dashas", "dasha"]) {
        Some(Value::Array(systems)) => systems
            .iter()
            .map(|d| {
                let d = Some(d);
                let system = field(d, &["system", "name"])
                    .map(|s| text(Some(s)))
                    .unwrap_or_else(|| "Dasha".to_string());
                let items = to_seq(field(d, &["items", "periods"]))
                    .into_iter()
                    .map(|i| {
                        let i = Some(i);
                        DashaPeriod {
                            name: text(field(i, &["name"])),
                            from: text(field(i, &["from"])),
                            to: text(field(i, &["to"])),
                            strength: Some(num(field(i, &["strength", "score"]))),
                        }
                    })
                    .collect();
                DashaSystem { system, items }
            })
            .collect(),
        Some(node) if node.is_object() => Collection::of(Some(node))
            .entries()
            .into_iter()
            .map(|(system, obj)| {
                let active = field(Some(obj), &["active"]).filter(|a| a.is_object());
                let items = Collection::of(active)
                    .entries()
                    .into_iter()
                    .map(|(name, v)| DashaPeriod {
                        name,
                        from: text(field(Some(v), &["start"])),
                        to: text(field(Some(v), &["end"])),
                        strength: None,
                    })
                    .collect();
                DashaSystem { system, items }
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub(super) fn transits(raw: &Value) -> Vec<Transit> {
    to_seq(raw.get("transits"))
        .into_iter()
        .map(|t| Transit {
            date: text(field(Some(t), &["date"])),
            hits: to_seq(field(Some(t), &["hits"]))
                .into_iter()
                .map(|h| {
                    let h = Some(h);
                    TransitHit {
                        body: text(field(h, &["body"])),
                        target: text(field(h, &["target"])),
                        kind: text(field(h, &["type"])),
                    }
                })
                .collect(),
        })
        .collect()
}

pub(super) fn calendar(raw: &Value) -> Vec<CalendarDay> {
    to_seq(field(Some(raw), &["calendar", "panchanga"]))
        .into_iter()
        .map(|c| {
            let c = Some(c);
            CalendarDay {
                date: text(field(c, &["date"])),
                tithi: text(field(c, &["tithi"])),
                nakshatra: text(field(c, &["nakshatra"])),
                yoga: text(field(c, &["yoga"])),
                karana: text(field(c, &["karana"])),
            }
        })
        .collect()
}
