//! Strength sections: planet strengths, Shadbala, Bhava Bala, Ashtakavarga.

use crate::coerce::{field, is_truthy, num, ordinal, path, text};
use crate::collection::{to_seq, Collection};
use crate::norm::{Ashtakavarga, AshtakavargaRow, BodyStrength, HouseStrength, PillarValue};
use serde_json::Value;

/// Ashtakavarga grids cover the twelve signs.
const SIGN_COUNT: usize = 12;

pub(super) fn strengths(raw: &Value) -> Vec<BodyStrength> {
    to_seq(field(Some(raw), &["strengths", "planet_strengths"]))
        .into_iter()
        .map(|s| BodyStrength {
            body: text(field(Some(s), &["body", "name", "planet"])),
            score: num(field(Some(s), &["score", "value", "points"])),
        })
        .collect()
}

/// Shadbala arrives as `[{pillar, value}]`, as `{name: value}`, or as the
/// full component breakdown whose `totals.normalized` holds one value per
/// planet.
pub(super) fn shadbala(raw: &Value) -> Vec<PillarValue> {
    let source = field(Some(raw), &["shadbala", "shad_bala"]);

    match source {
        Some(Value::Array(items)) => items
            .iter()
            .map(|x| PillarValue {
                pillar: text(field(Some(x), &["pillar", "name"])),
                value: num(field(Some(x), &["value"])),
            })
            .collect(),
        Some(node) if node.is_object() => {
            let keyed = path(node, &["totals.normalized"])
                .filter(|t| t.is_object())
                .unwrap_or(node);
            Collection::of(Some(keyed))
                .entries()
                .into_iter()
                .map(|(pillar, v)| PillarValue {
                    pillar,
                    value: num(Some(v)),
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

pub(super) fn bhava_bala(raw: &Value) -> Vec<HouseStrength> {
    let source = field(Some(raw), &["bhavaBala"])
        .or_else(|| path(raw, &["bhava_bala.bhava_bala"]).filter(|v| !v.is_null()))
        .or_else(|| field(Some(raw), &["bhava_bala"]));

    to_seq(source)
        .into_iter()
        .map(|x| {
            let x = Some(x);
            HouseStrength {
                house: ordinal(field(x, &["house", "no"])).unwrap_or(0),
                score: num(field(x, &["score", "value", "net"])),
                benefics: num(field(x, &["benefics"])),
                malefics: num(field(x, &["malefics"])),
                net: num(field(x, &["net"])),
            }
        })
        .collect()
}

fn cells(node: Option<&Value>) -> Vec<f64> {
    to_seq(node).into_iter().map(|c| num(Some(c))).collect()
}

/// Ashtakavarga either as explicit `{headers, rows: [{name, cells}]}` or as a
/// planet matrix under `planets`, `pav`, or the node itself.
pub(super) fn ashtakavarga(raw: &Value) -> Option<Ashtakavarga> {
    let node = field(Some(raw), &["ashtakavarga", "ashta"]).filter(|v| is_truthy(v))?;
    let node_ref = Some(node);

    let explicit: Vec<AshtakavargaRow> = to_seq(field(node_ref, &["rows"]))
        .into_iter()
        .map(|r| AshtakavargaRow {
            name: text(field(Some(r), &["name", "row"])),
            cells: cells(field(Some(r), &["cells"])),
        })
        .collect();

    let matrix = field(node_ref, &["planets"])
        .filter(|v| v.is_object())
        .or_else(|| field(node_ref, &["pav"]).filter(|v| v.is_object()))
        .or_else(|| (explicit.is_empty() && node.is_object()).then_some(node));

    let from_matrix: Vec<AshtakavargaRow> = Collection::of(matrix)
        .entries()
        .into_iter()
        .filter(|(_, v)| v.is_array() || v.is_object())
        .map(|(name, v)| {
            let mut row = cells(Some(v));
            row.truncate(SIGN_COUNT);
            AshtakavargaRow { name, cells: row }
        })
        .collect();

    let given_headers: Vec<String> = to_seq(field(node_ref, &["headers"]))
        .into_iter()
        .map(|h| text(Some(h)))
        .collect();

    let width = explicit
        .first()
        .map(|r| r.cells.len())
        .filter(|n| *n > 0)
        .or_else(|| from_matrix.first().map(|r| r.cells.len()).filter(|n| *n > 0))
        .unwrap_or(SIGN_COUNT);

    let headers = if given_headers.is_empty() {
        (1..=width).map(|i| format!("H{}", i)).collect()
    } else {
        given_headers
    };

    let rows: Vec<AshtakavargaRow> = (if explicit.is_empty() { from_matrix } else { explicit })
        .into_iter()
        .filter(|r| !r.cells.is_empty())
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut totals = cells(field(node_ref, &["sav"]));
    totals.truncate(SIGN_COUNT);

    Some(Ashtakavarga {
        headers,
        rows,
        totals: (!totals.is_empty()).then_some(totals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shadbala_object_keeps_key_order() {
        let raw = json!({"shadbala": {"Sun": 0.82, "Moon": 0.3}});
        let s = shadbala(&raw);
        assert_eq!(s[0], PillarValue { pillar: "Sun".to_string(), value: 0.82 });
        assert_eq!(s[1], PillarValue { pillar: "Moon".to_string(), value: 0.3 });
    }

    #[test]
    fn test_shadbala_array_form() {
        let raw = json!({"shad_bala": [{"name": "sthana", "value": "0.61"}, {"pillar": "dig"}]});
        let s = shadbala(&raw);
        assert_eq!(s[0].pillar, "sthana");
        assert_eq!(s[0].value, 0.61);
        assert_eq!(s[1].value, 0.0);
    }

    #[test]
    fn test_shadbala_component_breakdown_uses_totals() {
        let raw = json!({"shadbala": {
            "components": {"normalized": {"Sun": {"sthana": 0.5}}},
            "totals": {"normalized": {"Sun": 0.71, "Venus": 0.44}}
        }});
        let s = shadbala(&raw);
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].pillar, "Venus");
    }

    #[test]
    fn test_shadbala_scalar_is_empty() {
        assert!(shadbala(&json!({"shadbala": 4})).is_empty());
    }

    #[test]
    fn test_bhava_bala_nested_list() {
        let raw = json!({"bhava_bala": {"bhava_bala": [{"house": 10, "net": 0.77}]}});
        let b = bhava_bala(&raw);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].house, 10);
        assert_eq!(b[0].score, 0.77);
        assert_eq!(b[0].net, 0.77);
    }

    #[test]
    fn test_strengths_fallback_fields() {
        let raw = json!({"planet_strengths": [{"planet": "Jupiter", "points": 31}]});
        let s = strengths(&raw);
        assert_eq!(s[0].body, "Jupiter");
        assert_eq!(s[0].score, 31.0);
    }

    #[test]
    fn test_ashtakavarga_explicit_rows() {
        let raw = json!({"ashtakavarga": {
            "headers": ["Ar", "Ta"],
            "rows": [{"name": "Sun", "cells": [4, "5"]}, {"name": "Empty", "cells": []}],
            "sav": [28, 30]
        }});
        let a = ashtakavarga(&raw).unwrap();
        assert_eq!(a.headers, vec!["Ar", "Ta"]);
        assert_eq!(a.rows.len(), 1);
        assert_eq!(a.rows[0].cells, vec![4.0, 5.0]);
        assert_eq!(a.totals, Some(vec![28.0, 30.0]));
    }

    #[test]
    fn test_ashtakavarga_matrix_caps_at_twelve() {
        let row: Vec<u32> = (0..14).collect();
        let raw = json!({"ashta": {"pav": {"Moon": row}, "sav": []}});
        let a = ashtakavarga(&raw).unwrap();
        assert_eq!(a.rows[0].name, "Moon");
        assert_eq!(a.rows[0].cells.len(), 12);
        assert_eq!(a.headers.len(), 12);
        assert_eq!(a.headers[0], "H1");
        assert!(a.totals.is_none());
    }

    #[test]
    fn test_ashtakavarga_node_as_matrix() {
        let raw = json!({"ashtakavarga": {"Sun": [1, 2, 3], "note": "x"}});
        let a = ashtakavarga(&raw).unwrap();
        assert_eq!(a.rows.len(), 1);
        assert_eq!(a.headers, vec!["H1", "H2", "H3"]);
    }

    #[test]
    fn test_ashtakavarga_absent_or_empty() {
        assert!(ashtakavarga(&json!({})).is_none());
        assert!(ashtakavarga(&json!({"ashtakavarga": {}})).is_none());
        assert!(ashtakavarga(&json!({"ashtakavarga": []})).is_none());
    }
}
