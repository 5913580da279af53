//! Chart basics: identity, positions, houses and chart grids.

use super::first_truthy;
use crate::coerce::{field, flag, num, opt_num, opt_text, ordinal, path, text};
use crate::collection::{non_empty, to_seq, Collection};
use crate::norm::{ChartHouse, Charts, HouseCusp, Identity, Position, Varga};
use serde_json::Value;

const SUN: &[&str] = &["su", "sun"];
const MOON: &[&str] = &["mo", "moon"];
const ASCENDANT: &[&str] = &["asc", "ascendant"];

pub(super) fn positions(raw: &Value) -> Vec<Position> {
    let source = first_truthy(&[
        raw.get("positions"),
        raw.get("planets"),
        raw.get("placements"),
        path(
            raw,
            &[
                "charts.rasi.positions",
                "charts.lagna.positions",
                "charts.rashi.positions",
            ],
        ),
        path(raw, &["tables.positions"]),
    ]);

    to_seq(source).into_iter().map(position).collect()
}

fn position(node: &Value) -> Position {
    let p = Some(node);
    let nakshatra = path(node, &["nakshatra.name"])
        .filter(|v| !v.is_null())
        .or_else(|| field(p, &["nakshatra", "star"]));

    Position {
        body: text(field(p, &["body", "name", "planet", "key"])),
        sign: text(field(p, &["sign", "rasi", "zodiac", "sign_name"])),
        degree: num(field(p, &["degree", "deg", "longitude"])),
        house: ordinal(field(p, &["house", "bhava", "h"])),
        retro: flag(field(p, &["retro", "isRetro", "R"])),
        nakshatra: opt_text(nakshatra),
    }
}

pub(super) fn houses(raw: &Value) -> Vec<HouseCusp> {
    let source = first_truthy(&[
        raw.get("houses"),
        raw.get("bhava"),
        path(
            raw,
            &["charts.rasi.houses", "charts.lagna.houses", "charts.rashi.houses"],
        ),
        path(raw, &["tables.houses"]),
    ]);

    to_seq(source)
        .into_iter()
        .filter_map(|h| {
            let h = Some(h);
            Some(HouseCusp {
                house: ordinal(field(h, &["house", "no", "index", "id"]))?,
                sign: opt_text(field(h, &["sign", "rasi", "zodiac", "sign_name"])),
                lord: opt_text(field(h, &["lord", "ruler"])),
                degree: num(field(h, &["degree", "deg"])),
            })
        })
        .collect()
}

fn find_body<'a>(positions: &'a [Position], names: &[&str]) -> Option<&'a Position> {
    positions
        .iter()
        .find(|p| names.iter().any(|n| p.body.eq_ignore_ascii_case(n)))
}

fn sign_of(positions: &[Position], names: &[&str]) -> Option<String> {
    find_body(positions, names).and_then(|p| (!p.sign.is_empty()).then(|| p.sign.clone()))
}

pub(super) fn identity(raw: &Value, positions: &[Position], houses: &[HouseCusp]) -> Identity {
    let basics = field(Some(raw), &["basics", "core"]);

    let sun = opt_text(field(basics, &["sun"]))
        .or_else(|| opt_text(path(raw, &["identity.sun", "signs.sun"])))
        .or_else(|| sign_of(positions, SUN));

    let moon = opt_text(field(basics, &["moon"]))
        .or_else(|| opt_text(path(raw, &["identity.moon", "signs.moon"])))
        .or_else(|| sign_of(positions, MOON));

    let rising = opt_text(field(basics, &["rising", "asc"]))
        .or_else(|| opt_text(path(raw, &["identity.rising", "identity.asc"])))
        .or_else(|| opt_text(path(raw, &["asc.sign", "asc.rasi", "asc.sign_name"])))
        .or_else(|| sign_of(positions, ASCENDANT))
        .or_else(|| houses.iter().find(|h| h.house == 1).and_then(|h| h.sign.clone()));

    let nakshatra = opt_text(field(basics, &["nakshatra"]))
        .or_else(|| {
            opt_text(path(
                raw,
                &["identity.nakshatra", "nakshatra.moon", "moon.nakshatra.name"],
            ))
        })
        .or_else(|| find_body(positions, MOON).and_then(|p| p.nakshatra.clone()));

    let ayanamsha = opt_text(path(
        raw,
        &[
            "basics.ayanamsha",
            "core.ayanamsha",
            "meta.ayanamsha",
            "settings.ayanamsha",
            "config.ayanamsha",
        ],
    ))
    .or_else(|| opt_text(path(raw, &["ayanamsha", "ayanamsa"])));

    Identity {
        sun,
        moon,
        rising,
        nakshatra,
        ayanamsha,
    }
}

fn bodies(node: Option<&Value>) -> Vec<String> {
    to_seq(node).into_iter().map(|b| text(Some(b))).collect()
}

/// One house per array slot, numbered from 1.
fn grid_houses(slots: &[Value]) -> Vec<ChartHouse> {
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| ChartHouse {
            house: i as u32 + 1,
            sign: None,
            bodies: bodies(Some(slot)),
        })
        .collect()
}

pub(super) fn charts(raw: &Value) -> Option<Charts> {
    let charts = raw.get("charts");
    let rashi = field(charts, &["rashi", "rasi"]);

    let rasi_houses = match rashi {
        Some(Value::Array(slots)) => non_empty(grid_houses(slots)),
        Some(node) => non_empty(
            to_seq(node.get("houses"))
                .into_iter()
                .enumerate()
                .map(|(i, h)| ChartHouse {
                    house: ordinal(field(Some(h), &["house"])).unwrap_or(i as u32 + 1),
                    sign: opt_text(field(Some(h), &["sign"])),
                    bodies: bodies(field(Some(h), &["bodies", "planets"])),
                })
                .collect(),
        ),
        None => None,
    };

    let chalit_houses = match field(charts, &["chalit"]) {
        Some(Value::Array(slots)) => non_empty(grid_houses(slots)),
        _ => None,
    };

    let vargas = match field(charts, &["vargas"]) {
        Some(node) if node.is_object() => non_empty(
            Collection::of(Some(node))
                .entries()
                .into_iter()
                .map(|(name, v)| Varga {
                    name,
                    asc_idx: opt_num(field(Some(v), &["asc_idx"]))
                        .filter(|i| *i >= 0.0)
                        .map(|i| i as u32),
                    houses: to_seq(field(Some(v), &["houses"]))
                        .into_iter()
                        .map(|h| bodies(Some(h)))
                        .collect(),
                })
                .collect(),
        ),
        _ => None,
    };

    if rasi_houses.is_none() && chalit_houses.is_none() && vargas.is_none() {
        return None;
    }

    Some(Charts {
        rasi_houses,
        chalit_houses,
        vargas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positions_fall_back_to_planets() {
        let raw = json!({"planets": [{"planet": "Mars", "rasi": "Aries", "longitude": "12.25", "R": true}]});
        let p = &positions(&raw)[0];
        assert_eq!(p.body, "Mars");
        assert_eq!(p.sign, "Aries");
        assert_eq!(p.degree, 12.25);
        assert!(p.retro);
    }

    #[test]
    fn test_positions_skip_null_candidates() {
        let raw = json!({"positions": null, "placements": [{"name": "Moon"}]});
        assert_eq!(positions(&raw)[0].body, "Moon");
    }

    #[test]
    fn test_positions_empty_array_wins_over_later_keys() {
        let raw = json!({"positions": [], "placements": [{"name": "Moon"}]});
        assert!(positions(&raw).is_empty());
    }

    #[test]
    fn test_positions_from_chart_path() {
        let raw = json!({"charts": {"lagna": {"positions": {"sun": {"name": "Sun"}}}}});
        assert_eq!(positions(&raw).len(), 1);
    }

    #[test]
    fn test_position_nakshatra_object_or_string() {
        let raw = json!({"positions": [
            {"name": "Moon", "nakshatra": {"name": "Rohini"}},
            {"name": "Sun", "star": "Ashlesha"}
        ]});
        let ps = positions(&raw);
        assert_eq!(ps[0].nakshatra.as_deref(), Some("Rohini"));
        assert_eq!(ps[1].nakshatra.as_deref(), Some("Ashlesha"));
    }

    #[test]
    fn test_houses_drop_unnumbered() {
        let raw = json!({"houses": [{"no": 1, "sign": "Leo", "ruler": "Sun"}, {"sign": "Virgo"}]});
        let hs = houses(&raw);
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].lord.as_deref(), Some("Sun"));
    }

    #[test]
    fn test_identity_derived_from_positions_and_houses() {
        let raw = json!({
            "positions": [
                {"name": "Sun", "sign": "Gemini"},
                {"name": "Mo", "sign": "Taurus", "nakshatra": "Rohini"}
            ],
            "houses": [{"house": 1, "sign": "Cancer"}],
            "meta": {"ayanamsha": "Lahiri"}
        });
        let id = identity(&raw, &positions(&raw), &houses(&raw));
        assert_eq!(id.sun.as_deref(), Some("Gemini"));
        assert_eq!(id.moon.as_deref(), Some("Taurus"));
        assert_eq!(id.rising.as_deref(), Some("Cancer"));
        assert_eq!(id.nakshatra.as_deref(), Some("Rohini"));
        assert_eq!(id.ayanamsha.as_deref(), Some("Lahiri"));
    }

    #[test]
    fn test_identity_basics_win() {
        let raw = json!({
            "basics": {"sun": "Aries", "asc": "Libra"},
            "positions": [{"name": "Sun", "sign": "Pisces"}]
        });
        let id = identity(&raw, &positions(&raw), &[]);
        assert_eq!(id.sun.as_deref(), Some("Aries"));
        assert_eq!(id.rising.as_deref(), Some("Libra"));
    }

    #[test]
    fn test_charts_grids() {
        let raw = json!({"charts": {
            "rasi": [["Sun", "Mercury"], [], ["Moon"]],
            "chalit": [["Sun"]],
            "vargas": {"D9": {"asc_idx": 3, "houses": [["Venus"], []]}}
        }});
        let c = charts(&raw).unwrap();
        let rasi = c.rasi_houses.unwrap();
        assert_eq!(rasi.len(), 3);
        assert_eq!(rasi[2].house, 3);
        assert_eq!(rasi[0].bodies, vec!["Sun", "Mercury"]);
        assert_eq!(c.chalit_houses.unwrap().len(), 1);
        let d9 = &c.vargas.unwrap()[0];
        assert_eq!(d9.name, "D9");
        assert_eq!(d9.asc_idx, Some(3));
    }

    #[test]
    fn test_charts_absent() {
        assert!(charts(&json!({"charts": {}})).is_none());
        assert!(charts(&json!({})).is_none());
    }
}
