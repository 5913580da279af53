//! Interpretive sections: yogas, remedies, doshas, guidance lists,
//! divisional charts and kundli predictions.

use crate::coerce::{field, num, opt_num, opt_text, text};
use crate::collection::{non_empty, to_seq};
use crate::norm::{
    Divisional, Dosha, DoshaLevel, Guidance, PredictionCategory, PredictionItem, Predictions,
    Remedy, Yoga,
};
use serde_json::{Map, Value};

pub(super) fn yogas(raw: &Value) -> Vec<Yoga> {
    to_seq(raw.get("yogas"))
        .into_iter()
        .map(|y| {
            let y = Some(y);
            Yoga {
                title: text(field(y, &["title", "name"])),
                summary: text(field(y, &["summary", "desc"])),
                tag: opt_text(field(y, &["tag"])),
            }
        })
        .collect()
}

pub(super) fn remedies(raw: &Value) -> Vec<Remedy> {
    to_seq(field(Some(raw), &["remedies", "upaya"]))
        .into_iter()
        .map(|r| {
            let r = Some(r);
            Remedy {
                title: text(field(r, &["title", "name"])),
                summary: text(field(r, &["summary", "desc"])),
            }
        })
        .collect()
}

pub(super) fn doshas(raw: &Value) -> Vec<Dosha> {
    to_seq(raw.get("doshas"))
        .into_iter()
        .map(|d| {
            let d = Some(d);
            Dosha {
                title: text(field(d, &["title", "name"])),
                level: DoshaLevel::parse(&text(field(d, &["level"]))),
                note: opt_text(field(d, &["note"])),
            }
        })
        .collect()
}

fn guidance(node: Option<&Value>) -> Vec<Guidance> {
    to_seq(node)
        .into_iter()
        .map(|t| Guidance {
            title: text(field(Some(t), &["title"])),
            bullets: to_seq(field(Some(t), &["bullets"]))
                .into_iter()
                .map(|b| text(Some(b)))
                .collect(),
        })
        .collect()
}

pub(super) fn recommendations(raw: &Value) -> Vec<Guidance> {
    guidance(field(Some(raw), &["recommendations", "tips"]))
}

pub(super) fn notes(raw: &Value) -> Vec<Guidance> {
    guidance(field(Some(raw), &["notes", "insights"]))
}

pub(super) fn divisional(raw: &Value) -> Vec<Divisional> {
    to_seq(field(Some(raw), &["divisional", "varga"]))
        .into_iter()
        .map(|v| Divisional {
            name: text(field(Some(v), &["name"])),
            image: opt_text(field(Some(v), &["image"])),
        })
        .collect()
}

/// Key comparison that ignores case, spaces, underscores and dashes.
fn norm_key(k: &str) -> String {
    k.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(key: &str) -> String {
    capitalize(&key.replace('_', " "))
}

fn map_field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

fn paragraphs(node: Option<&Value>) -> String {
    to_seq(node)
        .into_iter()
        .map(|p| text(Some(p)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prose from a string, a list of paragraphs, or an object carrying
/// `summary`/`text`/`content`/`paragraphs`.
fn prose(val: &Value) -> String {
    match val {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(_) => paragraphs(Some(val)),
        Value::Object(_) => match field(Some(val), &["summary", "text", "content"]) {
            Some(Value::String(s)) => s.clone(),
            _ => paragraphs(field(Some(val), &["paragraphs"])),
        },
        other => text(Some(other)),
    }
}

const RESERVED_KEYS: &[&str] = &["summary", "overall", "overview", "highlights", "categories"];

/// Kundli predictions plus the yoga names listed among them.
pub(super) fn predictions(raw: &Value) -> (Option<Predictions>, Option<Vec<String>>) {
    let kp = match field(
        Some(raw),
        &["kundli_predictions", "kundliPredictions", "predictions", "kundli"],
    ) {
        Some(Value::Object(map)) => map,
        _ => return (None, None),
    };

    let classical_key = kp.keys().find(|k| {
        let nk = norm_key(k);
        nk == "classicalreading" || nk == "classical"
    });
    let yogas_key = kp.keys().find(|k| {
        let nk = norm_key(k);
        nk == "yogas" || nk == "yoga"
    });

    let classical_reading = classical_key
        .and_then(|k| kp.get(k))
        .map(prose)
        .filter(|s| !s.is_empty());

    let summary = opt_text(map_field(kp, &["summary", "overall", "overview", "highlights"]));

    let kundli_yogas = yogas_key.and_then(|k| match kp.get(k) {
        Some(Value::Array(items)) => non_empty(
            items
                .iter()
                .map(|x| match x {
                    Value::String(s) => s.clone(),
                    other => text(field(Some(other), &["title", "name", "text", "summary"])),
                })
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Some(Value::String(s)) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    });

    let entries: Vec<(String, &Value)> = match kp.get("categories") {
        Some(Value::Array(cats)) => cats
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let key = opt_text(field(Some(c), &["key"])).unwrap_or_else(|| format!("cat_{}", i));
                (key, c)
            })
            .collect(),
        _ => kp
            .iter()
            .filter(|(k, _)| {
                !RESERVED_KEYS.contains(&k.as_str())
                    && Some(*k) != classical_key
                    && Some(*k) != yogas_key
            })
            .map(|(k, v)| (k.clone(), v))
            .collect(),
    };

    let categories: Vec<PredictionCategory> = entries
        .into_iter()
        .map(|(key, c)| category(key, c))
        .collect();

    let predictions = (classical_reading.is_some() || summary.is_some() || !categories.is_empty())
        .then_some(Predictions {
            classical_reading,
            summary,
            categories,
        });

    (predictions, kundli_yogas)
}

fn category(key: String, c: &Value) -> PredictionCategory {
    match c {
        Value::String(s) => PredictionCategory {
            title: title_case(&key),
            summary: (!s.is_empty()).then(|| s.clone()),
            key,
            ..Default::default()
        },
        Value::Array(items) => PredictionCategory {
            title: title_case(&key),
            bullets: Some(items.iter().map(|b| text(Some(b))).collect()),
            key,
            ..Default::default()
        },
        _ => {
            let node = Some(c);
            let title = opt_text(field(node, &["title"])).unwrap_or_else(|| key.replace('_', " "));
            let title = capitalize(&title);
            let summary = opt_text(field(node, &["summary", "desc", "text", "content"]))
                .or_else(|| Some(paragraphs(field(node, &["paragraphs"]))).filter(|s| !s.is_empty()));
            let bullets: Vec<String> = to_seq(field(node, &["bullets", "points", "tips"]))
                .into_iter()
                .map(|b| text(Some(b)))
                .collect();
            let items: Vec<PredictionItem> = to_seq(field(node, &["items", "timeline"]))
                .into_iter()
                .map(|it| {
                    let it = Some(it);
                    PredictionItem {
                        title: text(field(it, &["title", "name"])),
                        text: text(field(it, &["text", "desc"])),
                        from: text(field(it, &["from", "start"])),
                        to: text(field(it, &["to", "end"])),
                        score: num(field(it, &["score"])),
                    }
                })
                .filter(|it| {
                    !(it.title.is_empty() && it.text.is_empty() && it.from.is_empty() && it.to.is_empty())
                })
                .collect();

            PredictionCategory {
                title,
                summary,
                bullets: non_empty(bullets),
                score: opt_num(field(node, &["score", "rating"])),
                timeframe: opt_text(field(node, &["timeframe", "window"])),
                items: non_empty(items),
                key,
            }
        }
    }
}
