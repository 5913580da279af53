//! Command handlers.
//!
//! Each handler returns the text to print, so `main` only decides where it
//! goes and tests can assert on it directly.

use crate::output::{bucket_tag, fmt_score, header, score_line, table};
use anyhow::{Context, Result};
use karma_core::achievements::{
    balanced_axis, detect_house_achievements, detect_planet_achievements, format_achievements,
    house_ordinal, weak_house_quests, weak_planet_quests, HouseScore, PlanetScore, Quest,
};
use karma_core::acg::{planets, CityFilter};
use karma_core::norm::{Norm, SECTION_NAMES};
use karma_core::preferences::{PreferenceStore, UserPreferences};
use karma_core::scales;
use karma_core::{extract_shadbala, normalize as normalize_payload, ExtractedShadbala, KarmaError};
use serde_json::Value;
use tracing::{debug, info};

/// Badges shown before collapsing into "+N more".
const MAX_BADGES: usize = 4;

/// `normalize`: the normalized payload as JSON.
pub fn normalize(payload: &Value, compact: bool, no_raw: bool) -> Result<String> {
    let mut norm = normalize_payload(payload);
    if no_raw {
        norm.raw = None;
    }
    debug!(sections = ?norm.sections(), "normalized payload");

    let out = if compact {
        serde_json::to_string(&norm)
    } else {
        serde_json::to_string_pretty(&norm)
    };
    out.context("serializing normalized payload")
}

/// `classify`: one line per score with its bucket and label.
pub fn classify(scores: &[f64], color: bool) -> String {
    scores
        .iter()
        .map(|&s| format!("{}  {}", score_line(s, color), scales::label(s)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `strengths`: Shadbala, Bhava Bala and plain strengths.
pub fn strengths(payload: &Value, prefs: &UserPreferences, color: bool) -> String {
    let norm = normalize_payload(payload);
    let shadbala = extract_shadbala(payload);

    let blocks: Vec<String> = [
        shadbala_block(&shadbala, &norm, prefs, color),
        bhava_block(&norm, prefs, color),
        strengths_block(&norm, prefs, color),
    ]
    .into_iter()
    .flatten()
    .collect();

    if blocks.is_empty() {
        return "No strength data".to_string();
    }
    blocks.join("\n\n")
}

fn section(name: &str, title: &str, prefs: &UserPreferences, color: bool, body: Vec<String>) -> String {
    if prefs.is_collapsed(name) {
        return format!("{}\n(collapsed: karmactl prefs toggle {})", header(title, color), name);
    }
    let mut out = vec![header(title, color)];
    out.extend(body);
    out.join("\n")
}

fn quest_lines(quests: &[Quest]) -> Vec<String> {
    if quests.is_empty() {
        return Vec::new();
    }
    let mut out = vec![String::new(), "Quests:".to_string()];
    out.extend(quests.iter().map(|q| format!("  {}: {}", q.subject, q.tip)));
    out
}

fn shadbala_block(
    shadbala: &ExtractedShadbala,
    norm: &Norm,
    prefs: &UserPreferences,
    color: bool,
) -> Option<String> {
    let classical = prefs.classical_labels;
    let mut body = Vec::new();

    let scores: Vec<PlanetScore> = if !shadbala.is_empty() {
        for id in &shadbala.ranking {
            let Some(planet) = shadbala.get(*id) else { continue };
            body.push(format!("{:<8} {}", id.as_str(), score_line(planet.total, color)));
            for (pillar, value) in &planet.pillars {
                body.push(format!("  {:<16} {}", pillar.label(classical), fmt_score(*value)));
            }
            if classical {
                if let Some(c) = &planet.classical {
                    let tier = c.tier.as_deref().map(|t| format!(" {}", t)).unwrap_or_default();
                    body.push(format!("  {:.2} rupa ({} virupa){}", c.rupa, c.virupa, tier));
                }
            }
        }
        shadbala.planets.iter().map(PlanetScore::from).collect()
    } else {
        let flat = norm.shadbala.as_deref()?;
        for v in flat {
            body.push(format!("{:<8} {}", v.pillar, score_line(v.value, color)));
        }
        PlanetScore::from_pillars(flat)
    };

    let badges = format_achievements(&detect_planet_achievements(&scores), MAX_BADGES);
    if !badges.is_empty() {
        body.push(String::new());
        body.push(badges);
    }
    body.extend(quest_lines(&weak_planet_quests(&scores)));
    if !shadbala.is_empty() {
        body.push(String::new());
        body.push(shadbala.share_text());
    }

    Some(section("shadbala", "Shadbala", prefs, color, body))
}

fn bhava_block(norm: &Norm, prefs: &UserPreferences, color: bool) -> Option<String> {
    let houses = norm.bhava_bala.as_deref()?;
    let mut body: Vec<String> = houses
        .iter()
        .map(|h| format!("{:<8} {}", house_ordinal(h.house), score_line(h.score, color)))
        .collect();

    let scores: Vec<HouseScore> = houses.iter().map(HouseScore::from).collect();
    let mut found = detect_house_achievements(&scores);
    found.extend(balanced_axis(&scores));
    let badges = format_achievements(&found, MAX_BADGES);
    if !badges.is_empty() {
        body.push(String::new());
        body.push(badges);
    }
    body.extend(quest_lines(&weak_house_quests(&scores)));

    Some(section("bhavaBala", "Bhava Bala", prefs, color, body))
}

fn strengths_block(norm: &Norm, prefs: &UserPreferences, color: bool) -> Option<String> {
    let rows = norm.strengths.as_deref()?;
    let body = rows
        .iter()
        .map(|s| format!("{:<8} {}", s.body, score_line(s.score, color)))
        .collect();
    Some(section("strengths", "Strengths", prefs, color, body))
}

/// `acg`: filtered city rows, nearest first.
pub fn acg(payload: &Value, filter: &CityFilter, color: bool) -> String {
    let rows = crate::input::city_rows(payload);
    if rows.is_empty() {
        return "No city rows".to_string();
    }

    let hits = filter.apply(&rows);
    debug!(total = rows.len(), matched = hits.len(), "filtered city rows");

    let cells: Vec<Vec<String>> = hits
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.country.clone(),
                r.planet.clone().unwrap_or_else(|| "-".to_string()),
                r.angle.clone().unwrap_or_else(|| "-".to_string()),
                r.distance_km.map(|d| format!("{:.1}", d)).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let mut out = vec![header("Cities", color)];
    if cells.is_empty() {
        out.push("No cities match the filter".to_string());
    } else {
        out.push(table(&["City", "Country", "Planet", "Angle", "km"], &cells));
    }
    out.push(String::new());
    out.push(format!(
        "{} of {} rows | planets: {}",
        hits.len(),
        rows.len(),
        planets(&rows).join(", ")
    ));
    out.join("\n")
}

/// `prefs show`.
pub fn prefs_show(prefs: &UserPreferences, color: bool) -> String {
    let mut out = vec![
        header("Preferences", color),
        format!(
            "{:<16} {}",
            "labels",
            if prefs.classical_labels { "classical" } else { "plain" }
        ),
    ];
    for name in SECTION_NAMES {
        let state = if prefs.is_open(name) { "open" } else { "collapsed" };
        out.push(format!("{:<16} {}", name, state));
    }
    out.join("\n")
}

/// `prefs set-classical on|off`.
pub fn prefs_set_classical(store: &mut dyn PreferenceStore, on: bool) -> Result<String> {
    let mut prefs = UserPreferences::load(&*store, &SECTION_NAMES);
    prefs.classical_labels = on;
    prefs.save(store).context("saving preferences")?;
    info!(classical = on, "updated label style");
    Ok(format!("labels: {}", if on { "classical" } else { "plain" }))
}

/// `prefs toggle <section>`.
pub fn prefs_toggle(store: &mut dyn PreferenceStore, name: &str) -> Result<String> {
    if !SECTION_NAMES.contains(&name) {
        return Err(KarmaError::Preferences(format!(
            "unknown section '{}' (expected one of: {})",
            name,
            SECTION_NAMES.join(", ")
        ))
        .into());
    }
    let mut prefs = UserPreferences::load(&*store, &SECTION_NAMES);
    let open = prefs.toggle_section(name);
    prefs.save(store).context("saving preferences")?;
    info!(section = name, open, "toggled section");
    Ok(format!("{}: {}", name, if open { "open" } else { "collapsed" }))
}

/// Bucket legend for `classify --legend`.
pub fn legend(color: bool) -> String {
    let t = scales::THRESHOLDS;
    [
        (scales::ScoreBucket::Boss, format!(">= {:.2}", t.boss)),
        (scales::ScoreBucket::Steady, format!(">= {:.2}", t.steady)),
        (scales::ScoreBucket::Boost, format!(">= {:.2}", t.boost)),
        (scales::ScoreBucket::Support, format!("<  {:.2}", t.boost)),
    ]
    .iter()
    .map(|(b, range)| format!("{} {}  {}", bucket_tag(*b, color), range, b.label()))
    .collect::<Vec<_>>()
    .join("\n")
}
