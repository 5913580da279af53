//! Achievement badges for planet and house strengths.
//!
//! Boss items (boss bucket) and weak items (support bucket) each unlock a
//! badge, plus one "top" badge for the strongest item. Weak items also get a
//! short quest nudging the user toward a small supportive action.

use crate::norm::{HouseStrength, PillarValue};
use crate::scales::{self, ScoreBucket};
use crate::shadbala::{ExtractedPlanet, PlanetId};
use serde::{Deserialize, Serialize};

/// Houses 1 and 7 within this distance count as a balanced axis.
pub const BALANCED_AXIS_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Boss,
    Weak,
    Top,
    BalancedAxis,
}

/// Achievement badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable key, e.g. "boss:Sun" or "top:10th"
    pub key: String,
    pub kind: AchievementKind,
    /// Planet name or house ordinal
    pub subject: String,
    pub label: String,
    pub emoji: String,
}

impl Achievement {
    fn new(kind: AchievementKind, subject: &str) -> Self {
        let (prefix, label, emoji) = match kind {
            AchievementKind::Boss => ("boss", format!("Boss {}", subject), "👑"),
            AchievementKind::Weak => ("weak", format!("Weak {}", subject), "🪫"),
            AchievementKind::Top => ("top", format!("Top: {}", subject), "⭐"),
            AchievementKind::BalancedAxis => (
                "balanced",
                "Balanced Axis 1↔7 • Relationship Harmony".to_string(),
                "🌸",
            ),
        };
        Self {
            key: format!("{}:{}", prefix, subject),
            kind,
            subject: subject.to_string(),
            label,
            emoji: emoji.to_string(),
        }
    }
}

/// Planet with its normalized total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetScore {
    pub id: PlanetId,
    pub total: f64,
}

impl From<&ExtractedPlanet> for PlanetScore {
    fn from(p: &ExtractedPlanet) -> Self {
        Self { id: p.id, total: p.total }
    }
}

impl PlanetScore {
    /// Flat `{pillar: value}` Shadbala where the pillar names a planet.
    pub fn from_pillars(values: &[PillarValue]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|v| {
                Some(Self {
                    id: PlanetId::from_name(&v.pillar)?,
                    total: v.value,
                })
            })
            .collect()
    }
}

/// House with its normalized total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseScore {
    pub house: u32,
    pub total: f64,
}

impl From<&HouseStrength> for HouseScore {
    fn from(h: &HouseStrength) -> Self {
        Self {
            house: h.house,
            total: h.score,
        }
    }
}

/// "1st", "2nd", "3rd", "4th", ... "11th", "12th".
pub fn house_ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Strongest finite score; the first one wins ties.
fn top_index(totals: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, t) in totals.enumerate().filter(|(_, t)| t.is_finite()) {
        if best.map(|(_, b)| t > b).unwrap_or(true) {
            best = Some((i, t));
        }
    }
    best.map(|(i, _)| i)
}

fn detect(subjects: &[(String, f64)]) -> Vec<Achievement> {
    let mut out = Vec::new();

    for (name, total) in subjects {
        if scales::bucket(*total) == ScoreBucket::Boss {
            out.push(Achievement::new(AchievementKind::Boss, name));
        }
    }
    for (name, total) in subjects {
        if scales::bucket(*total) == ScoreBucket::Support {
            out.push(Achievement::new(AchievementKind::Weak, name));
        }
    }
    if let Some(i) = top_index(subjects.iter().map(|(_, t)| *t)) {
        out.push(Achievement::new(AchievementKind::Top, &subjects[i].0));
    }

    out
}

/// Boss badges, then weak badges, then the top planet.
pub fn detect_planet_achievements(planets: &[PlanetScore]) -> Vec<Achievement> {
    let subjects: Vec<(String, f64)> = planets
        .iter()
        .map(|p| (p.id.to_string(), p.total))
        .collect();
    detect(&subjects)
}

/// Same as planets, with houses named by ordinal ("10th").
pub fn detect_house_achievements(houses: &[HouseScore]) -> Vec<Achievement> {
    let subjects: Vec<(String, f64)> = houses
        .iter()
        .map(|h| (house_ordinal(h.house), h.total))
        .collect();
    detect(&subjects)
}

/// Badge when houses 1 and 7 are both present and within tolerance.
pub fn balanced_axis(houses: &[HouseScore]) -> Option<Achievement> {
    let total = |n: u32| houses.iter().find(|h| h.house == n).map(|h| h.total);
    let (h1, h7) = (total(1)?, total(7)?);
    // Small epsilon so 0.52 vs 0.50 still counts.
    if (h1 - h7).abs() <= BALANCED_AXIS_TOLERANCE + 1e-9 {
        Some(Achievement::new(AchievementKind::BalancedAxis, "1-7"))
    } else {
        None
    }
}

/// A nudge for one weak planet or house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub subject: String,
    pub tip: String,
}

const DEFAULT_HOUSE_TIP: &str = "A 10-minute micro-habit aligned to this house helps.";

fn planet_tip(id: PlanetId) -> &'static str {
    match id {
        PlanetId::Sun => "Plan one visible ownership task today.",
        PlanetId::Moon => "Fix sleep/wake & hydrate early.",
        PlanetId::Mars => "Do a short movement sprint; avoid conflict.",
        PlanetId::Mercury => "Write first; single-thread your tabs.",
        PlanetId::Jupiter => "Ground big calls in data; keep promises small.",
        PlanetId::Venus => "Tidy your space; add one comfort cue.",
        PlanetId::Saturn => "Commit to a tiny routine and track a streak.",
        PlanetId::Rahu => "Cap experiments; pair each risk with a stop-loss.",
        PlanetId::Ketu => "Subtract one nonessential; schedule humane contact.",
    }
}

fn house_tip(house: u32) -> &'static str {
    match house {
        1 => "Do one vitality boost (walk/sunlight).",
        2 => "Track one spend; tidy money inbox.",
        3 => "Send one brave message; small repetition.",
        4 => "Clean one corner; early wind-down.",
        5 => "10 min creative play; share 1 output.",
        6 => "One boring essential; tick it off.",
        7 => "Repair a thread; make one ask.",
        8 => "Document one risk; simplify one thing.",
        9 => "Read 10 mins; write one note.",
        10 => "Ship something visible; tiny scope.",
        11 => "Ping a collaborator; small loop.",
        12 => "Schedule quiet; subtract one distraction.",
        _ => DEFAULT_HOUSE_TIP,
    }
}

pub fn weak_planet_quests(planets: &[PlanetScore]) -> Vec<Quest> {
    planets
        .iter()
        .filter(|p| scales::is_weak(p.total))
        .map(|p| Quest {
            subject: p.id.to_string(),
            tip: planet_tip(p.id).to_string(),
        })
        .collect()
}

pub fn weak_house_quests(houses: &[HouseScore]) -> Vec<Quest> {
    houses
        .iter()
        .filter(|h| scales::is_weak(h.total))
        .map(|h| Quest {
            subject: house_ordinal(h.house),
            tip: house_tip(h.house).to_string(),
        })
        .collect()
}

/// Emoji strip for display, e.g. "👑 Boss Sun  ⭐ Top: Sun +2 more".
pub fn format_achievements(achievements: &[Achievement], max_display: usize) -> String {
    if achievements.is_empty() {
        return String::new();
    }

    let shown: Vec<String> = achievements
        .iter()
        .take(max_display)
        .map(|a| format!("{} {}", a.emoji, a.label))
        .collect();
    let badges = shown.join("  ");

    if achievements.len() > max_display {
        format!("{} +{} more", badges, achievements.len() - max_display)
    } else {
        badges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planets() -> Vec<PlanetScore> {
        vec![
            PlanetScore { id: PlanetId::Sun, total: 0.82 },
            PlanetScore { id: PlanetId::Moon, total: 0.3 },
            PlanetScore { id: PlanetId::Mars, total: 0.6 },
            PlanetScore { id: PlanetId::Venus, total: 0.82 },
        ]
    }

    #[test]
    fn test_planet_achievements_order() {
        let keys: Vec<String> = detect_planet_achievements(&planets())
            .into_iter()
            .map(|a| a.key)
            .collect();
        assert_eq!(keys, vec!["boss:Sun", "boss:Venus", "weak:Moon", "top:Sun"]);
    }

    #[test]
    fn test_no_achievements_for_empty_input() {
        assert!(detect_planet_achievements(&[]).is_empty());
        assert!(detect_house_achievements(&[]).is_empty());
    }

    #[test]
    fn test_nan_scores_never_unlock() {
        let p = [PlanetScore { id: PlanetId::Ketu, total: f64::NAN }];
        assert!(detect_planet_achievements(&p).is_empty());
        assert!(weak_planet_quests(&p).is_empty());
    }

    #[test]
    fn test_house_achievements_use_ordinals() {
        let houses = [
            HouseScore { house: 10, total: 0.9 },
            HouseScore { house: 2, total: 0.1 },
        ];
        let a = detect_house_achievements(&houses);
        assert_eq!(a[0].label, "Boss 10th");
        assert_eq!(a[1].key, "weak:2nd");
        assert_eq!(a[2].kind, AchievementKind::Top);
    }

    #[test]
    fn test_balanced_axis() {
        let mut houses = vec![
            HouseScore { house: 1, total: 0.52 },
            HouseScore { house: 7, total: 0.50 },
        ];
        assert!(balanced_axis(&houses).is_some());
        houses[1].total = 0.45;
        assert!(balanced_axis(&houses).is_none());
        assert!(balanced_axis(&houses[..1]).is_none());
    }

    #[test]
    fn test_quests() {
        let q = weak_planet_quests(&planets());
        assert_eq!(q.len(), 1);
        assert_eq!(q[0].subject, "Moon");
        assert_eq!(q[0].tip, "Fix sleep/wake & hydrate early.");

        let q = weak_house_quests(&[HouseScore { house: 6, total: 0.2 }, HouseScore { house: 13, total: 0.0 }]);
        assert_eq!(q[0].tip, "One boring essential; tick it off.");
        assert_eq!(q[1].tip, DEFAULT_HOUSE_TIP);
    }

    #[test]
    fn test_house_ordinal() {
        assert_eq!(house_ordinal(1), "1st");
        assert_eq!(house_ordinal(2), "2nd");
        assert_eq!(house_ordinal(3), "3rd");
        assert_eq!(house_ordinal(11), "11th");
        assert_eq!(house_ordinal(12), "12th");
        assert_eq!(house_ordinal(22), "22nd");
    }

    #[test]
    fn test_from_pillars_skips_non_planets() {
        let values = vec![
            PillarValue { pillar: "Sun".to_string(), value: 0.82 },
            PillarValue { pillar: "sthana".to_string(), value: 0.5 },
        ];
        let p = PlanetScore::from_pillars(&values);
        assert_eq!(p, vec![PlanetScore { id: PlanetId::Sun, total: 0.82 }]);
    }

    #[test]
    fn test_format_achievements() {
        let a = detect_planet_achievements(&planets());
        let s = format_achievements(&a, 2);
        assert!(s.starts_with("👑 Boss Sun  👑 Boss Venus"));
        assert!(s.ends_with("+2 more"));
        assert_eq!(format_achievements(&[], 3), "");
    }
}
