//! Terminal formatting for strength buckets and tables.

use karma_core::scales::{self, ScoreBucket};
use owo_colors::{AnsiColors, OwoColorize};

/// Width of strength bars, in cells.
const BAR_WIDTH: usize = 20;

pub const HR: &str = "------------------------------------------------------------";

/// Terminal colour for a badge palette name.
pub fn palette_color(palette: &str) -> Option<AnsiColors> {
    match palette {
        "emerald" => Some(AnsiColors::Green),
        "violet" => Some(AnsiColors::Magenta),
        "amber" => Some(AnsiColors::Yellow),
        "rose" => Some(AnsiColors::Red),
        "slate" => Some(AnsiColors::BrightBlack),
        _ => None,
    }
}

/// Bucket name padded to a fixed width, coloured by its badge palette.
pub fn bucket_tag(bucket: ScoreBucket, color: bool) -> String {
    let tag = format!("{:<7}", bucket.as_str());
    match palette_color(bucket.badge_class()) {
        Some(c) if color => tag.color(c).to_string(),
        _ => tag,
    }
}

/// ASCII bar for a 0..1 score: `[#########-----------]`.
pub fn bar(score: f64) -> String {
    let filled = if score.is_finite() {
        (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Score with bar and bucket tag, e.g. `0.82 [################----] boss`.
pub fn score_line(score: f64, color: bool) -> String {
    let bucket = scales::bucket(score);
    format!("{:>5} {} {}", fmt_score(score), bar(score), bucket_tag(bucket, color))
        .trim_end()
        .to_string()
}

pub fn fmt_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.2}", score)
    } else {
        "n/a".to_string()
    }
}

/// Colour only on a terminal, and never when `NO_COLOR` is set.
pub fn color_enabled() -> bool {
    use std::io::IsTerminal;
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".bright_red().bold(), message);
}

pub fn header(title: &str, color: bool) -> String {
    if color {
        format!("{}\n{}", title.bold(), HR.dimmed())
    } else {
        format!("{}\n{}", title, HR)
    }
}

/// Render rows as left-aligned columns separated by two spaces.
pub fn table(head: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = head.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = cell.chars().count();
            match widths.get_mut(i) {
                Some(cur) => *cur = (*cur).max(w),
                None => widths.push(w),
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let pad = widths[i].saturating_sub(c.chars().count());
                format!("{}{}", c, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(head.to_vec())];
    out.extend(rows.iter().map(|r| line(r.iter().map(String::as_str).collect())));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fill() {
        assert_eq!(bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(bar(1.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(bar(0.5), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(7.0), bar(1.0));
        assert_eq!(bar(f64::NAN), bar(0.0));
    }

    #[test]
    fn test_plain_bucket_tag() {
        assert_eq!(bucket_tag(ScoreBucket::Boss, false), "boss   ");
        assert_eq!(bucket_tag(ScoreBucket::Unknown, false), "unknown");
    }

    #[test]
    fn test_every_bucket_palette_has_a_color() {
        let buckets = [
            ScoreBucket::Boss,
            ScoreBucket::Steady,
            ScoreBucket::Boost,
            ScoreBucket::Support,
            ScoreBucket::Unknown,
        ];
        for b in buckets {
            assert!(palette_color(b.badge_class()).is_some(), "{:?}", b);
            let tag = bucket_tag(b, true);
            assert!(tag.contains(b.as_str()));
            assert_ne!(tag, bucket_tag(b, false));
        }
        assert!(palette_color("teal").is_none());
    }

    #[test]
    fn test_score_line_plain() {
        assert_eq!(
            score_line(0.5, false),
            format!(" 0.50 [{}{}] boost", "#".repeat(10), "-".repeat(10))
        );
        assert!(score_line(f64::NAN, false).starts_with("  n/a"));
    }

    #[test]
    fn test_table_alignment() {
        let t = table(&["City", "km"], &[vec!["Rome".to_string(), "12.0".to_string()]]);
        assert_eq!(t, "City  km\nRome  12.0");
    }
}
