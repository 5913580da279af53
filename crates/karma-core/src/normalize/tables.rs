//! Generic tables for the table view.
//!
//! Accepted table shapes:
//! - `{title?, head|headers: [...], rows|data: [...]}`
//! - array of arrays (headers become `Col 1..n`)
//! - array of objects (headers are the union of keys, first-seen order)
//! - columnar object `{colA: [...], colB: [...]}`

use crate::coerce::{field, number_text, text};
use crate::collection::to_seq;
use crate::norm::{HouseCusp, Position, Table};
use serde_json::{Map, Value};

const DASH: &str = "—";

fn cells(row: &Value) -> Vec<String> {
    match row {
        Value::Array(items) => items.iter().map(|c| text(Some(c))).collect(),
        Value::Object(map) => map.values().map(|c| text(Some(c))).collect(),
        Value::Null => Vec::new(),
        other => vec![text(Some(other))],
    }
}

fn has_array(map: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| map.get(*k).map(Value::is_array).unwrap_or(false))
}

/// Build a table from any supported shape. Tables without rows are dropped.
pub(super) fn table_from(node: &Value, title: &str) -> Option<Table> {
    let table = match node {
        Value::Object(map) if has_array(map, &["head", "headers", "rows", "data"]) => Table {
            title: field(Some(node), &["title"])
                .map(|t| text(Some(t)))
                .unwrap_or_else(|| title.to_string()),
            head: to_seq(field(Some(node), &["head", "headers"]))
                .into_iter()
                .map(|h| text(Some(h)))
                .collect(),
            rows: to_seq(field(Some(node), &["rows", "data"]))
                .into_iter()
                .map(cells)
                .collect(),
        },
        Value::Array(rows) if rows.iter().all(Value::is_array) => {
            let rows: Vec<Vec<String>> = rows.iter().map(cells).collect();
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            Table {
                title: title.to_string(),
                head: (1..=width).map(|i| format!("Col {}", i)).collect(),
                rows,
            }
        }
        Value::Array(rows) if rows.iter().all(Value::is_object) => {
            let mut head: Vec<String> = Vec::new();
            for row in rows.iter().filter_map(Value::as_object) {
                for key in row.keys() {
                    if !head.contains(key) {
                        head.push(key.clone());
                    }
                }
            }
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|row| head.iter().map(|k| text(row.get(k))).collect::<Vec<_>>())
                .collect();
            Table {
                title: title.to_string(),
                head,
                rows,
            }
        }
        Value::Object(map) if !map.is_empty() && map.values().all(Value::is_array) => {
            let head: Vec<String> = map.keys().cloned().collect();
            let len = map
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .max()
                .unwrap_or(0);
            let rows: Vec<Vec<String>> = (0..len)
                .map(|i| map.values().map(|col| text(col.get(i))).collect::<Vec<_>>())
                .collect();
            Table {
                title: title.to_string(),
                head,
                rows,
            }
        }
        _ => return None,
    };

    (!table.rows.is_empty()).then_some(table)
}

/// Tables from `tables | tabular | table`, or synthesized from positions
/// and then houses when the payload carries none.
pub(super) fn collect(raw: &Value, positions: &[Position], houses: &[HouseCusp]) -> Vec<Table> {
    let mut tables = Vec::new();

    match field(Some(raw), &["tables", "tabular", "table"]) {
        Some(Value::Array(nodes)) => {
            tables.extend(
                nodes
                    .iter()
                    .enumerate()
                    .filter_map(|(i, n)| table_from(n, &format!("Table {}", i + 1))),
            );
        }
        Some(root) => {
            if let Some(map) = root.as_object() {
                match table_from(root, "Table") {
                    Some(single) => tables.push(single),
                    None => tables.extend(map.iter().enumerate().filter_map(|(i, (key, node))| {
                        let title = if key.is_empty() {
                            format!("Table {}", i + 1)
                        } else {
                            key.clone()
                        };
                        table_from(node, &title)
                    })),
                }
            }
        }
        None => {}
    }

    if tables.is_empty() && !positions.is_empty() {
        tables.push(positions_table(positions));
    }
    if tables.is_empty() && !houses.is_empty() {
        tables.push(houses_table(houses));
    }

    tables
}

fn or_dash(s: Option<&str>) -> String {
    match s {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DASH.to_string(),
    }
}

fn positions_table(positions: &[Position]) -> Table {
    Table {
        title: "Planetary Positions".to_string(),
        head: ["Body", "Sign", "Degree", "House", "Retro", "Nakshatra"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: positions
            .iter()
            .map(|p| {
                vec![
                    p.body.clone(),
                    or_dash(Some(p.sign.as_str())),
                    format!("{:.2}", p.degree),
                    p.house.map(|h| h.to_string()).unwrap_or_else(|| DASH.to_string()),
                    if p.retro { "R".to_string() } else { String::new() },
                    or_dash(p.nakshatra.as_deref()),
                ]
            })
            .collect(),
    }
}

fn houses_table(houses: &[HouseCusp]) -> Table {
    Table {
        title: "Houses".to_string(),
        head: ["House", "Sign", "Lord", "Degree"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: houses
            .iter()
            .map(|h| {
                vec![
                    h.house.to_string(),
                    or_dash(h.sign.as_deref()),
                    or_dash(h.lord.as_deref()),
                    number_text(h.degree),
                ]
            })
            .collect(),
    }
}
