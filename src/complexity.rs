//! SQL structural complexity
//!
//! Token counting over compiled SQL: JOIN clauses, CTE definitions and window
//! functions. These counters feed the optimization rules. This is pattern
//! matching, not parsing; keywords inside string literals may still count.

use crate::recommendation::ComplexityMetrics;
use crate::snapshot::{self, ModelKpis};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Complexity metric keys, as used by rules and KPI records
pub const JOIN_COUNT: &str = "join_count";
pub const CTE_COUNT: &str = "cte_count";
pub const WINDOW_FUNCTION_COUNT: &str = "window_function_count";

/// KPI fields that may carry a model's compiled SQL
const SQL_FIELDS: &[&str] = &["compiled_sql", "compiled_code"];

fn join_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(INNER|LEFT|RIGHT|FULL|CROSS)\s+JOIN\b").expect("static regex")
    })
}

fn with_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bWITH\b").expect("static regex"))
}

fn main_query_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(SELECT|INSERT|UPDATE|DELETE|MERGE)\b").expect("static regex")
    })
}

fn window_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bOVER\s*\(").expect("static regex"))
}

/// Structural counters for one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlComplexity {
    pub join_count: u32,
    pub cte_count: u32,
    pub window_function_count: u32,
}

impl SqlComplexity {
    /// Convert to the metric map consumed by rule matching
    pub fn to_metrics(&self) -> ComplexityMetrics {
        [
            (JOIN_COUNT, self.join_count),
            (CTE_COUNT, self.cte_count),
            (WINDOW_FUNCTION_COUNT, self.window_function_count),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), f64::from(v)))
        .collect()
    }
}

/// Remove `--` and `/* */` comments, leaving string literals intact
///
/// Block comments become a single space, line comments keep their newline.
/// An unclosed block comment swallows the rest of the input.
pub fn strip_sql_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q && prev != Some('\\') {
                quote = None;
            }
            prev = Some(ch);
            continue;
        }

        let next = chars.peek().copied();
        match (ch, next) {
            ('\'' | '"', _) if prev != Some('\\') => {
                quote = Some(ch);
                out.push(ch);
            }
            ('/', Some('*')) => {
                chars.next();
                let mut last = None;
                let mut closed = false;
                for c in chars.by_ref() {
                    if last == Some('*') && c == '/' {
                        closed = true;
                        break;
                    }
                    last = Some(c);
                }
                if closed {
                    out.push(' ');
                }
                prev = Some(' ');
                continue;
            }
            ('-', Some('-')) => {
                if chars.by_ref().any(|c| c == '\n') {
                    out.push('\n');
                }
                prev = Some('\n');
                continue;
            }
            _ => out.push(ch),
        }
        prev = Some(ch);
    }

    out
}

/// Count INNER/LEFT/RIGHT/FULL/CROSS JOIN clauses
///
/// A bare `JOIN` is not counted.
pub fn count_joins(sql: &str) -> u32 {
    join_pattern().find_iter(sql).count() as u32
}

/// Count CTE definitions in the query's WITH clause
///
/// One for the WITH itself plus one per top-level comma before the main
/// SELECT/INSERT/UPDATE/DELETE/MERGE.
///
/// # Example
/// ```
/// use modeldiff::complexity::count_ctes;
///
/// let sql = "WITH a AS (SELECT 1, 2), b AS (SELECT 3) SELECT x, y FROM a JOIN b";
/// assert_eq!(count_ctes(sql), 2);
/// assert_eq!(count_ctes("SELECT 1"), 0);
/// ```
pub fn count_ctes(sql: &str) -> u32 {
    let Some(with) = with_pattern().find(sql) else {
        return 0;
    };
    let clause = &sql[with.end()..];

    let mut count = 1;
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (idx, ch) in clause.char_indices() {
        if let Some(q) = quote {
            if ch == q && prev != Some('\\') {
                quote = None;
            }
        } else {
            match ch {
                '\'' | '"' if prev != Some('\\') => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' if depth == 0 => count += 1,
                c if depth == 0
                    && c.is_ascii_alphabetic()
                    && !prev.is_some_and(is_identifier_char)
                    && main_query_pattern().is_match(&clause[idx..]) =>
                {
                    break;
                }
                _ => {}
            }
        }
        prev = Some(ch);
    }

    count
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count window functions (`OVER (` clauses)
pub fn count_window_functions(sql: &str) -> u32 {
    window_pattern().find_iter(sql).count() as u32
}

/// Extract all complexity counters from raw SQL
///
/// Comments are stripped first. Empty SQL yields all zeros.
pub fn extract_sql_complexity(sql: &str) -> SqlComplexity {
    if sql.trim().is_empty() {
        return SqlComplexity::default();
    }

    let clean = strip_sql_comments(sql);
    let complexity = SqlComplexity {
        join_count: count_joins(&clean),
        cte_count: count_ctes(&clean),
        window_function_count: count_window_functions(&clean),
    };

    tracing::debug!(
        "SQL complexity: {} JOINs, {} CTEs, {} window functions",
        complexity.join_count,
        complexity.cte_count,
        complexity.window_function_count
    );

    complexity
}

/// Complexity metrics per model, read from a snapshot
///
/// Uses the recorded `join_count`/`cte_count`/`window_function_count` fields,
/// defaulting missing ones to 0. A record with none of them but with
/// `compiled_sql` (or `compiled_code`) is measured from that SQL instead.
pub fn complexity_from_snapshot(models: &ModelKpis) -> BTreeMap<String, ComplexityMetrics> {
    models
        .iter()
        .map(|(model_name, kpis)| {
            let counters = [JOIN_COUNT, CTE_COUNT, WINDOW_FUNCTION_COUNT];
            let recorded = counters
                .iter()
                .any(|key| snapshot::numeric(kpis, key).is_some());

            let sql = SQL_FIELDS
                .iter()
                .find_map(|field| kpis.get(*field).and_then(serde_json::Value::as_str));

            let metrics = match sql {
                Some(sql) if !recorded => {
                    tracing::debug!("Extracting complexity from compiled SQL for {}", model_name);
                    extract_sql_complexity(sql).to_metrics()
                }
                _ => counters
                    .iter()
                    .map(|key| {
                        let value = snapshot::numeric(kpis, key).unwrap_or(0.0);
                        (key.to_string(), value)
                    })
                    .collect(),
            };

            (model_name.clone(), metrics)
        })
        .collect()
}
