use super::error::SearchError;
use super::query::{like_pattern, parse_query, SearchKind};
use crate::db::Database;
use rusqlite::{params_from_iter, Connection, ToSql};
use serde::Serialize;
use tracing::debug;

/// One search hit
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    pub created_at: String,
}

/// Searchable columns per kind. Every term must hit one of them.
fn source(kind: SearchKind) -> (&'static str, &'static str, &'static [&'static str]) {
    match kind {
        SearchKind::Stream => ("streams", "name", &["name", "COALESCE(description, '')"]),
        SearchKind::Drop => ("drops", "title", &["title"]),
        SearchKind::Asset => ("assets", "title", &["title"]),
    }
}

fn search_kind(
    conn: &Connection,
    kind: SearchKind,
    patterns: &[String],
    limit: i64,
) -> rusqlite::Result<Vec<SearchResult>> {
    let (table, title_column, columns) = source(kind);
    let clauses: Vec<String> = (1..=patterns.len())
        .map(|i| {
            let alternatives: Vec<String> = columns
                .iter()
                .map(|column| format!("fold_case({column}) LIKE ?{i} ESCAPE '\\'"))
                .collect();
            format!("({})", alternatives.join(" OR "))
        })
        .collect();
    let sql = format!(
        "SELECT id, {title_column}, created_at FROM {table} WHERE {} \
         ORDER BY created_at DESC, id LIMIT ?{}",
        clauses.join(" AND "),
        patterns.len() + 1
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut values: Vec<&dyn ToSql> = Vec::with_capacity(patterns.len() + 1);
    for pattern in patterns {
        values.push(pattern);
    }
    values.push(&limit);
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(SearchResult {
            kind,
            id: row.get(0)?,
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;
    rows.collect()
}

/// Case-insensitive substring search over streams, drops and assets.
///
/// Results are grouped by kind (streams, drops, assets), newest first
/// within a kind, and capped at `limit` overall.
pub async fn search(db: &Database, query: &str, limit: i64) -> Result<Vec<SearchResult>, SearchError> {
    let parsed = parse_query(query)?;
    let limit = limit.max(1);
    let patterns: Vec<String> = parsed.terms.iter().map(|t| like_pattern(t)).collect();
    let results = db
        .call(move |conn| {
            let mut results = Vec::new();
            for kind in &parsed.kinds {
                let remaining = limit - i64::try_from(results.len()).unwrap_or(limit);
                if remaining <= 0 {
                    break;
                }
                results.extend(search_kind(conn, *kind, &patterns, remaining)?);
            }
            Ok::<_, SearchError>(results)
        })
        .await?;
    debug!("Search '{}' returned {} results", query, results.len());
    Ok(results)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
