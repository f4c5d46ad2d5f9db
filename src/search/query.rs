use super::error::SearchError;
use serde::{Deserialize, Serialize};

/// What a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Stream,
    Drop,
    Asset,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Stream, SearchKind::Drop, SearchKind::Asset];

    pub fn parse(value: &str) -> Result<Self, SearchError> {
        match value.to_lowercase().as_str() {
            "stream" | "streams" => Ok(SearchKind::Stream),
            "drop" | "drops" => Ok(SearchKind::Drop),
            "asset" | "assets" => Ok(SearchKind::Asset),
            _ => Err(SearchError::UnknownKind(value.to_string())),
        }
    }
}

/// A parsed query: free-text terms plus the kinds to look in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Lowercased terms; every term must match
    pub terms: Vec<String>,
    /// Kinds to search, in result order
    pub kinds: Vec<SearchKind>,
}

/// Parse a query string.
///
/// Whitespace separates terms. `kind:stream` (repeatable, or
/// comma-separated) narrows the kinds searched. A query needs at least one
/// free-text term.
pub fn parse_query(input: &str) -> Result<SearchQuery, SearchError> {
    let mut terms = Vec::new();
    let mut kinds: Vec<SearchKind> = Vec::new();

    for token in input.split_whitespace() {
        if let Some(filter) = token.strip_prefix("kind:") {
            for name in filter.split(',').filter(|n| !n.is_empty()) {
                let kind = SearchKind::parse(name)?;
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        } else {
            terms.push(token.to_lowercase());
        }
    }

    if terms.is_empty() {
        return Err(SearchError::ParseError(
            "query needs at least one search term".to_string(),
        ));
    }
    if kinds.is_empty() {
        kinds = SearchKind::ALL.to_vec();
    } else {
        kinds.sort_by_key(|kind| SearchKind::ALL.iter().position(|k| k == kind));
    }
    Ok(SearchQuery { terms, kinds })
}

/// `LIKE` pattern for a substring match, escaping `%`, `_` and `\`.
pub(super) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms() {
        let query = parse_query("  Harbour   NIGHT ").unwrap();
        assert_eq!(query.terms, vec!["harbour", "night"]);
        assert_eq!(query.kinds, SearchKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_kind_filter() {
        let query = parse_query("kind:asset,stream harbour").unwrap();
        assert_eq!(query.kinds, vec![SearchKind::Stream, SearchKind::Asset]);
        assert_eq!(query.terms, vec!["harbour"]);

        let query = parse_query("kind:drops kind:drop x").unwrap();
        assert_eq!(query.kinds, vec![SearchKind::Drop]);
    }

    #[test]
    fn test_parse_rejects_empty_and_unknown() {
        assert!(matches!(parse_query("   "), Err(SearchError::ParseError(_))));
        assert!(matches!(
            parse_query("kind:stream"),
            Err(SearchError::ParseError(_))
        ));
        assert!(matches!(
            parse_query("kind:video cats"),
            Err(SearchError::UnknownKind(k)) if k == "video"
        ));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
