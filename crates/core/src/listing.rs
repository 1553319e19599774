//! List endpoint helpers: pagination, ordering and search terms.
//!
//! Repositories build their SQL from these values; nothing here touches the
//! database.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows returned by a list endpoint.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum number of rows a list endpoint will return.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// A validated `ORDER BY` column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: &'static str,
    pub descending: bool,
}

impl SortOrder {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parse an `ordering` parameter such as `due_date` or `-created_at`.
    ///
    /// Only names in `allowed` are accepted; anything else (including a
    /// missing or blank value) yields `default`. The returned field is
    /// always one of the `'static` names from `allowed`, so it is safe to
    /// interpolate into SQL.
    pub fn parse(raw: Option<&str>, allowed: &[&'static str], default: SortOrder) -> SortOrder {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return default;
        };
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        allowed
            .iter()
            .find(|f| **f == name)
            .map(|field| SortOrder {
                field: *field,
                descending,
            })
            .unwrap_or(default)
    }

    /// SQL direction keyword.
    pub fn direction(&self) -> &'static str {
        if self.descending {
            "DESC"
        } else {
            "ASC"
        }
    }
}

// ---------------------------------------------------------------------------
// Search terms
// ---------------------------------------------------------------------------

/// Escape character used in `LIKE ... ESCAPE` clauses built from [`like_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Trim a search term, returning `None` when nothing remains.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build a `%term%` substring pattern with LIKE wildcards escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["created_at", "due_date"];
    const DEFAULT: SortOrder = SortOrder::desc("created_at");

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 100, 500), 100);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(900), 100, 500), 500);
        assert_eq!(clamp_limit(Some(0), 100, 500), 1);
        assert_eq!(clamp_limit(Some(-4), 100, 500), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn ordering_parses_direction_prefix() {
        assert_eq!(
            SortOrder::parse(Some("due_date"), FIELDS, DEFAULT),
            SortOrder::asc("due_date")
        );
        assert_eq!(
            SortOrder::parse(Some("-due_date"), FIELDS, DEFAULT),
            SortOrder::desc("due_date")
        );
    }

    #[test]
    fn unknown_ordering_falls_back_to_default() {
        assert_eq!(SortOrder::parse(Some("password"), FIELDS, DEFAULT), DEFAULT);
        assert_eq!(
            SortOrder::parse(Some("created_at; DROP TABLE tasks"), FIELDS, DEFAULT),
            DEFAULT
        );
        assert_eq!(SortOrder::parse(Some("  "), FIELDS, DEFAULT), DEFAULT);
        assert_eq!(SortOrder::parse(None, FIELDS, DEFAULT), DEFAULT);
    }

    #[test]
    fn normalize_search_drops_blank_terms() {
        assert_eq!(normalize_search(Some("  ")), None);
        assert_eq!(normalize_search(Some(" fix ")), Some("fix".to_string()));
        assert_eq!(normalize_search(None), None);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bug"), "%bug%");
        assert_eq!(like_pattern("50%_done"), "%50\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
