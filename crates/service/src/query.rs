//! Small query-building helpers shared by the listing services.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

/// Case-insensitive substring match: `lower(col) LIKE '%needle%'`.
/// `%`, `_` and `\` in the needle match literally.
pub fn icontains<C: IntoColumnRef>(col: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `Some(trimmed)` when the filter carries any text.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn builds_lower_like() {
        let sql = models::job::Entity::find()
            .filter(icontains((models::job::Entity, models::job::Column::Title), "Rust"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("jobs"."title") LIKE '%rust%'"#), "{sql}");
    }

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(non_blank(Some("  x ")), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
