//! Dynamically filtered, paginated listings.

use gymhub_domain::page::{Page, PageRequest};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

/// `%needle%` with the `LIKE` wildcards of `needle` escaped by `\`.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append ` AND <column> LIKE '%needle%'`.
pub(crate) fn push_like(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, needle: &str) {
    builder
        .push(" AND ")
        .push(column)
        .push(" LIKE ")
        .push_bind(like_pattern(needle))
        .push(" ESCAPE '\\'");
}

/// Count and fetch one page of `table` rows.
///
/// `filters` appends ` AND …` conditions; it runs once for the count query
/// and once for the page query.
pub(crate) async fn fetch_page<T, F>(
    pool: &SqlitePool,
    table: &str,
    order_by: &str,
    page: PageRequest,
    filters: F,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    F: Fn(&mut QueryBuilder<'_, Sqlite>) + Sync,
{
    let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table} WHERE 1 = 1"));
    filters(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::new(format!("SELECT * FROM {table} WHERE 1 = 1"));
    filters(&mut select);
    select
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
    let rows: Vec<T> = select.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(rows, page, u64::try_from(total).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_needle_in_wildcards() {
        assert_eq!(like_pattern("yoga"), "%yoga%");
    }

    #[test]
    fn should_escape_like_wildcards() {
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
