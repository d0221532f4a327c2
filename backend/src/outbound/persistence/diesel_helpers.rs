//! Shared helpers for the Diesel repository implementations.

use diesel::sql_types::Text;
use pagination::PageRequest;

use super::models::InvalidRow;

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(value: Text) -> Text;
}

/// `LIMIT`/`OFFSET` values for a page window.
pub fn page_bounds(request: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
    (i64::from(request.limit()), offset)
}

/// Convert a `COUNT(*)` result into a page total.
pub fn total_from_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Convert loaded rows, failing on the first invalid one.
pub fn collect_rows<R, T, E>(
    rows: Vec<R>,
    map_err: impl FnOnce(InvalidRow) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = InvalidRow>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 25, (25, 0))]
    #[case(3, 10, (10, 20))]
    fn page_bounds_follow_the_window(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: (i64, i64),
    ) {
        let request = PageRequest::new(page, limit).expect("valid window");
        assert_eq!(page_bounds(request), expected);
    }

    #[rstest]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(total_from_count(-1), 0);
        assert_eq!(total_from_count(42), 42);
    }
}
