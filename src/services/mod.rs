//! Business services. Each service owns one aggregate, validates writes and
//! runs them in a single transaction.

pub mod catalog;
pub mod merchandising;

use crate::errors::ServiceError;
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ColumnTrait, Condition, DatabaseTransaction,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Page window for admin listings. `page` is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Zero-based index of the page for `Paginator::fetch_page`.
    pub fn index(&self) -> u64 {
        self.page - 1
    }

    /// Row offset of the page, `None` when it overflows a signed 64-bit `OFFSET`.
    pub fn offset(&self) -> Option<u64> {
        self.index()
            .checked_mul(self.per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

/// Commits a write transaction and records its outcome.
pub(crate) async fn commit(txn: DatabaseTransaction, operation: &'static str) -> Result<(), ServiceError> {
    let result = txn.commit().await;
    crate::db::record_transaction(operation, result.is_ok());
    result.map_err(Into::into)
}

/// Case-insensitive substring match on a column.
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(format!("%{}%", needle.to_lowercase()))
}

/// `OR` of [`contains_ci`] over every column, or `None` for a blank query.
pub(crate) fn search_condition<C: ColumnTrait>(
    columns: impl IntoIterator<Item = C>,
    query: Option<&str>,
) -> Option<Condition> {
    let needle = query.map(str::trim).filter(|q| !q.is_empty())?;
    Some(
        columns
            .into_iter()
            .fold(Condition::any(), |cond, column| {
                cond.add(contains_ci(column, needle))
            }),
    )
}

/// Trims a required string in place.
pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional string and turns blanks into `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in partial updates.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub(crate) fn already_exists(entity: &str, field: &str) -> String {
    format!("{} with this {} already exists.", entity, field)
}

pub(crate) fn missing_reference(id: i32) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        description: Option<Option<String>>,
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(null.description, Some(None));
        assert_eq!(set.description, Some(Some("x".to_string())));
    }

    #[test]
    fn page_request_is_one_based() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(PageRequest::new(3, 10).index(), 2);
    }

    #[test]
    fn optional_strings_are_normalized() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" abc ".into())), Some("abc".into()));
        assert_eq!(normalize_optional(None), None);

        let mut value = "  nombre ".to_string();
        trim_in_place(&mut value);
        assert_eq!(value, "nombre");
    }
}
