//! Translation of list filters into a SQL `WHERE` condition.

use chrono::{Duration, NaiveDate};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use crate::medications::classification::{LOW_STOCK_THRESHOLD, NEAR_EXPIRY_HORIZON_DAYS};
use crate::medications::entity::Column;
use crate::medications::models::MedicationFilter;

/// Compile a filter set into one conjunctive condition. All active filters
/// are ANDed; `today` anchors the date comparisons.
pub(crate) fn compile(filter: &MedicationFilter, today: NaiveDate) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Description).ilike(format!("%{search}%")));
    }

    if let Some(brand) = filter.brand.as_deref().filter(|b| !b.is_empty()) {
        condition = condition.add(Expr::col(Column::Brand).ilike(format!("%{brand}%")));
    }

    if let Some(type_id) = filter.type_id {
        condition = condition.add(Column::TypeId.eq(type_id));
    }

    if filter.low_stock == Some(true) {
        condition = condition.add(Column::Stock.lte(LOW_STOCK_THRESHOLD));
    }

    // nearExpiry and expired compete for a single expiry clause. The later
    // assignment wins, so expired overrides nearExpiry when both are set.
    let mut expiry_clause: Option<SimpleExpr> = None;
    if filter.near_expiry == Some(true) {
        let horizon = today + Duration::days(NEAR_EXPIRY_HORIZON_DAYS);
        expiry_clause = Some(Column::ExpiryDate.between(today, horizon));
    }
    if filter.expired == Some(true) {
        expiry_clause = Some(Column::ExpiryDate.lt(today));
    }
    if let Some(clause) = expiry_clause {
        condition = condition.add(clause);
    }

    condition
}

#[cfg(test)]
mod tests {
    use super::compile;
    use crate::medications::entity::Entity;
    use crate::medications::models::MedicationFilter;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn sql(filter: &MedicationFilter) -> String {
        Entity::find()
            .filter(compile(filter, today()))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_no_filters_produces_no_where_clause() {
        let query = sql(&MedicationFilter::default());
        assert!(!query.contains("WHERE"), "unexpected WHERE in: {query}");
    }

    #[test]
    fn test_search_uses_ilike_with_wildcards() {
        let filter = MedicationFilter {
            search: Some("parace".to_string()),
            ..Default::default()
        };
        let query = sql(&filter);
        assert!(query.contains(r#""description" ILIKE '%parace%'"#), "{query}");
    }

    #[test]
    fn test_empty_search_is_ignored() {
        let filter = MedicationFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(!sql(&filter).contains("WHERE"));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = MedicationFilter {
            brand: Some("Genfar".to_string()),
            low_stock: Some(true),
            ..Default::default()
        };
        let query = sql(&filter);
        assert!(query.contains(r#""brand" ILIKE '%Genfar%'"#), "{query}");
        assert!(query.contains(r#""stock" <= 10"#), "{query}");
        assert!(query.contains(" AND "), "{query}");
    }

    #[test]
    fn test_near_expiry_is_inclusive_window() {
        let filter = MedicationFilter {
            near_expiry: Some(true),
            ..Default::default()
        };
        let query = sql(&filter);
        assert!(
            query.contains(r#""expiry_date" BETWEEN '2025-06-15' AND '2025-07-15'"#),
            "{query}"
        );
    }

    #[test]
    fn test_expired_is_strict_past() {
        let filter = MedicationFilter {
            expired: Some(true),
            ..Default::default()
        };
        let query = sql(&filter);
        assert!(query.contains(r#""expiry_date" < '2025-06-15'"#), "{query}");
    }

    #[test]
    fn test_expired_overrides_near_expiry() {
        let filter = MedicationFilter {
            near_expiry: Some(true),
            expired: Some(true),
            ..Default::default()
        };
        let query = sql(&filter);
        assert!(query.contains(r#""expiry_date" < '2025-06-15'"#), "{query}");
        assert!(!query.contains("BETWEEN"), "{query}");
    }

    #[test]
    fn test_false_flags_add_nothing() {
        let filter = MedicationFilter {
            low_stock: Some(false),
            near_expiry: Some(false),
            expired: Some(false),
            ..Default::default()
        };
        assert!(!sql(&filter).contains("WHERE"));
    }
}
