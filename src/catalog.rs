//! Catalog view model: category filtering over the stored list.
//!
//! Pure function of (list, filter); the store's newest-first ordering is
//! preserved and the distinct categories come out in order of first
//! occurrence so a selector can be rendered deterministically.

use crate::domain::Exercise;

#[derive(Clone, Debug)]
pub struct CatalogView {
    pub exercises: Vec<Exercise>,
    pub categories: Vec<String>,
}

/// Build the displayed catalog. An exact category match keeps an exercise
/// when a filter is set; no filter returns the list unchanged.
pub fn build_catalog(list: Vec<Exercise>, filter: Option<&str>) -> CatalogView {
    let categories = distinct_categories(&list);
    let exercises = match filter {
        Some(cat) => list.into_iter().filter(|e| e.category == cat).collect(),
        None => list,
    };
    CatalogView { exercises, categories }
}

/// Distinct categories in order of first occurrence.
pub fn distinct_categories(list: &[Exercise]) -> Vec<String> {
    let mut seen = Vec::new();
    for ex in list {
        if !seen.iter().any(|c| c == &ex.category) {
            seen.push(ex.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ex(id: i64, category: &str) -> Exercise {
        Exercise {
            id,
            title: format!("t{id}"),
            statement: format!("s{id}"),
            correction: format!("c{id}"),
            category: category.into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, id as u32 % 60).unwrap(),
        }
    }

    #[test]
    fn filter_keeps_only_matching_items_in_order() {
        let list = vec![ex(3, "maths"), ex(2, "histoire"), ex(1, "maths")];
        let view = build_catalog(list, Some("maths"));
        let ids: Vec<i64> = view.exercises.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn absent_category_yields_empty_sequence() {
        let list = vec![ex(3, "maths"), ex(2, "histoire")];
        let view = build_catalog(list, Some("physique"));
        assert!(view.exercises.is_empty());
        // Categories still reflect the full list for the selector.
        assert_eq!(view.categories, vec!["maths", "histoire"]);
    }

    #[test]
    fn no_filter_returns_the_list_unchanged() {
        let list = vec![ex(3, "maths"), ex(2, "histoire"), ex(1, "maths")];
        let view = build_catalog(list.clone(), None);
        assert_eq!(view.exercises, list);
    }

    #[test]
    fn categories_are_distinct_in_first_occurrence_order() {
        let list = vec![ex(4, "b"), ex(3, "a"), ex(2, "b"), ex(1, "c")];
        assert_eq!(distinct_categories(&list), vec!["b", "a", "c"]);
    }
}
