// file: src/models/performance.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LawyerPerformance {
    pub lawyer_id: String,
    pub lawyer_name: String,
    pub total_tasks: i64,
    pub total_cases: i64,
    pub completed_tasks: i64,
    pub decided_cases: i64,
}

impl LawyerPerformance {
    pub fn has_content(&self) -> bool {
        self.total_tasks > 0 || self.total_cases > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformancePage {
    pub rows: Vec<LawyerPerformance>,
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
    pub pages_with_content: Vec<usize>,
}

impl PerformancePage {
    /// Slices an ordered list of rows into the requested page.
    pub fn paginate(all: Vec<LawyerPerformance>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = std::cmp::max(1, all.len().div_ceil(per_page));

        let mut pages_with_content: Vec<usize> = all
            .iter()
            .enumerate()
            .filter(|(_, row)| row.has_content())
            .map(|(index, _)| index / per_page + 1)
            .collect();
        pages_with_content.dedup();

        let rows = if page == 0 {
            Vec::new()
        } else {
            all.into_iter().skip((page - 1) * per_page).take(per_page).collect()
        };

        Self { rows, page, total_pages, pages_with_content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: usize, tasks: i64) -> LawyerPerformance {
        LawyerPerformance {
            lawyer_id: format!("l{}", id),
            lawyer_name: format!("Lawyer {}", id),
            total_tasks: tasks,
            total_cases: 0,
            completed_tasks: 0,
            decided_cases: 0,
        }
    }

    #[test]
    fn test_paginate_counts_pages() {
        let rows: Vec<_> = (0..12).map(|i| row(i, if i == 11 { 2 } else { 0 })).collect();
        let page = PerformancePage::paginate(rows, 3, 5);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.pages_with_content, vec![3]);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let page = PerformancePage::paginate(Vec::new(), 1, 5);
        assert_eq!(page.total_pages, 1);
        assert!(page.rows.is_empty());
        assert!(page.pages_with_content.is_empty());
    }

    #[test]
    fn test_paginate_out_of_range() {
        let rows: Vec<_> = (0..3).map(|i| row(i, 1)).collect();
        assert!(PerformancePage::paginate(rows.clone(), 0, 5).rows.is_empty());
        assert!(PerformancePage::paginate(rows, 4, 5).rows.is_empty());
    }
}
