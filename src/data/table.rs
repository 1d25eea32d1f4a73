//! Pagination of the employee table for the Employees tab.

use polars::prelude::*;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of rendered cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

impl TablePage {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }

    /// 1-based inclusive range of rows shown, for the "rows x-y of n" label.
    pub fn row_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = self.page * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }
}

/// Splits a DataFrame into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct TablePager {
    page_size: usize,
}

impl Default for TablePager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TablePager {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size).max(1)
    }

    /// Render page `page` of `df`. Out-of-range pages clamp to the last page.
    pub fn page(&self, df: &DataFrame, page: usize) -> TablePage {
        let total_rows = df.height();
        let page_count = self.page_count(total_rows);
        let page = page.min(page_count - 1);
        let offset = page * self.page_size;

        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let slice = df.slice(offset as i64, self.page_size);
        let rows = (0..slice.height())
            .map(|i| {
                slice
                    .get_columns()
                    .iter()
                    .map(|col| col.get(i).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        TablePage {
            columns,
            rows,
            page,
            page_count,
            page_size: self.page_size,
            total_rows,
        }
    }
}

fn format_cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(n: usize) -> DataFrame {
        let names: Vec<String> = (0..n).map(|i| format!("Employee {i}")).collect();
        let ages: Vec<Option<i64>> = (0..n)
            .map(|i| if i % 4 == 3 { None } else { Some(30 + i as i64) })
            .collect();
        df!("Employee Name" => names, "Age" => ages).unwrap()
    }

    #[test]
    fn first_page_holds_page_size_rows() {
        let page = TablePager::new(10).page(&people(25), 0);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_rows, 25);
        assert_eq!(page.columns, vec!["Employee Name", "Age"]);
        assert_eq!(page.rows[0], vec!["Employee 0".to_string(), "30".to_string()]);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn last_page_is_partial_and_nulls_are_blank() {
        let page = TablePager::new(10).page(&people(25), 2);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[3], vec!["Employee 23".to_string(), String::new()]);
        assert_eq!(page.row_range(), Some((21, 25)));
        assert!(!page.has_next());
    }

    #[test]
    fn page_past_end_clamps() {
        let page = TablePager::new(10).page(&people(25), 99);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn empty_table_has_single_empty_page() {
        let page = TablePager::default().page(&people(0), 3);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.row_range(), None);
    }

    #[test]
    fn zero_page_size_is_bumped_to_one() {
        let pager = TablePager::new(0);
        assert_eq!(pager.page_count(3), 3);
        let page = pager.page(&people(3), 1);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.row_range(), Some((2, 2)));
    }
}
