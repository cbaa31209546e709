use serde::{Deserialize, Serialize};

/// Параметры страницы списка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Нормализует запрошенную страницу: меньше 1 -> 1, за пределами -> последняя
    ///
    /// Для пустого списка страница всегда 1.
    pub fn clamp(requested: Option<i64>, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page);
        let page = (requested.unwrap_or(1).max(1) as u64).min(total_pages.max(1));
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Смещение для LIMIT/OFFSET
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Страница произвольного списка
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let p = Pagination::clamp(None, 7, 15);
        assert_eq!((p.page, p.total_pages, p.offset()), (1, 3, 0));

        let p = Pagination::clamp(Some(-4), 7, 15);
        assert_eq!(p.page, 1);

        let p = Pagination::clamp(Some(9), 7, 15);
        assert_eq!((p.page, p.offset()), (3, 14));

        let p = Pagination::clamp(Some(5), 10, 0);
        assert_eq!((p.page, p.total_pages, p.offset()), (1, 0, 0));
    }

    #[test]
    fn test_clamp_huge_page() {
        let p = Pagination::clamp(Some(i64::MAX), 10, 0);
        assert_eq!((p.page, p.offset()), (1, 0));

        let p = Pagination::clamp(Some(i64::MAX), 10, 25);
        assert_eq!((p.page, p.offset()), (3, 20));

        let p = Pagination::clamp(Some(i64::MIN), 10, 25);
        assert_eq!((p.page, p.offset()), (1, 0));
    }
}
