use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1 起算，超出範圍時夾到最後一頁
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// 已經整批抓回來的清單，在前端切頁
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let slice = if start < end { &items[start..end] } else { &[] };

    Page {
        items: slice.to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// 分頁列上顯示的頁碼區塊，例如每 5 頁一組
pub fn page_window(current: usize, total_pages: usize, window: usize) -> Vec<usize> {
    let window = window.max(1);
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);
    let first = ((current - 1) / window) * window + 1;
    let last = (first + window - 1).min(total_pages);
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(&items, 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (1..=23).collect();
        let last = paginate(&items, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.has_next());

        let first = paginate(&items, 0, 10);
        assert_eq!(first.page, 1);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 12, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(7, 12, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(12, 12, 5), vec![11, 12]);
        assert_eq!(page_window(3, 0, 5), vec![1]);
    }
}
