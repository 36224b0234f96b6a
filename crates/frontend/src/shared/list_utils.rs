/// Утилиты сортировки и пагинации для страниц-списков
use std::cmp::Ordering;

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// Количество страниц для `total` элементов, минимум одна
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Элементы страницы `page` (с нуля); номер ограничен последней страницей
pub fn page_slice<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page = page.min(total_pages(items.len(), page_size) - 1);
    let start = (page * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    items[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(u32);

    impl Sortable for Item {
        fn compare_by_field(&self, other: &Self, _field: &str) -> Ordering {
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn test_sort_list_direction() {
        let mut items = vec![Item(2), Item(3), Item(1)];
        sort_list(&mut items, "n", true);
        assert_eq!(items, vec![Item(1), Item(2), Item(3)]);
        sort_list(&mut items, "n", false);
        assert_eq!(items, vec![Item(3), Item(2), Item(1)]);
    }

    #[test]
    fn test_paging() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(total_pages(0, 50), 1);
        assert_eq!(total_pages(7, 3), 3);
        assert_eq!(page_slice(&items, 0, 3), vec![0, 1, 2]);
        assert_eq!(page_slice(&items, 2, 3), vec![6]);
        assert_eq!(page_slice(&items, 9, 3), vec![6]);
        assert!(page_slice(&Vec::<u32>::new(), 0, 3).is_empty());
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("raised_at", "raised_at", false), " ▼");
        assert_eq!(get_sort_indicator("raised_at", "severity", true), " ⇅");
    }
}
