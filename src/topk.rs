/// Select the entries with the `k` smallest day counts, keeping every
/// entry tied with the count at rank `k` rather than cutting a tie
/// group mid-way. Ties keep their input order (stable sort). Fewer
/// than `k` entries returns everything; `k == 0` returns nothing.
pub fn select_top_k<T>(mut items: Vec<(T, i64)>, k: usize) -> Vec<(T, i64)> {
    if k == 0 || items.is_empty() {
        return Vec::new();
    }
    items.sort_by_key(|(_, days)| *days);
    let threshold = items[k.min(items.len()) - 1].1;
    items.retain(|(_, days)| *days <= threshold);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_every_entry_tied_at_the_boundary() {
        let items = vec![("a", 5), ("b", 5), ("c", 5), ("d", 7)];
        let selected = select_top_k(items, 2);
        assert_eq!(selected, vec![("a", 5), ("b", 5), ("c", 5)]);
    }

    #[test]
    fn boundary_ties_extend_past_k() {
        let items = vec![("a", 1), ("b", 2), ("c", 2), ("d", 2), ("e", 3)];
        let selected = select_top_k(items, 3);
        assert_eq!(selected, vec![("a", 1), ("b", 2), ("c", 2), ("d", 2)]);
    }

    #[test]
    fn sorts_ascending_and_keeps_tie_order() {
        let items = vec![("late", 30), ("b", 2), ("a", 2), ("soon", 1)];
        let selected = select_top_k(items, 3);
        assert_eq!(selected, vec![("soon", 1), ("b", 2), ("a", 2)]);
    }

    #[test]
    fn fewer_entries_than_k_returns_everything() {
        let items = vec![("a", 3), ("b", 8)];
        assert_eq!(select_top_k(items, 5), vec![("a", 3), ("b", 8)]);
    }

    #[test]
    fn empty_and_zero_k() {
        assert_eq!(select_top_k(Vec::<(&str, i64)>::new(), 5), vec![]);
        assert_eq!(select_top_k(vec![("a", 1)], 0), vec![]);
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let items = vec![("a", 1), ("b", 2), ("c", 2), ("d", 3), ("e", 9)];
        let once = select_top_k(items, 3);
        let twice = select_top_k(once.clone(), 3);
        assert_eq!(once, twice);
    }
}
