/// Anything that can be shown in a single-choice list.
pub trait Selectable {
    fn label(&self) -> &str;
    fn detail(&self) -> String;
    fn filter_key(&self) -> &str;
}

/// Single-choice list with a highlight and an optional filter query.
///
/// The highlight indexes into the filtered view, not the full item list.
#[derive(Debug, Clone)]
pub struct SelectList<T> {
    items: Vec<T>,
    selected: usize,
    filter: String,
}

impl<T: Selectable> SelectList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selected: 0,
            filter: String::new(),
        }
    }

    /// Items matching the current filter, in original order.
    pub fn visible(&self) -> Vec<&T> {
        if self.filter.is_empty() {
            return self.items.iter().collect();
        }
        let query = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.filter_key().to_lowercase().contains(&query))
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The highlighted item, or `None` when nothing is visible.
    pub fn selected(&self) -> Option<&T> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.clamp();
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.clamp();
    }

    fn clamp(&mut self) {
        let len = self.visible().len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str);

    impl Selectable for Item {
        fn label(&self) -> &str {
            self.0
        }

        fn detail(&self) -> String {
            String::new()
        }

        fn filter_key(&self) -> &str {
            self.0
        }
    }

    fn list() -> SelectList<Item> {
        SelectList::new(vec![Item("Default"), Item("Work"), Item("Personal")])
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut list = list();
        list.move_up();
        assert_eq!(list.selected(), Some(&Item("Default")));

        list.move_down();
        list.move_down();
        list.move_down();
        assert_eq!(list.selected(), Some(&Item("Personal")));
    }

    #[test]
    fn test_filter_narrows_and_clamps() {
        let mut list = list();
        list.move_down();
        list.move_down();

        list.push_filter('W');
        assert_eq!(list.visible(), vec![&Item("Work")]);
        assert_eq!(list.selected(), Some(&Item("Work")));

        list.pop_filter();
        assert_eq!(list.visible().len(), 3);
        assert_eq!(list.filter(), "");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut list = list();
        for c in "perS".chars() {
            list.push_filter(c);
        }
        assert_eq!(list.selected(), Some(&Item("Personal")));
    }

    #[test]
    fn test_empty_selection() {
        let mut list: SelectList<Item> = SelectList::new(Vec::new());
        list.move_down();
        assert_eq!(list.selected(), None);

        let mut list = self::list();
        list.push_filter('z');
        assert_eq!(list.selected(), None);
    }
}
