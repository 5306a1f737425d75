//! Searchable, incrementally revealed option list.
//!
//! The control never owns more than a filtered index view over the options it
//! was given. The first [`DEFAULT_PAGE_SIZE`] matches are visible; scrolling
//! within [`SCROLL_THRESHOLD`] rows of the end reveals [`PAGE_GROWTH`] more.

use std::fmt;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const PAGE_GROWTH: usize = 10;
pub const SCROLL_THRESHOLD: usize = 10;

/// Text segment of a label, flagged when it matches the search query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectControl<T> {
    options: Vec<T>,
    property: Option<fn(&T) -> String>,
    searchable: bool,
    query: String,
    filtered: Vec<usize>,
    visible: usize,
    selected: Option<usize>,
}

impl<T: fmt::Display> SelectControl<T> {
    #[must_use]
    pub fn new(options: Vec<T>) -> Self {
        let filtered = (0..options.len()).collect();
        Self {
            options,
            property: None,
            searchable: false,
            query: String::new(),
            filtered,
            visible: DEFAULT_PAGE_SIZE,
            selected: None,
        }
    }

    /// Uses `property` instead of `Display` for labels and search.
    #[must_use]
    pub fn with_property(mut self, property: fn(&T) -> String) -> Self {
        self.property = Some(property);
        self
    }

    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Replaces the option list; the selection is dropped if it no longer exists.
    pub fn set_options(&mut self, options: Vec<T>) {
        self.options = options;
        if self.selected.is_some_and(|index| index >= self.options.len()) {
            self.selected = None;
        }
        self.refilter();
    }

    #[must_use]
    pub fn label(&self, option: &T) -> String {
        match self.property {
            Some(property) => property(option),
            None => option.to_string(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Filters by case-insensitive substring and resets the visible window.
    /// Ignored when search is disabled.
    pub fn set_search(&mut self, query: &str) {
        if !self.searchable {
            return;
        }
        self.query = query.trim().to_string();
        self.refilter();
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.refilter();
    }

    fn refilter(&mut self) {
        let query: Vec<char> = self.query.chars().collect();
        self.filtered = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| {
                query.is_empty() || !match_ranges(&self.label(option), &query).is_empty()
            })
            .map(|(index, _)| index)
            .collect();
        self.visible = DEFAULT_PAGE_SIZE;
    }

    /// Number of options matching the current search.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    /// Rows currently revealed, with their index into [`Self::options`].
    #[must_use]
    pub fn visible_options(&self) -> Vec<(usize, &T)> {
        self.filtered
            .iter()
            .take(self.visible)
            .map(|&index| (index, &self.options[index]))
            .collect()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.visible < self.filtered.len()
    }

    /// Reports the last rendered row; reveals more rows near the end.
    /// Returns `true` if the window grew.
    pub fn on_scroll(&mut self, last_visible_row: usize) -> bool {
        let shown = self.visible.min(self.filtered.len());
        if self.has_more() && last_visible_row + SCROLL_THRESHOLD >= shown {
            self.visible = (self.visible + PAGE_GROWTH).min(self.filtered.len());
            return true;
        }
        false
    }

    /// Selects by index into [`Self::options`].
    pub fn select(&mut self, index: usize) -> Option<&T> {
        if index < self.options.len() {
            self.selected = Some(index);
        }
        self.selected()
    }

    /// Selects the `position`-th visible row (zero-based).
    pub fn select_visible(&mut self, position: usize) -> Option<&T> {
        let index = self.filtered.iter().take(self.visible).nth(position).copied()?;
        self.select(index)
    }

    /// Selects the first option for which `predicate` holds.
    pub fn select_where(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.options.iter().position(predicate)?;
        self.select(index)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|index| self.options.get(index))
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Splits `label` into segments, flagging matches of the current query.
    /// Without search (or an empty query) the label is one unmatched segment.
    #[must_use]
    pub fn highlight(&self, label: &str) -> Vec<Segment> {
        let query: Vec<char> = self.query.chars().collect();
        if !self.searchable || query.is_empty() {
            return vec![Segment {
                text: label.to_string(),
                matched: false,
            }];
        }

        let chars: Vec<char> = label.chars().collect();
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (start, end) in match_ranges(label, &query) {
            if start > cursor {
                segments.push(Segment {
                    text: chars[cursor..start].iter().collect(),
                    matched: false,
                });
            }
            segments.push(Segment {
                text: chars[start..end].iter().collect(),
                matched: true,
            });
            cursor = end;
        }

        if cursor < chars.len() {
            segments.push(Segment {
                text: chars[cursor..].iter().collect(),
                matched: false,
            });
        }

        segments
    }
}

/// Non-overlapping case-insensitive occurrences of `query` in `label`, as
/// char index ranges.
fn match_ranges(label: &str, query: &[char]) -> Vec<(usize, usize)> {
    let chars: Vec<char> = label.chars().collect();
    let mut ranges = Vec::new();

    if query.is_empty() || query.len() > chars.len() {
        return ranges;
    }

    let mut start = 0;
    while start + query.len() <= chars.len() {
        let hit = chars[start..start + query.len()]
            .iter()
            .zip(query)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()));

        if hit {
            ranges.push((start, start + query.len()));
            start += query.len();
        } else {
            start += 1;
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(count: usize) -> SelectControl<String> {
        SelectControl::new((0..count).map(|n| format!("Option {n}")).collect()).searchable(true)
    }

    #[test]
    fn starts_with_default_page() {
        let select = numbers(120);
        assert_eq!(select.visible_options().len(), DEFAULT_PAGE_SIZE);
        assert!(select.has_more());
    }

    #[test]
    fn scrolling_near_end_grows_by_ten() {
        let mut select = numbers(120);

        assert!(!select.on_scroll(10));
        assert_eq!(select.visible_options().len(), 50);

        assert!(select.on_scroll(40));
        assert_eq!(select.visible_options().len(), 60);

        loop {
            let last = select.visible_options().len() - 1;
            if !select.on_scroll(last) {
                break;
            }
        }
        assert_eq!(select.visible_options().len(), 120);
        assert!(!select.has_more());
    }

    #[test]
    fn search_filters_and_resets_window() {
        let mut select = numbers(120);
        select.on_scroll(49);
        select.set_search("option 1");

        // 1, 10-19, 100-119
        assert_eq!(select.match_count(), 31);
        assert_eq!(select.visible_options().len(), 31);
        assert!(!select.has_more());

        select.clear_search();
        assert_eq!(select.visible_options().len(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn search_is_ignored_when_disabled() {
        let mut select = SelectControl::new(vec!["a".to_string(), "b".to_string()]);
        select.set_search("a");
        assert_eq!(select.match_count(), 2);
        assert_eq!(select.highlight("a").len(), 1);
    }

    #[test]
    fn highlight_marks_every_match_case_insensitively() {
        let mut select = SelectControl::new(vec!["Nederland".to_string()]).searchable(true);
        select.set_search("ne");

        assert_eq!(
            select.highlight("Nederland"),
            vec![
                Segment { text: "Ne".into(), matched: true },
                Segment { text: "derland".into(), matched: false },
            ]
        );

        select.set_search("d");
        let matched: Vec<_> = select
            .highlight("Nederland")
            .into_iter()
            .filter(|s| s.matched)
            .collect();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn property_selector_drives_labels_and_search() {
        #[derive(Debug, PartialEq)]
        struct Country {
            name: &'static str,
            iso: &'static str,
        }

        impl std::fmt::Display for Country {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name)
            }
        }

        let mut select = SelectControl::new(vec![
            Country { name: "Netherlands", iso: "NL" },
            Country { name: "Belgium", iso: "BE" },
        ])
        .with_property(|c| c.iso.to_string())
        .searchable(true);

        select.set_search("be");
        let visible = select.visible_options();
        assert_eq!(visible.len(), 1);
        assert_eq!(select.label(visible[0].1), "BE");
    }

    #[test]
    fn selection_survives_filtering_and_resets_when_removed() {
        let mut select = numbers(5);
        assert_eq!(select.select_visible(3).map(String::as_str), Some("Option 3"));

        select.set_search("option 1");
        assert_eq!(select.selected().map(String::as_str), Some("Option 3"));
        assert_eq!(select.select_visible(0).map(String::as_str), Some("Option 1"));

        select.set_options(vec!["Only".to_string()]);
        assert_eq!(select.selected(), None);
        assert!(select.select_visible(5).is_none());
    }

    #[test]
    fn multibyte_labels_are_safe() {
        let mut select = SelectControl::new(vec!["Curaçao".to_string()]).searchable(true);
        select.set_search("ÇA");
        let segments = select.highlight("Curaçao");
        assert_eq!(segments[1], Segment { text: "ça".into(), matched: true });
    }
}
