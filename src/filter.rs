use crate::error::{Error, Result};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

/// Category value that shows every item
pub const SELECT_ALL_OPTION: &str = "*";
pub const ACTIVE_CLASS: &str = "active";
pub const HIDDEN_CLASS: &str = "hidden";
pub const DATA_OPTION_ATTRIBUTE: &str = "data-option-value";

lazy_static! {
    static ref FILTER_CONTAINER_SELECTOR: Selector =
        Selector::parse(".events-listing-header > ul.sort-source > li").unwrap();
    static ref ANCHOR_SELECTOR: Selector = Selector::parse("a").unwrap();
    static ref CONTENT_CONTAINER_SELECTOR: Selector =
        Selector::parse(".events-listing-content .event-list-item").unwrap();
}

/// A clickable category control in the listing header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterControl {
    /// Category this control selects, without its leading `.`
    pub option: String,
    pub label: String,
    pub active: bool,
}

/// One event in the listing body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    /// Class names of the item; a category matches when it is one of them
    pub tags: BTreeSet<String>,
    pub id: Option<String>,
    pub hidden: bool,
}

impl ContentItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Category filtering over one rendered listing
///
/// Holds the controls and items found in the markup, and applies clicks to
/// them. At most one control is active at a time.
#[derive(Clone, Debug, Default)]
pub struct FilterController {
    controls: Vec<FilterControl>,
    items: Vec<ContentItem>,
}

impl FilterController {
    /// Build a controller over the controls and items in rendered markup
    ///
    /// Header entries without a link are not controls. Items start hidden
    /// only if the markup already marks them so; the first control marked
    /// active in the markup stays active.
    pub fn bind(markup: &str) -> Self {
        let fragment = Html::parse_fragment(markup);

        let mut seen_active = false;
        let controls = fragment
            .select(&FILTER_CONTAINER_SELECTOR)
            .filter(|li| li.select(&ANCHOR_SELECTOR).next().is_some())
            .map(|li| {
                let marked_active = has_class(li, ACTIVE_CLASS) && !seen_active;
                seen_active |= marked_active;
                FilterControl {
                    option: li
                        .value()
                        .attr(DATA_OPTION_ATTRIBUTE)
                        .unwrap_or_default()
                        .replacen('.', "", 1),
                    label: text_of(li),
                    active: marked_active,
                }
            })
            .collect();

        let items = fragment
            .select(&CONTENT_CONTAINER_SELECTOR)
            .map(|item| ContentItem {
                tags: item.value().classes().map(str::to_string).collect(),
                id: item.value().id().map(str::to_string),
                hidden: has_class(item, HIDDEN_CLASS),
            })
            .collect();

        FilterController { controls, items }
    }

    /// Build a controller directly from controls and items
    pub fn from_parts(controls: Vec<FilterControl>, items: Vec<ContentItem>) -> Self {
        FilterController { controls, items }
    }

    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// The category of the active control, if any
    pub fn active_option(&self) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.active)
            .map(|c| c.option.as_str())
    }

    /// Indices of the items currently shown
    pub fn visible_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    /// Click the control at `index`
    pub fn click(&mut self, index: usize) -> Result<()> {
        let selected = self
            .controls
            .get(index)
            .map(|c| c.option.clone())
            .ok_or_else(|| Error::UnknownFilter(format!("#{}", index)))?;

        for (i, control) in self.controls.iter_mut().enumerate() {
            if i != index && control.active {
                control.active = false;
            }
        }

        if selected != SELECT_ALL_OPTION {
            for item in self.items.iter_mut() {
                if !item.hidden && !item.has_tag(&selected) {
                    item.hidden = true;
                }
            }
            for item in self.items.iter_mut() {
                if item.has_tag(&selected) {
                    item.hidden = false;
                }
            }
        } else {
            for item in self.items.iter_mut().filter(|item| item.hidden) {
                item.hidden = false;
            }
        }

        self.controls[index].active = true;
        Ok(())
    }

    /// Click the first control for `option`; a leading `.` is ignored
    pub fn click_option(&mut self, option: &str) -> Result<()> {
        let wanted = option.replacen('.', "", 1);
        let index = self
            .controls
            .iter()
            .position(|c| c.option == wanted)
            .ok_or_else(|| Error::UnknownFilter(option.to_string()))?;
        self.click(index)
    }
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r##"
        <div class="events-listing-header">
          <ul class="sort-source">
            <li data-option-value="*" class="active"><a href="#">All</a></li>
            <li data-option-value=".a"><a href="#">A</a></li>
            <li data-option-value=".b"><a href="#">B</a></li>
            <li data-option-value=".c">no link</li>
          </ul>
        </div>
        <div class="events-listing-content">
          <div class="event-list-item a" id="e1"></div>
          <div class="event-list-item b" id="e2"></div>
          <div class="event-list-item a b" id="e3"></div>
        </div>
    "##;

    #[test]
    fn binds_controls_with_links_only() {
        let filter = FilterController::bind(MARKUP);
        let options: Vec<_> = filter.controls().iter().map(|c| c.option.as_str()).collect();
        assert_eq!(options, vec!["*", "a", "b"]);
        assert_eq!(filter.controls()[1].label, "A");
        assert_eq!(filter.active_option(), Some("*"));
        assert_eq!(filter.items().len(), 3);
        assert_eq!(filter.items()[2].id.as_deref(), Some("e3"));
        assert_eq!(filter.visible_items(), vec![0, 1, 2]);
    }

    #[test]
    fn selecting_a_category_shows_only_its_items() {
        let mut filter = FilterController::bind(MARKUP);
        filter.click_option("a").unwrap();
        assert_eq!(filter.visible_items(), vec![0, 2]);
        assert_eq!(filter.active_option(), Some("a"));
        assert_eq!(filter.controls().iter().filter(|c| c.active).count(), 1);

        filter.click_option(".b").unwrap();
        assert_eq!(filter.visible_items(), vec![1, 2]);
        assert_eq!(filter.active_option(), Some("b"));
    }

    #[test]
    fn select_all_restores_everything() {
        let mut filter = FilterController::bind(MARKUP);
        filter.click(1).unwrap();
        filter.click(0).unwrap();
        assert_eq!(filter.visible_items(), vec![0, 1, 2]);
        assert_eq!(filter.active_option(), Some("*"));
        assert!(!filter.controls()[1].active);
    }

    #[test]
    fn markup_hidden_items_start_hidden() {
        let markup = r#"<div class="events-listing-content">
            <p class="event-list-item a hidden"></p><p class="event-list-item b"></p></div>"#;
        let filter = FilterController::bind(markup);
        assert_eq!(filter.visible_items(), vec![1]);
        assert_eq!(filter.active_option(), None);
    }

    #[test]
    fn unknown_controls_are_errors() {
        let mut filter = FilterController::bind(MARKUP);
        assert!(matches!(filter.click(9), Err(Error::UnknownFilter(_))));
        assert!(matches!(filter.click_option("c"), Err(Error::UnknownFilter(_))));
        assert_eq!(filter.visible_items(), vec![0, 1, 2]);
    }

    #[test]
    fn only_first_marked_control_starts_active() {
        let markup = r#"<div class="events-listing-header"><ul class="sort-source">
            <li class="active" data-option-value="*"><a>All</a></li>
            <li class="active" data-option-value=".x"><a>X</a></li></ul></div>"#;
        let filter = FilterController::bind(markup);
        let active: Vec<_> = filter.controls().iter().map(|c| c.active).collect();
        assert_eq!(active, vec![true, false]);
    }
}
