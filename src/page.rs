use crate::error::Result;
use crate::listing::{ElementHandle, EventListingGrid, ListingTarget, RenderOptions, RenderedListing};
use crate::source::ContentSource;
use futures::future::join_all;
use lazy_static::lazy_static;
use log::warn;
use scraper::{Html, Selector};

/// Attribute marking an element as an event listing host
pub const LISTING_MARKER: &str = "data-cccnc-event-listing";

lazy_static! {
    static ref LISTING_MARKER_SELECTOR: Selector =
        Selector::parse(&format!("[{}]", LISTING_MARKER)).unwrap();
}

/// Option name for a marker-prefixed attribute: `data-cccnc-event-listing-data-url` gives `dataurl`
pub fn property_name(attribute: &str) -> Option<String> {
    let prefix = format!("{}-", LISTING_MARKER);
    let attribute = attribute.to_lowercase();
    attribute
        .strip_prefix(&prefix)
        .map(|rest| rest.replace('-', ""))
        .filter(|name| !name.is_empty())
}

/// Find the listing hosts in a page and read their options from attributes
///
/// Each returned option set targets the element it was read from.
pub fn discover_listings(page_html: &str) -> Vec<RenderOptions> {
    let document = Html::parse_document(page_html);

    document
        .select(&LISTING_MARKER_SELECTOR)
        .enumerate()
        .map(|(position, element)| {
            let value = element.value();
            let handle = ElementHandle {
                tag: value.name().to_string(),
                id: value.id().map(str::to_string),
                position,
                attributes: value
                    .attrs()
                    .map(|(name, v)| (name.to_string(), v.to_string()))
                    .collect(),
            };

            let mut options = RenderOptions {
                target: Some(ListingTarget::Element(handle)),
                ..Default::default()
            };
            for (name, v) in value.attrs() {
                if let Some(property) = property_name(name) {
                    options.set_property(&property, v);
                }
            }
            options
        })
        .collect()
}

/// Render every listing host found in `page_html`
///
/// Listings render concurrently and fail independently; the results come
/// back in page order.
pub async fn bind_event_listings<S: ContentSource>(
    grid: &EventListingGrid<S>,
    page_html: &str,
) -> Vec<Result<RenderedListing>> {
    let discovered = discover_listings(page_html);
    let results = join_all(discovered.iter().map(|options| grid.render(options))).await;

    for (options, result) in discovered.iter().zip(&results) {
        if let Err(e) = result {
            warn!(
                "Event listing {:?} failed to render: {}",
                options.dataurl.as_deref().unwrap_or("<no dataurl>"),
                e
            );
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_become_option_names() {
        assert_eq!(
            property_name("data-cccnc-event-listing-data-url").as_deref(),
            Some("dataurl")
        );
        assert_eq!(
            property_name("DATA-CCCNC-EVENT-LISTING-Template-Path").as_deref(),
            Some("templatepath")
        );
        assert_eq!(property_name("data-cccnc-event-listing"), None);
        assert_eq!(property_name("data-cccnc-event-listing-"), None);
        assert_eq!(property_name("class"), None);
    }

    #[test]
    fn discovers_marked_elements_in_order() {
        let page = r#"<html><body>
            <section id="spring" data-cccnc-event-listing
                data-cccnc-event-listing-data-url="/spring.csv"
                data-cccnc-event-listing-year="2024"
                data-cccnc-event-listing-heading="Spring"></section>
            <div data-cccnc-event-listing data-cccnc-event-listing-dataurl="/fall.csv"></div>
            <div data-other="x"></div>
        </body></html>"#;

        let found = discover_listings(page);
        assert_eq!(found.len(), 2);

        let spring = &found[0];
        assert_eq!(spring.dataurl.as_deref(), Some("/spring.csv"));
        assert_eq!(spring.year.as_deref(), Some("2024"));
        assert_eq!(spring.extra.get("heading").map(String::as_str), Some("Spring"));
        match &spring.target {
            Some(ListingTarget::Element(handle)) => {
                assert_eq!(handle.tag, "section");
                assert_eq!(handle.id.as_deref(), Some("spring"));
                assert_eq!(handle.position, 0);
            }
            other => panic!("unexpected target {:?}", other),
        }

        assert_eq!(found[1].dataurl.as_deref(), Some("/fall.csv"));
        assert_eq!(found[1].year, None);
    }
}
