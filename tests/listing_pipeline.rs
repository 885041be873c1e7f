use event_listing::{
    bind_event_listings, ContentItem, Error, EventListingGrid, FileSource,
    FilterControl, FilterController, ListingTarget, RenderOptions,
};
use std::path::PathBuf;

fn site_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn component_grid() -> EventListingGrid<FileSource> {
    EventListingGrid::new(FileSource::new(site_root()))
}

fn sample_options() -> RenderOptions {
    RenderOptions::new(
        ListingTarget::Selector("#events-2024".to_string()),
        "/components/event-listing/events.csv",
        "2024",
    )
}

#[tokio::test]
async fn renders_the_component_template() {
    let listing = component_grid().render(&sample_options()).await.unwrap();

    assert_eq!(listing.rows.len(), 4);
    assert!(listing.markup.contains("Events 2024"));
    assert!(listing.markup.contains("Summer &quot;Jam&quot; Night"));
    assert!(listing.markup.contains("Community Hall, Room 2"));
    assert!(listing.markup.contains("<span class=\"event-month\">Jul '24</span>"));

    let filter = &listing.filter;
    assert_eq!(filter.controls().len(), 5);
    assert_eq!(filter.items().len(), 4);
    assert_eq!(filter.active_option(), Some("*"));
    assert_eq!(filter.visible_items(), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn quarter_filters_over_rendered_markup() {
    let mut listing = component_grid().render(&sample_options()).await.unwrap();

    listing.filter.click_option("Third").unwrap();
    assert_eq!(listing.filter.visible_items(), vec![2]);

    listing.filter.click_option("social").unwrap_err();
    listing.filter.click_option(".Forth").unwrap();
    assert_eq!(listing.filter.visible_items(), vec![3]);

    listing.filter.click_option("*").unwrap();
    assert_eq!(listing.filter.visible_items(), vec![0, 1, 2, 3]);
}

#[test]
fn filter_scenario_over_tag_sets() {
    let item = |tags: &[&str]| ContentItem {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        id: None,
        hidden: false,
    };
    let control = |option: &str| FilterControl {
        option: option.to_string(),
        label: option.to_string(),
        active: false,
    };
    let mut filter = FilterController::from_parts(
        vec![control("a"), control("b"), control("*")],
        vec![item(&["a"]), item(&["b"]), item(&["a", "b"])],
    );

    filter.click_option("a").unwrap();
    assert_eq!(filter.visible_items(), vec![0, 2]);
    assert_eq!(filter.active_option(), Some("a"));

    filter.click_option("*").unwrap();
    assert_eq!(filter.visible_items(), vec![0, 1, 2]);
    assert_eq!(filter.active_option(), Some("*"));
    assert!(!filter.controls()[0].active);
}

#[tokio::test]
async fn bad_date_aborts_the_render() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("events.csv"),
        "title,isoDate\nok,2024-01-01\nbroken,someday\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("t.html"), "{{#each rows}}{{title}}{{/each}}").unwrap();

    let grid = EventListingGrid::new(FileSource::new(dir.path()));
    let options = RenderOptions::new(ListingTarget::Selector("main".into()), "/events.csv", "2024")
        .with_templatepath("/t.html");

    match grid.render(&options).await {
        Err(Error::Derivation { column, row, .. }) => {
            assert_eq!(column, "quater");
            assert_eq!(row, 1);
        }
        other => panic!("expected a derivation error, got {:?}", other.map(|l| l.markup)),
    }
}

#[tokio::test]
async fn missing_data_file_fails_the_render() {
    let options = RenderOptions::new(ListingTarget::Selector("main".into()), "/no/such.csv", "2024");
    let err = component_grid().render(&options).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { ref location, .. } if location == "/no/such.csv"));
}

#[tokio::test]
async fn declared_listings_render_independently() {
    let page = r#"<html><body>
        <section id="good" data-cccnc-event-listing
            data-cccnc-event-listing-data-url="/components/event-listing/events.csv"
            data-cccnc-event-listing-year="2024"></section>
        <section id="no-year" data-cccnc-event-listing
            data-cccnc-event-listing-data-url="/components/event-listing/events.csv"></section>
    </body></html>"#;

    let results = bind_event_listings(&component_grid(), page).await;
    assert_eq!(results.len(), 2);

    let good = results[0].as_ref().unwrap();
    assert!(matches!(&good.target, ListingTarget::Element(h) if h.id.as_deref() == Some("good")));
    assert_eq!(good.filter.items().len(), 4);

    assert!(matches!(results[1], Err(Error::Config(_))));
}

#[tokio::test]
async fn shipped_demo_page_renders() {
    let page = std::fs::read_to_string(site_root().join("components/event-listing/index.html")).unwrap();
    let results = bind_event_listings(&component_grid(), &page).await;

    assert_eq!(results.len(), 1);
    let listing = results.into_iter().next().unwrap().unwrap();
    assert!(listing.markup.contains("id=\"events-2024\""));
}
