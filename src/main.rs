#![cfg(not(tarpaulin_include))]

use anyhow::Context;
use clap::{Parser, Subcommand};
use event_listing::{
    bind_event_listings, EventListingGrid, ListingTarget, LocationSource, RenderOptions,
    RenderedListing, SourceConfigBuilder, DEFAULT_TEMPLATE_PATH,
};
use log::{error, info};
use std::path::PathBuf;

/// Render filterable event listings from CSV data and handlebars templates
#[derive(Parser, Debug)]
#[command(name = "event-listing")]
#[command(version)]
struct Args {
    /// Directory site-absolute paths are read from
    #[arg(long, env = "EVENT_LISTING_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Fetch relative locations over HTTP from this base URL instead of the root
    #[arg(long = "base-url", env = "EVENT_LISTING_BASE_URL", global = true)]
    base_url: Option<url::Url>,

    /// Template used when a listing does not name one
    #[arg(long = "default-template", default_value = DEFAULT_TEMPLATE_PATH, global = true)]
    default_template: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single listing and print its markup
    Render {
        /// Location of the CSV data file
        #[arg(long = "data-url")]
        data_url: String,

        /// Listing year
        #[arg(long)]
        year: String,

        /// Template location (default: the component template)
        #[arg(long = "template-path")]
        template_path: Option<String>,

        /// CSS selector of the element the listing belongs in
        #[arg(long, default_value = "[data-cccnc-event-listing]")]
        target: String,

        /// Extra template properties as key=value
        #[arg(long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,

        /// Click these filter categories in order and report what stays visible
        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Render every listing declared in an HTML page
    Page {
        /// Page to scan for listing hosts
        page: PathBuf,
    },

    /// Print the enriched rows of a CSV data file as JSON
    Rows {
        /// Location of the CSV data file
        #[arg(long = "data-url")]
        data_url: String,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_lowercase(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

fn report_filters(listing: &mut RenderedListing, filters: &[String]) -> anyhow::Result<()> {
    for option in filters {
        listing.filter.click_option(option)?;
        let visible = listing.filter.visible_items();
        eprintln!(
            "filter {:?}: {} of {} item(s) visible",
            option,
            visible.len(),
            listing.filter.items().len()
        );
        for index in visible {
            let item = &listing.filter.items()[index];
            eprintln!("  #{} {}", index, item.id.as_deref().unwrap_or(""));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SourceConfigBuilder::new(args.root)
        .base_url(args.base_url)
        .default_template_path(args.default_template)
        .build()?;
    let grid = EventListingGrid::new(LocationSource::new(&config))
        .with_default_template_path(config.default_template_path.clone());

    match args.command {
        Command::Render {
            data_url,
            year,
            template_path,
            target,
            options,
            filters,
        } => {
            let mut render_options = RenderOptions::new(ListingTarget::Selector(target), data_url, year);
            render_options.templatepath = template_path;
            for (key, value) in options {
                render_options.set_property(&key, value);
            }

            let mut listing = grid.render(&render_options).await?;
            report_filters(&mut listing, &filters)?;
            println!("{}", listing.markup);
        }
        Command::Page { page } => {
            let page_html = std::fs::read_to_string(&page)
                .with_context(|| format!("reading {}", page.display()))?;
            let results = bind_event_listings(&grid, &page_html).await;
            if results.is_empty() {
                info!("No event listings declared in {}", page.display());
            }

            let mut failed = 0;
            for result in results {
                match result {
                    Ok(listing) => {
                        println!("<!-- event listing: {} -->", describe_target(&listing.target));
                        println!("{}", listing.markup);
                    }
                    Err(e) => {
                        error!("{}", e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} event listing(s) failed to render", failed);
            }
        }
        Command::Rows { data_url } => {
            use event_listing::ContentSource;

            let csv_text = grid.source().fetch_text(&data_url).await?;
            let rows = grid.rows_from_csv_text(&csv_text)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

fn describe_target(target: &ListingTarget) -> String {
    match target {
        ListingTarget::Selector(selector) => selector.clone(),
        ListingTarget::Element(handle) => match &handle.id {
            Some(id) => format!("{}#{}", handle.tag, id),
            None => format!("{}[{}]", handle.tag, handle.position),
        },
    }
}
