/*!
# Event Listing

Renders a filterable event listing from a CSV data file and a handlebars
template, in Rust.

## Overview

A listing is described by a small set of options: where the CSV data lives,
which template to render it with, the listing year, and where the markup
goes. Rendering fetches the data file and the template together, turns the
CSV text into rows, adds derived date columns to every row, renders the
template, and binds category filtering to the controls and items in the
resulting markup.

## Architecture

### Data Layer
- **CSV Parser** - Quote-aware line tokenizer and CSV text to row conversion
- **Derived Column Builder** - Adds computed columns to every row, in registration order
- **Date Derivations** - Quarter, day, month and two-digit year from an ISO date

### Presentation Layer
- **View Renderer** - Handlebars rendering of the enriched rows and options
- **Filter Controller** - Click-driven category filtering over rendered markup

### Plumbing
- **Content Sources** - File system and HTTP retrieval of data and templates
- **Page Discovery** - Finds listing hosts in a page from their marker attributes

## Data Flow

```text
CSV text -> parse_text -> rows -> DerivedColumnBuilder -> enriched rows
         -> ViewRenderer (with options) -> markup -> FilterController
```

## Modules

- **csv_parser**: `Row`, `parse_line`, `parse_text`
- **builder**: `DerivedColumnBuilder` and the standard date columns
- **dates**: Date parsing and the four date derivations
- **render**: Handlebars template rendering
- **filter**: Filter controls, content items and click handling
- **source**: `ContentSource` and its file and HTTP implementations
- **listing**: Render options and the `EventListingGrid` render pipeline
- **page**: Declarative listing discovery in host pages
- **config**: Source configuration
- **error**: Library error type

## Usage

```no_run
use event_listing::{EventListingGrid, FileSource, ListingTarget, RenderOptions};

# async fn run() -> event_listing::Result<()> {
let grid = EventListingGrid::new(FileSource::new("site"));
let options = RenderOptions::new(
    ListingTarget::Selector("#events".to_string()),
    "/data/events.csv",
    "2024",
);
let mut listing = grid.render(&options).await?;
listing.filter.click_option("music")?;
println!("{}", listing.markup);
# Ok(())
# }
```
*/

pub mod builder;
pub mod config;
pub mod csv_parser;
pub mod dates;
pub mod error;
pub mod filter;
pub mod listing;
pub mod page;
pub mod render;
pub mod source;

/// Re-export everything from these modules to make it easier to use
pub use builder::*;
pub use config::*;
pub use csv_parser::*;
pub use dates::*;
pub use error::{Error, Result};
pub use filter::*;
pub use listing::*;
pub use page::*;
pub use render::*;
pub use source::*;
