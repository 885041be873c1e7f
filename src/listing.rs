use crate::builder::{standard_date_columns, DerivedColumnBuilder};
use crate::config::DEFAULT_TEMPLATE_PATH;
use crate::csv_parser::{parse_text, Row};
use crate::error::{Error, Result};
use crate::filter::FilterController;
use crate::render::ViewRenderer;
use crate::source::ContentSource;
use indexmap::IndexMap;
use log::{debug, info};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reference to an element in a host page
///
/// Carries what was read off the element when it was discovered, so the
/// host can find it again when placing the markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementHandle {
    pub tag: String,
    pub id: Option<String>,
    /// Zero-based position among the page's listing elements
    pub position: usize,
    pub attributes: IndexMap<String, String>,
}

/// Where a rendered listing belongs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingTarget {
    /// A CSS selector the host resolves in its own page
    Selector(String),
    Element(ElementHandle),
}

/// Options for one listing render
///
/// Every property except the target is also handed to the template, next to
/// `rows`, so templates can use values such as `year` or `id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(skip)]
    pub target: Option<ListingTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templatepath: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl RenderOptions {
    pub fn new(target: ListingTarget, dataurl: impl Into<String>, year: impl Into<String>) -> Self {
        RenderOptions {
            target: Some(target),
            dataurl: Some(dataurl.into()),
            year: Some(year.into()),
            ..Default::default()
        }
    }

    /// Set a named option the way a markup attribute would
    ///
    /// The well-known names fill their own fields; anything else is kept as
    /// an extra template property.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match name {
            "dataurl" => self.dataurl = Some(value),
            "year" => self.year = Some(value),
            "templatepath" => self.templatepath = Some(value),
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }

    pub fn with_templatepath(mut self, path: impl Into<String>) -> Self {
        self.templatepath = Some(path.into());
        self
    }

    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }
}

/// Output of a successful render
#[derive(Clone, Debug)]
pub struct RenderedListing {
    pub target: ListingTarget,
    pub markup: String,
    pub rows: Vec<Row>,
    pub filter: FilterController,
}

/// Options that passed validation
struct CheckedOptions<'a> {
    target: ListingTarget,
    dataurl: &'a str,
    templatepath: &'a str,
}

/// Renders event listings: fetches data and template, enriches the rows,
/// renders the markup and binds category filtering to it
pub struct EventListingGrid<S: ContentSource> {
    source: S,
    view_render: ViewRenderer,
    default_template_path: String,
}

impl<S: ContentSource> EventListingGrid<S> {
    pub fn new(source: S) -> Self {
        EventListingGrid {
            source,
            view_render: ViewRenderer::new(),
            default_template_path: DEFAULT_TEMPLATE_PATH.to_string(),
        }
    }

    pub fn with_default_template_path(mut self, path: impl Into<String>) -> Self {
        self.default_template_path = path.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parse CSV text and add the derived date columns to every row
    pub fn rows_from_csv_text(&self, csv_text: &str) -> Result<Vec<Row>> {
        let rows = parse_text(csv_text, true);
        standard_date_columns(DerivedColumnBuilder::create(rows)).build()
    }

    fn check_options<'a>(&'a self, options: &'a RenderOptions) -> Result<CheckedOptions<'a>> {
        let (Some(dataurl), Some(_year)) = (options.dataurl.as_deref(), options.year.as_deref())
        else {
            return Err(Error::Config(format!(
                "dataurl ({:?}) and year ({:?})",
                options.dataurl, options.year
            )));
        };

        let target = options
            .target
            .clone()
            .ok_or_else(|| Error::Config("target selector or target element".to_string()))?;

        if let ListingTarget::Selector(selector) = &target {
            Selector::parse(selector)
                .map_err(|e| Error::Config(format!("valid target selector {:?}: {:?}", selector, e)))?;
        }

        Ok(CheckedOptions {
            target,
            dataurl,
            templatepath: options
                .templatepath
                .as_deref()
                .unwrap_or(&self.default_template_path),
        })
    }

    /// Render one listing
    ///
    /// Options are checked before anything is fetched. The data file and the
    /// template are fetched concurrently and the first failure fails the
    /// render; nothing is rendered from a partial fetch.
    pub async fn render(&self, options: &RenderOptions) -> Result<RenderedListing> {
        let checked = self.check_options(options)?;

        let (data_content, html_template) = tokio::try_join!(
            self.source.fetch_text(checked.dataurl),
            self.source.fetch_text(checked.templatepath)
        )?;
        debug!(
            "Fetched {} ({} bytes) and {} ({} bytes)",
            checked.dataurl,
            data_content.len(),
            checked.templatepath,
            html_template.len()
        );

        let rows = self.rows_from_csv_text(&data_content)?;
        let data = template_context(options, &rows)?;
        let markup = self.view_render.render_from_template(&html_template, &data)?;
        let filter = FilterController::bind(&markup);

        info!(
            "Rendered {} event(s) from {} with {} filter control(s)",
            rows.len(),
            checked.dataurl,
            filter.controls().len()
        );

        Ok(RenderedListing {
            target: checked.target,
            markup,
            rows,
            filter,
        })
    }
}

/// The render options as a JSON object, plus the enriched `rows`
pub fn template_context(options: &RenderOptions, rows: &[Row]) -> Result<Value> {
    let mut data = serde_json::to_value(options)?;
    if let Value::Object(map) = &mut data {
        map.insert("rows".to_string(), serde_json::to_value(rows)?);
    }
    Ok(data)
}
