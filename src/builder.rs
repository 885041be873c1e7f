use crate::csv_parser::Row;
use crate::dates;
use crate::error::{Error, Result};
use log::debug;

/// A computed column: receives the row, returns the value stored under the column name
pub type DerivedValueFn = Box<dyn Fn(&Row) -> Result<String> + Send + Sync>;

/// Column every date derivation reads from
pub const ISO_DATE_COLUMN: &str = "isoDate";

/// Accumulates derived columns and applies them to a table of rows
///
/// Derivations run in registration order within each row, so a later
/// function can read what an earlier one wrote. Rows keep their order.
///
/// # Examples
/// ```
/// use event_listing::builder::DerivedColumnBuilder;
/// use event_listing::csv_parser::parse_text;
///
/// let rows = parse_text("name\nada\ngrace", true);
/// let rows = DerivedColumnBuilder::create(rows)
///     .with_derived_column("initial", |r| Ok(r.get("name")[..1].to_uppercase()))
///     .with_derived_column("badge", |r| Ok(format!("{}-{}", r.get("initial"), r.get("name"))))
///     .build()
///     .unwrap();
///
/// assert_eq!(rows[1].get("badge"), "G-grace");
/// ```
pub struct DerivedColumnBuilder {
    rows: Vec<Row>,
    derivations: Vec<(String, DerivedValueFn)>,
}

impl DerivedColumnBuilder {
    pub fn create(rows: Vec<Row>) -> Self {
        DerivedColumnBuilder {
            rows,
            derivations: Vec::new(),
        }
    }

    /// Register a derived column and hand the builder back for chaining
    pub fn with_derived_column<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row) -> Result<String> + Send + Sync + 'static,
    {
        self.add(name, f);
        self
    }

    /// Register a derived column in place
    pub fn add<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Row) -> Result<String> + Send + Sync + 'static,
    {
        self.derivations.push((name.into(), Box::new(f)));
        self
    }

    /// Names of the registered columns, in application order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.derivations.iter().map(|(name, _)| name.as_str())
    }

    /// Apply every registered derivation to each row of `rows`
    ///
    /// Stops at the first failing derivation. Rows before it have already
    /// been extended; callers are expected to discard the table on error.
    pub fn apply(&self, rows: &mut [Row]) -> Result<()> {
        debug!(
            "Deriving {} column(s) over {} row(s)",
            self.derivations.len(),
            rows.len()
        );

        for (index, row) in rows.iter_mut().enumerate() {
            for (name, derive) in &self.derivations {
                let value = derive(row).map_err(|e| Error::Derivation {
                    column: name.clone(),
                    row: index,
                    source: Box::new(e),
                })?;
                row.set(name.clone(), value);
            }
        }

        Ok(())
    }

    /// Apply the derivations to the rows given at creation and return them
    pub fn build(mut self) -> Result<Vec<Row>> {
        let mut rows = std::mem::take(&mut self.rows);
        self.apply(&mut rows)?;
        Ok(rows)
    }
}

/// Register the listing's date columns, all computed from `isoDate`
///
/// Adds `quater`, `day`, `month` and `year`, in that order.
pub fn standard_date_columns(builder: DerivedColumnBuilder) -> DerivedColumnBuilder {
    builder
        .with_derived_column("quater", |r| {
            dates::quarter_label(r.get(ISO_DATE_COLUMN)).map(str::to_string)
        })
        .with_derived_column("day", |r| dates::day_of_month(r.get(ISO_DATE_COLUMN)))
        .with_derived_column("month", |r| {
            dates::month_abbreviation(r.get(ISO_DATE_COLUMN)).map(str::to_string)
        })
        .with_derived_column("year", |r| dates::year_two_digits(r.get(ISO_DATE_COLUMN)))
}
