//! City name to IATA airport code lookup.
//!
//! Keys are stored title-cased (`"new delhi"` becomes `"New Delhi"`) and
//! lookups title-case their input, so matching is case-insensitive.

use crate::error::CityTableError;
use once_cell::sync::OnceCell;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use voyage_tools::{FunctionCall, FunctionMetadata, ParameterInfo, Tool, ToolError, ToolFuture};

/// Code returned for cities missing from the table.
pub const UNKNOWN_CITY_CODE: &str = "UNK";

const BUILTIN_CITIES: &str = include_str!("../data/cities.json");

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts after any non-alphabetic character, so `"o'hare"` becomes
/// `"O'Hare"` and `"port-blair"` becomes `"Port-Blair"`.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// An in-memory city table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityTable {
    codes: HashMap<String, String>,
}

impl CityTable {
    /// Parses a JSON object of city name to code.
    ///
    /// # Errors
    ///
    /// Returns [`CityTableError::Json`] if `text` is not such an object.
    pub fn from_json(text: &str) -> Result<Self, CityTableError> {
        let raw: HashMap<String, String> = serde_json::from_str(text)?;
        Ok(raw.into_iter().collect())
    }

    /// Loads the table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data is corrupt.
    pub fn builtin() -> Result<Self, CityTableError> {
        Self::from_json(BUILTIN_CITIES)
    }

    /// Returns the code for `city`, if known.
    #[must_use]
    pub fn lookup(&self, city: &str) -> Option<&str> {
        self.codes.get(&title_case(city.trim())).map(String::as_str)
    }

    /// Returns the code for `city`, or [`UNKNOWN_CITY_CODE`].
    #[must_use]
    pub fn code(&self, city: &str) -> &str {
        self.lookup(city).unwrap_or(UNKNOWN_CITY_CODE)
    }

    /// Returns the number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for CityTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            codes: iter
                .into_iter()
                .map(|(city, code)| (title_case(city.as_ref().trim()), code.into()))
                .collect(),
        }
    }
}

type CityLoader = dyn Fn() -> Result<CityTable, CityTableError> + Send + Sync;

#[derive(Clone)]
enum CitySource {
    Builtin,
    File(PathBuf),
    Loader(Arc<CityLoader>),
}

impl core::fmt::Debug for CitySource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Builtin => f.write_str("Builtin"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Loader(_) => f.write_str("Loader"),
        }
    }
}

/// Lazily loaded, shareable city table.
///
/// The table is read on first use and at most once, even under concurrent
/// lookups. A failed load is not cached, so the next lookup retries.
#[derive(Debug)]
pub struct CityDirectory {
    source: CitySource,
    table: OnceCell<CityTable>,
}

impl CityDirectory {
    /// Uses the bundled table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            source: CitySource::Builtin,
            table: OnceCell::new(),
        }
    }

    /// Reads the table from a JSON file on first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CitySource::File(path.into()),
            table: OnceCell::new(),
        }
    }

    /// Builds the table with `loader` on first use, e.g. from a database.
    #[must_use]
    pub fn from_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<CityTable, CityTableError> + Send + Sync + 'static,
    {
        Self {
            source: CitySource::Loader(Arc::new(loader)),
            table: OnceCell::new(),
        }
    }

    /// Wraps an already loaded table.
    #[must_use]
    pub fn from_table(table: CityTable) -> Self {
        Self {
            source: CitySource::Builtin,
            table: OnceCell::with_value(table),
        }
    }

    /// Returns the table, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns the load error; a later call tries again.
    pub fn table(&self) -> Result<&CityTable, CityTableError> {
        self.table.get_or_try_init(|| {
            let table = match &self.source {
                CitySource::Builtin => CityTable::builtin()?,
                CitySource::File(path) => {
                    let text =
                        std::fs::read_to_string(path).map_err(|source| CityTableError::Io {
                            path: path.clone(),
                            source,
                        })?;
                    CityTable::from_json(&text)?
                }
                CitySource::Loader(load) => load()?,
            };
            tracing::debug!(cities = table.len(), source = ?self.source, "loaded city table");
            Ok(table)
        })
    }

    /// Returns the code for `city`, or [`UNKNOWN_CITY_CODE`].
    ///
    /// # Errors
    ///
    /// Returns the load error if the table cannot be read.
    pub fn code(&self, city: &str) -> Result<String, CityTableError> {
        Ok(self.table()?.code(city).to_string())
    }
}

/// The `city_code` tool.
#[derive(Debug, Clone)]
pub struct CityCodeTool {
    directory: Arc<CityDirectory>,
}

impl CityCodeTool {
    /// Tool name.
    pub const NAME: &'static str = "city_code";

    /// Creates the tool over a shared directory.
    #[must_use]
    pub fn new(directory: Arc<CityDirectory>) -> Self {
        Self { directory }
    }
}

impl Tool for CityCodeTool {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new(Self::NAME)
            .with_description(
                "Look up the 3-letter airport code (IATA) for a city name. \
                 Returns 'UNK' if the city is unknown.",
            )
            .add_parameter(
                ParameterInfo::of::<String>("city_name").describe("City name, e.g. Bengaluru"),
            )
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let city: String = call.get_param("city_name")?;
            let code = self
                .directory
                .code(&city)
                .map_err(|err| ToolError::execution_error(err.to_string()))?;
            Ok(json!(code))
        })
    }
}
