//! Read one value out of a JSON document

use chrono::{FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use serde_json::Value as Json;

use super::CliError;
use crate::{DateFormat, DateTransform, Node, Path, Tree, date::ISO8601_PATTERN};

/// How the value at the path is extracted and printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Extract {
    /// The raw subtree
    #[default]
    Json,
    Bool,
    Int,
    Float,
    /// Exact decimal, printed as a string
    Decimal,
    String,
    /// A date read with --date-format, printed as RFC 3339 in UTC
    Date,
    /// Sorted field names of an object
    Keys,
    /// Number of elements of an array
    Len,
}

/// Options for the get command
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Path such as `$[users][0][name]`
    pub path: String,
    /// JSON input string
    pub input: Option<String>,
    pub extract: Extract,
    /// Print `null` instead of failing when the path is absent
    pub optional: bool,
    /// Date pattern for `Extract::Date`, ISO 8601 when unset
    pub date_format: Option<String>,
    /// Zone for dates without an offset, such as `+02:00`
    pub time_zone: Option<String>,
}

impl GetOptions {
    fn date_transform(&self) -> Result<DateTransform, CliError> {
        let pattern = self.date_format.as_deref().unwrap_or(ISO8601_PATTERN);
        let mut format = DateFormat::new(pattern);
        if let Some(zone) = &self.time_zone {
            let offset = zone
                .parse::<FixedOffset>()
                .map_err(|source| CliError::TimeZone {
                    value: zone.clone(),
                    source,
                })?;
            format = format.with_time_zone(offset);
        }
        Ok(DateTransform::new(&format)?)
    }
}

/// Execute a get operation and return the JSON to print
pub fn execute_get(options: &GetOptions) -> Result<Json, CliError> {
    let path = Path::parse(&options.path)?;
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let doc: Json = serde_json::from_str(json_str)?;

    let node = doc.root().at(&path);
    if options.optional && !node.is_present() {
        tracing::debug!(path = %path, "optional path is absent");
        return Ok(Json::Null);
    }

    let output = match options.extract {
        Extract::Json => node.resolve()?.clone(),
        Extract::Bool => Json::Bool(node.value()?),
        Extract::Int => Json::from(node.value::<i64>()?),
        Extract::Float => Json::from(node.value::<f64>()?),
        Extract::Decimal => Json::String(node.value::<Decimal>()?.to_string()),
        Extract::String => Json::String(node.value()?),
        Extract::Date => {
            let transform = options.date_transform()?;
            let instant = node.apply(&transform)?;
            Json::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        Extract::Keys => {
            let mut keys: Vec<String> = node.dictionary()?.into_keys().collect();
            keys.sort();
            Json::from(keys)
        }
        Extract::Len => Json::from(node.array()?.len()),
    };

    Ok(output)
}
