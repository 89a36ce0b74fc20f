/// Converter configuration
///
/// Priority: CLI flags > ENV (`PGR_ARROW_*`) > config file > defaults.
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::Result;
use crate::fetch::PageSize;
use crate::mapping::TypeMapper;

/// What the type mapper does with a column whose SQL type has no columnar
/// equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTypePolicy {
    /// Abort mapping with `UnsupportedColumnType`
    #[default]
    Fail,
    /// Drop the column from the schema and log a warning
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConverterConfig {
    /// Rows per page, `-1` for a single unbounded page
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub unsupported_types: UnsupportedTypePolicy,
    /// Timezone for TIMESTAMP WITH TIME ZONE columns that do not declare one
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

const fn default_page_size() -> i64 { 1024 }
fn default_timezone() -> String { "UTC".to_string() }

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            unsupported_types: UnsupportedTypePolicy::default(),
            default_timezone: default_timezone(),
        }
    }
}

impl ConverterConfig {
    pub const ENV_PREFIX: &'static str = "PGR_ARROW";
    const DEFAULT_PATHS: [&'static str; 2] = ["/etc/postgrust/pgr_arrow.toml", "./pgr_arrow.toml"];

    /// Load configuration from an explicit file (required to exist), or the
    /// first default location that exists, then overlay the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        } else if let Some(found) = Self::DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            tracing::debug!(path = *found, "loaded converter config");
            builder = builder.add_source(File::with_name(found));
        }

        builder = builder.add_source(
            Environment::with_prefix(Self::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn page_size(&self) -> Result<PageSize> {
        PageSize::from_limit(self.page_size)
    }

    #[must_use]
    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper::new(self.unsupported_types, self.default_timezone.as_str())
    }
}
