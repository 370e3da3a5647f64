//! Style configuration parser
//!
//! Parses `styles.toml` into property definitions and a composition.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cycle::{Cycle, CycleBuilder};
use crate::expr::evaluate;
use crate::value::Value;

/// Remembered-style settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RememberConfig {
    /// Restart the style cycle when it runs out instead of failing
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

/// A single property cycle definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyConfig {
    /// Property key, e.g. `color` or `linewidth`
    pub key: String,
    /// Values cycled through, in order
    pub values: Vec<Value>,
}

/// Top-level configuration parsed from styles.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleConfig {
    /// Composition expression over the property keys. When absent, all
    /// properties are zipped in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<String>,
    /// Remembered-style settings
    #[serde(default)]
    pub remember: RememberConfig,
    /// Property definitions
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyConfig>,
}

impl StyleConfig {
    /// Parse a styles.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse styles.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse styles.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Find a property by key
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&PropertyConfig> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// One single-key cycle per configured property
    #[must_use]
    pub fn property_cycles(&self) -> BTreeMap<String, Cycle<String, Value>> {
        self.properties
            .iter()
            .map(|p| (p.key.clone(), Cycle::new(p.key.clone(), p.values.clone())))
            .collect()
    }

    /// Build the configured cycle, optionally overriding `compose`.
    pub fn build_cycle(&self, compose: Option<&str>) -> Result<Cycle<String, Value>> {
        if let Some(source) = compose.or(self.compose.as_deref()) {
            return evaluate(source, &self.property_cycles())
                .with_context(|| format!("Failed to evaluate composition '{source}'"));
        }

        if self.properties.is_empty() {
            bail!("Nothing to compose: define at least one [[property]] or a compose expression");
        }
        self.properties
            .iter()
            .fold(CycleBuilder::new(), |builder, p| {
                builder.named(p.key.clone(), p.values.clone())
            })
            .build()
            .context("Failed to zip properties")
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // Check for duplicate property keys
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(&property.key) {
                bail!("Duplicate property key: '{}'", property.key);
            }
        }

        // Check that keys are non-empty
        for property in &self.properties {
            if property.key.trim().is_empty() {
                bail!("Property key cannot be empty");
            }
        }

        if let Some(compose) = &self.compose {
            if compose.trim().is_empty() {
                bail!("Composition expression cannot be empty");
            }
        }

        if self.compose.is_none() && self.properties.is_empty() {
            bail!("Config must define at least one [[property]] or a compose expression");
        }

        Ok(())
    }
}
