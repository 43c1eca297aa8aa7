//! YAML seed catalog (`config/catalog.yaml`).

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::catalog::ProductInput;
use crate::validation::{validate_product, ProductDraft};
use crate::ConfigError;

/// A price as written in YAML: quoted or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for PriceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceText::Int(v) => write!(f, "{v}"),
            PriceText::Float(v) => write!(f, "{v}"),
            PriceText::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
    pub price: PriceText,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<CatalogEntry>,
}

/// Load and validate the seed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Vec<ProductInput>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or an entry is invalid.
pub fn parse_catalog(content: &str) -> Result<Vec<ProductInput>, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(file)
}

fn validate_catalog(file: CatalogFile) -> Result<Vec<ProductInput>, ConfigError> {
    let mut seen_names = HashSet::new();
    let mut products = Vec::with_capacity(file.products.len());

    for entry in file.products {
        let label = entry.name.clone();
        if !seen_names.insert(entry.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product name: '{label}'"
            )));
        }

        let draft = ProductDraft {
            name: Some(entry.name),
            description: Some(entry.description),
            price: Some(entry.price.to_string()),
            sale_start: entry.sale_start,
            sale_end: entry.sale_end,
            photo: entry.photo,
        };
        let input = validate_product(draft)
            .map_err(|e| ConfigError::Validation(format!("product '{label}': {e}")))?;
        products.push(input);
    }

    Ok(products)
}
