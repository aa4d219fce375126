use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A brand tracked for collaboration detection.
///
/// `aliases` are additional match strings (product lines, common
/// misspellings); matching is case-insensitive over name and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandKeyword {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BrandKeyword {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
        }
    }

    /// Generate a URL-safe slug from the brand name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// All lowercase strings this brand matches on.
    #[must_use]
    pub fn match_terms(&self) -> Vec<String> {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|s| s.to_lowercase())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandKeyword>,
}

/// The built-in registry used when no override file is configured.
#[must_use]
pub fn default_brands() -> Vec<BrandKeyword> {
    [
        "Nike",
        "Adidas",
        "Puma",
        "Apple",
        "Samsung",
        "Sephora",
        "Gymshark",
        "HelloFresh",
        "Fashion Nova",
        "Amazon",
        "Dyson",
        "Glossier",
    ]
    .iter()
    .map(|name| BrandKeyword::named(name))
    .collect()
}

/// Load and validate a brand registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_brands(path: &Path) -> Result<BrandsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brands_file: BrandsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::BrandsFileParse)?;

    validate_brands(&brands_file)?;

    Ok(brands_file)
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for brand in &brands_file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        let lower_name = brand.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        let slug = brand.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_simple_name() {
        assert_eq!(BrandKeyword::named("Fashion Nova").slug(), "fashion-nova");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(BrandKeyword::named("L'Oréal Paris").slug(), "loral-paris");
    }

    #[test]
    fn match_terms_include_lowercased_aliases() {
        let brand = BrandKeyword {
            name: "Apple".to_string(),
            aliases: vec!["iPhone".to_string(), "AirPods".to_string()],
        };
        assert_eq!(brand.match_terms(), vec!["apple", "iphone", "airpods"]);
    }

    #[test]
    fn default_brands_cover_detection_staples() {
        let brands = default_brands();
        assert!(brands.iter().any(|b| b.name == "Apple"));
        assert!(brands.iter().any(|b| b.name == "Samsung"));
        assert!(brands.iter().any(|b| b.name == "Nike"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let brands_file = BrandsFile {
            brands: vec![BrandKeyword::named("  ")],
        };
        let err = validate_brands(&brands_file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_duplicate_name() {
        let brands_file = BrandsFile {
            brands: vec![BrandKeyword::named("Nike"), BrandKeyword::named("nike")],
        };
        let err = validate_brands(&brands_file).unwrap_err();
        assert!(err.to_string().contains("duplicate brand name"));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let brands_file = BrandsFile {
            brands: vec![
                BrandKeyword::named("Fashion Nova"),
                BrandKeyword::named("Fashion--Nova"),
            ],
        };
        let err = validate_brands(&brands_file).unwrap_err();
        assert!(err.to_string().contains("duplicate brand"));
    }

    #[test]
    fn validate_accepts_default_registry() {
        let brands_file = BrandsFile {
            brands: default_brands(),
        };
        assert!(validate_brands(&brands_file).is_ok());
    }
}
