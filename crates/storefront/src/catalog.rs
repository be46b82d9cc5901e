//! Product catalog file loading.
//!
//! The catalog is a JSON array of products on disk. The demo API reads it
//! fresh on every call - no caching, an edit shows up on the next request.
//! The storefront seeds its record store from the same file at startup.

use std::path::Path;

use crate::models::Product;

/// Errors that can occur while loading the catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid product array.
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the product catalog from a JSON file.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file is missing, unreadable, or not a
/// valid JSON array of products.
pub async fn load(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let bytes = tokio::fs::read(path).await?;
    parse(&bytes)
}

fn parse(bytes: &[u8]) -> Result<Vec<Product>, CatalogError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quitanda_core::ProductId;

    #[test]
    fn test_parse_catalog() {
        let json = br#"[
            {"id": 1, "name": "Fruit Basket", "price": "34.90", "stock": 4},
            {"id": 2, "name": "Coffee Beans", "price": "19.99"}
        ]"#;

        let products = parse(json).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new(1));
        assert_eq!(products[0].stock, 4);
        assert_eq!(products[1].stock, 1);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse(br#"{"products": []}"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load(Path::new("does/not/exist.json")).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
