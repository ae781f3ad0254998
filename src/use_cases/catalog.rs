use crate::domain::{ToneApi, ToneCatalog};

/// Loads the designation/occasion/tone lists, falling back to built-in
/// defaults when the backend cannot be reached.
pub async fn load_catalog(tones: &dyn ToneApi, token: Option<&str>) -> ToneCatalog {
    match tones.catalog(token).await {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::warn!(%error, "failed to load tone catalog; using defaults.");
            ToneCatalog::fallback()
        }
    }
}
