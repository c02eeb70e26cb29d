//! Maps a verse and narrator to the address of its audio

use crate::error::{EngineError, EngineResult};
use std::fmt;

const NARRATOR_PLACEHOLDER: &str = "{narrator}";
const VERSE_PLACEHOLDER: &str = "{verse}";

/// Address of one playable audio resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceAddress(String);

impl ResourceAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds resource addresses from a template
///
/// Both stages use the same template and differ only in the narrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    template: String,
}

impl ResourceLocator {
    pub const DEFAULT_TEMPLATE: &'static str =
        "https://cdn.alquran.cloud/media/audio/ayah/{narrator}/{verse}";

    /// Creates a locator, requiring both placeholders in the template
    pub fn new(template: impl Into<String>) -> EngineResult<Self> {
        let template = template.into();

        for placeholder in [NARRATOR_PLACEHOLDER, VERSE_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(EngineError::InvalidTemplate {
                    reason: format!("missing {}", placeholder),
                    template,
                });
            }
        }

        Ok(Self { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn locate(&self, global_index: u32, narrator: &str) -> ResourceAddress {
        ResourceAddress(
            self.template
                .replace(NARRATOR_PLACEHOLDER, narrator)
                .replace(VERSE_PLACEHOLDER, &global_index.to_string()),
        )
    }
}

impl Default for ResourceLocator {
    fn default() -> Self {
        Self {
            template: Self::DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let locator = ResourceLocator::default();
        assert_eq!(
            locator.locate(262, "ar.alafasy").as_str(),
            "https://cdn.alquran.cloud/media/audio/ayah/ar.alafasy/262"
        );
    }

    #[test]
    fn test_stages_differ_only_by_narrator() {
        let locator = ResourceLocator::default();
        let primary = locator.locate(8, "ar.alafasy");
        let secondary = locator.locate(8, "ur.khan");
        assert_ne!(primary, secondary);
        assert_eq!(
            primary.as_str().replace("ar.alafasy", "ur.khan"),
            secondary.as_str()
        );
    }

    #[test]
    fn test_locate_is_deterministic() {
        let locator = ResourceLocator::new("file:///audio/{narrator}-{verse}.mp3").unwrap();
        assert_eq!(locator.locate(1, "en.walk"), locator.locate(1, "en.walk"));
        assert_eq!(locator.locate(1, "en.walk").to_string(), "file:///audio/en.walk-1.mp3");
    }

    #[test]
    fn test_template_without_placeholders_rejected() {
        assert!(matches!(
            ResourceLocator::new("https://example.com/{verse}"),
            Err(EngineError::InvalidTemplate { .. })
        ));
        assert!(ResourceLocator::new("https://example.com/{narrator}").is_err());
    }
}
