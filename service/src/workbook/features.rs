use bitflags::bitflags;
use trait_ontology_core::config::WorkbookConfig;

bitflags! {
    /// Presentation features of a written workbook.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WorkbookFeatures: u8 {
        /// Colour duplicate and dangling cells.
        const HIGHLIGHT = 0b001;
        /// Freeze the header row.
        const FREEZE_HEADERS = 0b010;
        /// Add an autofilter over each table.
        const AUTOFILTER = 0b100;

        /// All features enabled.
        const ALL = Self::HIGHLIGHT.bits()
                  | Self::FREEZE_HEADERS.bits()
                  | Self::AUTOFILTER.bits();

        /// Plain tables.
        const NONE = 0b000;
    }
}

impl Default for WorkbookFeatures {
    fn default() -> Self {
        Self::from(&WorkbookConfig::default())
    }
}

impl From<&WorkbookConfig> for WorkbookFeatures {
    fn from(config: &WorkbookConfig) -> Self {
        let mut features = Self::NONE;
        features.set(Self::HIGHLIGHT, config.highlight);
        features.set(Self::FREEZE_HEADERS, config.freeze_headers);
        features.set(Self::AUTOFILTER, config.autofilter);
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_from_config() {
        let features = WorkbookFeatures::default();
        assert!(features.contains(WorkbookFeatures::HIGHLIGHT | WorkbookFeatures::FREEZE_HEADERS));
        assert!(!features.contains(WorkbookFeatures::AUTOFILTER));

        let config = WorkbookConfig {
            highlight: false,
            freeze_headers: false,
            autofilter: true,
        };
        assert_eq!(WorkbookFeatures::from(&config), WorkbookFeatures::AUTOFILTER);
    }
}
