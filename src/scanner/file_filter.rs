use crate::config::SceneConfig;
use crate::error::Result;
use regex::Regex;
use std::path::Path;

pub struct HeaderFilter {
    header_suffix: String,
    exclude_patterns: Vec<Regex>,
}

impl HeaderFilter {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            header_suffix: config.header_suffix.clone(),
            exclude_patterns,
        })
    }

    pub fn is_header_file(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };

        // Hidden files are skipped, like a shell glob would
        if filename.starts_with('.') {
            return false;
        }

        // An empty stem would prefix-match every file in the directory
        let has_stem = self.stem_of(filename).is_some_and(|stem| !stem.is_empty());

        has_stem && !self.matches_any_pattern(filename)
    }

    /// Scene stem for a header file name, e.g. `SCENE.` for `SCENE.HDR`.
    pub fn stem_of<'a>(&self, filename: &'a str) -> Option<&'a str> {
        filename.strip_suffix(self.header_suffix.as_str())
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn header_suffix(&self) -> &str {
        &self.header_suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> SceneConfig {
        SceneConfig {
            header_suffix: "HDR".to_string(),
            archive_suffix: "DBL".to_string(),
            exclude_patterns: vec![r"_TEST_".to_string(), r"^L1".to_string()],
        }
    }

    #[test]
    fn test_header_detection() {
        let filter = HeaderFilter::new(&create_test_config()).unwrap();

        assert!(filter.is_header_file(Path::new("VE_VM01_L2VALD_SUDOUEST_20180101.HDR")));
        assert!(filter.is_header_file(Path::new("/data/SCENE.HDR")));
        assert!(filter.is_header_file(Path::new("SCENEHDR")));

        assert!(!filter.is_header_file(Path::new("SCENE.DBL")));
        assert!(!filter.is_header_file(Path::new("SCENE.hdr")));
        assert!(!filter.is_header_file(Path::new("SCENE.HDR.bak")));
        assert!(!filter.is_header_file(Path::new(".SCENE.HDR")));
        assert!(!filter.is_header_file(Path::new("HDR")));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = HeaderFilter::new(&create_test_config()).unwrap();

        assert!(!filter.is_header_file(Path::new("VE_TEST_SCENE.HDR")));
        assert!(!filter.is_header_file(Path::new("L1C_SCENE.HDR")));
        assert!(filter.is_header_file(Path::new("L2A_SCENE.HDR")));

        assert!(filter.matches_any_pattern("A_TEST_B"));
        assert!(!filter.matches_any_pattern("plain"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let mut config = create_test_config();
        config.exclude_patterns.push("(".to_string());
        assert!(HeaderFilter::new(&config).is_err());
    }

    #[test]
    fn test_stem_keeps_separator() {
        let filter = HeaderFilter::new(&create_test_config()).unwrap();

        assert_eq!(filter.stem_of("SCENE.HDR"), Some("SCENE."));
        assert_eq!(filter.stem_of("SCENE.DBL"), None);
        assert_eq!(filter.header_suffix(), "HDR");
    }
}
