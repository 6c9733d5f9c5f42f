// src/pipeline/query.rs

use url::form_urlencoded;

/// Version context handed to the documentation generator.
///
/// Kept structured until the command boundary; [`GeneratorQuery::encode`]
/// produces the query-string form the generator actually receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorQuery {
    /// Version the pages are generated for.
    pub version: String,
    /// Newest published version, shown in the version switcher.
    pub latest_version: String,
}

impl GeneratorQuery {
    pub fn new(version: impl Into<String>, latest_version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            latest_version: latest_version.into(),
        }
    }

    /// Encode as `version=<v>&latestVersion=<v>`, percent-escaping values.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("version", &self.version)
            .append_pair("latestVersion", &self.latest_version)
            .finish()
    }
}
