// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use semver::Version;
use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// A minimal config only needs the source repository:
///
/// ```toml
/// [source]
/// repo = "https://github.com/acme/widgets.git"
///
/// [commands]
/// compile_styles = "sass sass/:generated/styles/"
/// copy_assets = "cp -r static/. generated/"
/// generate = "jsdoc -c .jsdoc.json"
/// emit_sitemap = "sitemap-gen generated/"
///
/// [versions]
/// floor = "1.14.0"
///
/// [versions.aliases]
/// "1.18.1" = "0.38.1"
///
/// [watch.styles]
/// files = ["sass/**/*.scss"]
/// tasks = ["compile-styles"]
/// ```
///
/// All sections other than `[source]` are optional and have defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Source repository settings from `[source]`.
    #[serde(default)]
    pub source: SourceSection,

    /// Output layout from `[output]`.
    #[serde(default)]
    pub output: OutputSection,

    /// Version filtering and aliasing from `[versions]`.
    #[serde(default)]
    pub versions: VersionsSection,

    /// Fetch/readiness tuning from `[fetch]`.
    #[serde(default)]
    pub fetch: FetchSection,

    /// Build step commands from `[commands]`.
    #[serde(default)]
    pub commands: CommandsSection,

    /// Watch groups from `[watch.<name>]`.
    ///
    /// Keys are the *group names* (e.g. `"styles"`, `"tutorials"`).
    #[serde(default)]
    pub watch: BTreeMap<String, WatchGroup>,
}

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    /// Clone URL of the documented repository. Required.
    #[serde(default)]
    pub repo: String,

    /// Branch used by the `latest` selector.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Directory the source repository is cloned into, relative to the
    /// docs workspace.
    #[serde(default = "default_source_path")]
    pub path: String,

    /// Manifest file inside the checkout; its appearance marks the fetch
    /// as complete and its `version` field labels the build.
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_source_path() -> String {
    "src/source".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            repo: String::new(),
            default_branch: default_branch(),
            path: default_source_path(),
            manifest: default_manifest(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Directory the generated site is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Version selector script, relative to `dir`.
    #[serde(default = "default_versions_script")]
    pub versions_script: String,

    /// Crawler disallow fragment, relative to `dir`.
    #[serde(default = "default_robots_file")]
    pub robots_file: String,
}

fn default_output_dir() -> String {
    "generated".to_string()
}

fn default_versions_script() -> String {
    "scripts/doc-versions.js".to_string()
}

fn default_robots_file() -> String {
    "robots_disallow".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            versions_script: default_versions_script(),
            robots_file: default_robots_file(),
        }
    }
}

/// `[versions]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionsSection {
    /// Oldest version still published; anything below is dropped.
    #[serde(default = "default_floor")]
    pub floor: String,

    /// Map of version number to the public alias it is published under.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_floor() -> String {
    "1.14.0".to_string()
}

impl Default for VersionsSection {
    fn default() -> Self {
        Self {
            floor: default_floor(),
            aliases: BTreeMap::new(),
        }
    }
}

/// `[fetch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSection {
    /// How often to check whether the clone has materialised its manifest.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for the manifest before giving up.
    ///
    /// `0` means wait forever.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_wait_timeout_secs() -> u64 {
    300
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

/// `[commands]` section.
///
/// Each field is the shell command one build step runs. A flow that needs
/// a step whose command is unset fails at graph construction time.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommandsSection {
    #[serde(default)]
    pub compile_styles: Option<String>,

    #[serde(default)]
    pub copy_assets: Option<String>,

    /// Documentation generator. The pipeline appends the version context
    /// as `--query '<urlencoded>'`.
    #[serde(default)]
    pub generate: Option<String>,

    /// Tutorial-only variant of the generator, used by `--tutorials-only`
    /// and by watch groups.
    #[serde(default)]
    pub generate_tutorials: Option<String>,

    #[serde(default)]
    pub emit_sitemap: Option<String>,
}

/// `[watch.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchGroup {
    /// Glob patterns, relative to the docs workspace.
    pub files: Vec<String>,

    /// Glob patterns for paths to ignore within `files`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Build tasks to re-run when a matching path changes.
    pub tasks: Vec<String>,

    /// Quiet period after the first change before the rebuild starts.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    250
}

/// Validated configuration.
///
/// Produced from [`RawConfigFile`] via `TryFrom`, which checks the
/// invariants in `validate.rs` and pre-parses the version floor.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub source: SourceSection,
    pub output: OutputSection,
    pub versions: VersionsSection,
    pub fetch: FetchSection,
    pub commands: CommandsSection,
    pub watch: BTreeMap<String, WatchGroup>,

    /// API credential picked up from the environment, if any.
    pub token: Option<String>,

    floor: Version,
}

impl ConfigFile {
    /// Construct from already-validated parts. Used by the `TryFrom`
    /// impl in `validate.rs`.
    pub(crate) fn new_unchecked(raw: RawConfigFile, floor: Version) -> Self {
        Self {
            source: raw.source,
            output: raw.output,
            versions: raw.versions,
            fetch: raw.fetch,
            commands: raw.commands,
            watch: raw.watch,
            token: None,
            floor,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Parsed `[versions].floor`.
    pub fn floor(&self) -> &Version {
        &self.floor
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.fetch.poll_interval_ms)
    }

    /// `None` means wait forever.
    pub fn wait_timeout(&self) -> Option<Duration> {
        match self.fetch.wait_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source.path)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.source_path().join(&self.source.manifest)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.dir)
    }

    pub fn versions_script_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.versions_script)
    }

    pub fn robots_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.robots_file)
    }
}
