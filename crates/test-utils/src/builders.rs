#![allow(dead_code)]

use docdag::config::{ConfigFile, RawConfigFile, WatchGroup};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from a config that would pass validation and construct every
/// flow: a dummy repo URL and a shell no-op for each build command.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.source.repo = "https://github.com/acme/widgets.git".to_string();
        config.commands.compile_styles = Some("true".to_string());
        config.commands.copy_assets = Some("true".to_string());
        config.commands.generate = Some("true".to_string());
        config.commands.generate_tutorials = Some("true".to_string());
        config.commands.emit_sitemap = Some("true".to_string());
        Self { config }
    }

    pub fn with_repo(mut self, repo: &str) -> Self {
        self.config.source.repo = repo.to_string();
        self
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.config.source.default_branch = branch.to_string();
        self
    }

    pub fn with_source_path(mut self, path: &str) -> Self {
        self.config.source.path = path.to_string();
        self
    }

    pub fn with_manifest(mut self, name: &str) -> Self {
        self.config.source.manifest = name.to_string();
        self
    }

    pub fn with_output_dir(mut self, dir: &str) -> Self {
        self.config.output.dir = dir.to_string();
        self
    }

    pub fn with_floor(mut self, floor: &str) -> Self {
        self.config.versions.floor = floor.to_string();
        self
    }

    pub fn with_alias(mut self, version: &str, alias: &str) -> Self {
        self.config
            .versions
            .aliases
            .insert(version.to_string(), alias.to_string());
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.fetch.poll_interval_ms = ms;
        self
    }

    pub fn with_wait_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch.wait_timeout_secs = secs;
        self
    }

    pub fn with_compile_styles(mut self, cmd: &str) -> Self {
        self.config.commands.compile_styles = Some(cmd.to_string());
        self
    }

    pub fn with_copy_assets(mut self, cmd: &str) -> Self {
        self.config.commands.copy_assets = Some(cmd.to_string());
        self
    }

    pub fn with_generate(mut self, cmd: &str) -> Self {
        self.config.commands.generate = Some(cmd.to_string());
        self
    }

    pub fn with_generate_tutorials(mut self, cmd: Option<&str>) -> Self {
        self.config.commands.generate_tutorials = cmd.map(|c| c.to_string());
        self
    }

    pub fn with_emit_sitemap(mut self, cmd: &str) -> Self {
        self.config.commands.emit_sitemap = Some(cmd.to_string());
        self
    }

    pub fn without_command(mut self, name: &str) -> Self {
        match name {
            "compile_styles" => self.config.commands.compile_styles = None,
            "copy_assets" => self.config.commands.copy_assets = None,
            "generate" => self.config.commands.generate = None,
            "generate_tutorials" => self.config.commands.generate_tutorials = None,
            "emit_sitemap" => self.config.commands.emit_sitemap = None,
            other => panic!("unknown command field '{other}'"),
        }
        self
    }

    pub fn with_watch_group(
        mut self,
        name: &str,
        files: &[&str],
        exclude: &[&str],
        tasks: &[&str],
    ) -> Self {
        self.config.watch.insert(
            name.to_string(),
            WatchGroup {
                files: files.iter().map(|f| f.to_string()).collect(),
                exclude: exclude.iter().map(|e| e.to_string()).collect(),
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
                debounce_ms: 250,
            },
        );
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
