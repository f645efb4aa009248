//! Build settings. [`Config::default()`] is the site as it is laid out today;
//! a `site.toml` (or `site.json`) in the project root overrides any part.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, Chainable};
use crate::value::{Format, Json, Toml};

pub const CONFIG_FILES: &[&str] = &["site.toml", "site.json"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// The project directory. Never read from a file.
    #[serde(skip)]
    pub root: PathBuf,
    /// Required name of the project directory.
    pub project: String,
    pub site: SiteConfig,
    pub restaurants: RestaurantsConfig,
    pub music: MusicConfig,
    pub assets: AssetsConfig,
    pub compress: CompressConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub output: PathBuf,
    pub base: PathBuf,
    pub pages: PathBuf,
    pub fragment_suffix: String,
    pub css_dir: String,
    pub js_dir: String,
    /// Copied to the same relative path under `output`.
    pub static_files: Vec<PathBuf>,
    /// Copied recursively to the same relative path under `output`.
    pub static_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestaurantsConfig {
    pub page: String,
    pub data: PathBuf,
    pub cuisine_separator: String,
    /// Drop the first record after the header. The site's data has always
    /// been read this way.
    pub skip_first_record: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MusicConfig {
    pub page: String,
    /// Holds `<year>.csv` (albums) and `<year><songs_suffix>.csv` (songs).
    pub data_dir: PathBuf,
    pub songs_suffix: String,
    /// Site-relative directory of album art, one subdirectory per year.
    pub image_dir: String,
    pub newest_year: u16,
    pub oldest_album_year: u16,
    pub oldest_song_year: u16,
}

/// Third-party tags injected into a single page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub page: String,
    pub script: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompressConfig {
    pub targets: Vec<CompressTarget>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompressTarget {
    pub dir: PathBuf,
    pub quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::new(),
            project: "kyles_corner".into(),
            site: SiteConfig::default(),
            restaurants: RestaurantsConfig::default(),
            music: MusicConfig::default(),
            assets: AssetsConfig::default(),
            compress: CompressConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            output: "build".into(),
            base: "base.html".into(),
            pages: "pages".into(),
            fragment_suffix: "-overlay.html".into(),
            css_dir: "css".into(),
            js_dir: "js".into(),
            static_files: vec!["css/base.css".into(), "js/base.js".into(), "js/config.js".into()],
            static_dirs: vec!["css/fonts".into(), "images".into()],
        }
    }
}

impl Default for RestaurantsConfig {
    fn default() -> Self {
        RestaurantsConfig {
            page: "restaurants".into(),
            data: "csv/restaurants/san_antonio.csv".into(),
            cuisine_separator: " / ".into(),
            skip_first_record: true,
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        MusicConfig {
            page: "music".into(),
            data_dir: "csv/music".into(),
            songs_suffix: "_songs".into(),
            image_dir: "images/music".into(),
            newest_year: 2025,
            oldest_album_year: 2018,
            oldest_song_year: 2022,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            page: "restaurants".into(),
            script: concat!(
                r#"<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" "#,
                r#"integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=" "#,
                r#"crossorigin=""></script>"#,
            ).into(),
            link: concat!(
                r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" "#,
                r#"integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=" "#,
                r#"crossorigin=""/>"#,
            ).into(),
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        let years = (2018..=2025).map(|year| format!("images/music/{year}"));
        let targets = years.chain(["images/music/favorites".to_string()])
            .map(|dir| CompressTarget { dir: dir.into(), quality: 13 })
            .collect();

        CompressConfig { targets }
    }
}

impl MusicConfig {
    /// Album years, newest first.
    pub fn album_years(&self) -> impl Iterator<Item = u16> {
        (self.oldest_album_year..=self.newest_year).rev()
    }

    /// Song years, newest first.
    pub fn song_years(&self) -> impl Iterator<Item = u16> {
        (self.oldest_song_year..=self.newest_year).rev()
    }

    pub fn albums_file(&self, year: u16) -> PathBuf {
        self.data_dir.join(format!("{year}.csv"))
    }

    pub fn songs_file(&self, year: u16) -> PathBuf {
        self.data_dir.join(format!("{year}{}.csv", self.songs_suffix))
    }
}

impl Config {
    /// Defaults rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Config { root: root.into(), ..Config::default() }
    }

    /// Loads the configuration for the project at `root`: `explicit` if given,
    /// else the first of [`CONFIG_FILES`] present in `root`, else defaults.
    pub fn discover<P: Into<PathBuf>>(root: P, explicit: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => CONFIG_FILES.iter().map(|f| root.join(f)).find(|p| p.is_file()),
        };

        let mut config = match file {
            Some(path) => {
                tracing::debug!("reading configuration from {}", path.display());
                Config::read(&path)?
            }
            None => Config::default(),
        };

        config.root = root;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, as JSON if its extension is `json` and as
    /// TOML otherwise.
    pub fn read(path: &Path) -> Result<Self> {
        let is_json = path.extension().map_or(false, |e| e.eq_ignore_ascii_case("json"));
        let config = if is_json { Json::read(path) } else { Toml::read(path) };

        config.chain_with(|| error! {
            "invalid configuration file",
            "path" => path.display(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let music = &self.music;
        if music.newest_year < music.oldest_album_year || music.newest_year < music.oldest_song_year {
            return err! {
                "music years must run from oldest to newest",
                "newest year" => music.newest_year,
                "oldest album year" => music.oldest_album_year,
                "oldest song year" => music.oldest_song_year,
            };
        }

        if let Some(target) = self.compress.targets.iter().find(|t| t.quality > 100) {
            return err! {
                "JPEG quality must be between 0 and 100",
                "directory" => target.dir.display(),
                "quality" => target.quality,
            };
        }

        if self.site.fragment_suffix.is_empty() {
            return err!("page fragment suffix must not be empty");
        }

        if self.project.is_empty() {
            return err!("project directory name must not be empty");
        }

        Ok(())
    }

    /// Fails unless the project root's final component is named
    /// `self.project`. Both tools check this before touching any file.
    pub fn check_environment(&self) -> Result<()> {
        let name = self.root.file_name().map(|n| n.to_string_lossy());
        if name.as_deref() == Some(self.project.as_str()) {
            return Ok(());
        }

        err! {
            "this tool must be run from the project directory",
            "expected directory name" => self.project,
            "current directory" => self.root.display(),
        }
    }

    /// `path` relative to the project root.
    pub fn path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }

    /// The output directory.
    pub fn output(&self) -> PathBuf {
        self.root.join(&self.site.output)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn defaults_match_site_layout() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.music.album_years().collect::<Vec<_>>().first(), Some(&2025));
        assert_eq!(config.music.album_years().last(), Some(2018));
        assert_eq!(config.music.song_years().count(), 4);
        assert_eq!(config.music.songs_file(2023), PathBuf::from("csv/music/2023_songs.csv"));
        assert_eq!(config.compress.targets.len(), 9);
        assert!(config.compress.targets.iter().all(|t| t.quality == 13));
    }

    #[test]
    fn discover_overrides_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("site.toml"), r#"
            project = "elsewhere"

            [music]
            newest_year = 2026

            [[compress.targets]]
            dir = "images/photobook/china"
            quality = 8
        "#).unwrap();

        let config = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.project, "elsewhere");
        assert_eq!(config.music.newest_year, 2026);
        assert_eq!(config.music.oldest_album_year, 2018);
        assert_eq!(config.site, SiteConfig::default());
        assert_eq!(config.compress.targets, [CompressTarget {
            dir: "images/photobook/china".into(),
            quality: 8,
        }]);
    }

    #[test]
    fn discover_json_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{ "music": { "newest_year": 2000 } }"#).unwrap();

        let error = Config::discover(dir.path(), Some(&path)).unwrap_err();
        assert_eq!(error.message(), "music years must run from oldest to newest");
    }

    #[test]
    fn environment_guard() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::new(dir.path()).check_environment().is_err());
        assert!(Config::new(dir.path().join("kyles_corner")).check_environment().is_ok());
    }
}
