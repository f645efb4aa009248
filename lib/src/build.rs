use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, Chainable};
use crate::fstree::FsTree;
use crate::page::Page;
use crate::report::{Policy, Report};
use crate::template::{Slot, Template};
use crate::transform::{self, Transform};
use crate::util::{copy_file, copy_tree};
use crate::value::Sink;

/// Assembles the site into the output directory.
///
/// Every page goes through two stages in memory, generic assembly and then
/// data transforms, and is written exactly once at the end.
#[derive(Debug)]
pub struct Builder<'c> {
    config: &'c Config,
    transforms: Vec<Box<dyn Transform>>,
}

/// A page fragment found in the pages directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub page: Arc<str>,
    pub path: PathBuf,
}

impl<'c> Builder<'c> {
    /// A builder running the site's default transforms.
    pub fn new(config: &'c Config) -> Self {
        Builder { config, transforms: transform::defaults() }
    }

    /// A builder running no transforms.
    pub fn bare(config: &'c Config) -> Self {
        Builder { config, transforms: vec![] }
    }

    pub fn transform<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn run(&self, policy: Policy) -> Result<Report> {
        self.config.check_environment()?;
        self.scaffold()?;
        self.copy_static()?;

        let shell = Template::read(self.config.path(&self.config.site.base).as_path())
            .chain(error!("failed to read the base template"))?;

        let mut report = Report::default();
        let mut pages = vec![];
        for fragment in self.fragments()? {
            let result = self.assemble(&fragment);
            if let Some(page) = report.attempt(policy, &fragment.path, result)? {
                pages.push(page);
            }
        }

        for transform in &self.transforms {
            let target = transform.target(self.config);
            let output = self.output_file(target);
            let result = match pages.iter_mut().find(|p| &*p.name == target) {
                Some(page) => transform.apply(self.config, page),
                None if self.was_attempted(&report, target) => continue,
                None => err! {
                    "page targeted by a data transform does not exist",
                    "page" => target,
                    "transform" => format!("{transform:?}"),
                },
            };

            let result = result.chain_with(|| error! {
                "failed to fill page with data",
                "page" => target,
            });

            if report.attempt(policy, &output, result)?.is_none() {
                pages.retain(|p| &*p.name != target);
            }
        }

        for page in &pages {
            let output = self.output_file(&page.name);
            let result = page.render(&shell).and_then(|html| output.write(&html));
            if report.attempt(policy, &output, result)?.is_some() {
                tracing::info!("wrote {}", output.display());
                report.complete(output);
            }
        }

        Ok(report)
    }

    /// Removes any previous output and recreates the output layout.
    pub fn scaffold(&self) -> Result<()> {
        let output = self.config.output();
        if output.exists() {
            fs::remove_dir_all(&output).chain_with(|| error! {
                "failed to remove previous output",
                "path" => output.display(),
            })?;
        }

        for dir in [&self.config.site.css_dir, &self.config.site.js_dir] {
            let path = output.join(dir);
            fs::create_dir_all(&path).chain_with(|| error! {
                "failed to create output directory",
                "path" => path.display(),
            })?;
        }

        Ok(())
    }

    /// Copies the shared stylesheet, scripts, fonts, and images as-is.
    pub fn copy_static(&self) -> Result<()> {
        let (site, output) = (&self.config.site, self.config.output());
        for file in &site.static_files {
            copy_file(&self.config.path(file), &output.join(file))?;
        }

        for dir in &site.static_dirs {
            let copied = copy_tree(&self.config.path(dir), &output.join(dir))?;
            tracing::info!("copied {} files from {}", copied, dir.display());
        }

        Ok(())
    }

    /// Fragments in the pages directory, by file name. Files without the
    /// fragment suffix are skipped.
    pub fn fragments(&self) -> Result<Vec<Fragment>> {
        let site = &self.config.site;
        let dir = self.config.path(&site.pages);
        let tree = FsTree::shallow(&dir).chain(error!("failed to read the pages directory"))?;

        let fragments = tree.child_files(tree.root_id())
            .filter_map(|entry| {
                let page = entry.file_name.strip_suffix(&*site.fragment_suffix)
                    .filter(|page| !page.is_empty());

                if page.is_none() {
                    tracing::debug!("skipping {}: not a page fragment", entry.path.display());
                }

                page.map(|page| Fragment { page: page.into(), path: entry.path.to_path_buf() })
            })
            .collect();

        Ok(fragments)
    }

    /// Reads a fragment into a page, copying its stylesheet (required) and
    /// script (optional) to the output.
    pub fn assemble(&self, fragment: &Fragment) -> Result<Page> {
        let (site, output) = (&self.config.site, self.config.output());
        let name = &*fragment.page;
        let mut page = Page::new(name, Template::read(fragment.path.as_path())?)?;

        let css = Path::new(&site.css_dir).join(format!("{name}.css"));
        copy_file(&self.config.path(&css), &output.join(&css))
            .chain_with(|| error!("every page needs a stylesheet", "page" => name))?;

        let js = Path::new(&site.js_dir).join(format!("{name}.js"));
        let js_source = self.config.path(&js);
        if js_source.is_file() {
            let script = format!(r#"<script type="module" src="{}/{name}.js"></script>"#, site.js_dir);
            page.fill(Slot::Script, script)?;
            copy_file(&js_source, &output.join(&js))?;
        }

        tracing::debug!("assembled {name}");
        Ok(page)
    }

    fn output_file(&self, page: &str) -> PathBuf {
        self.config.output().join(format!("{page}.html"))
    }

    fn was_attempted(&self, report: &Report, page: &str) -> bool {
        let output = self.output_file(page);
        report.failed.iter().any(|(unit, _)| {
            unit == &output || unit.file_name().and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(&*self.config.site.fragment_suffix))
                .map_or(false, |n| n == page)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn project() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("kyles_corner");
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join("js")).unwrap();
        fs::write(root.join("base.html"), "<h1>REPLACEME_PAGENAME</h1>REPLACEME_PAGECONTENT<!-- REPLACEME_SCRIPT -->").unwrap();

        let mut config = Config::new(root);
        config.site.static_files.clear();
        config.site.static_dirs.clear();
        (dir, config)
    }

    #[test]
    fn fragments_are_sorted_and_filtered() {
        let (_dir, config) = project();
        let pages = config.path("pages");
        fs::write(pages.join("zeta-overlay.html"), "z").unwrap();
        fs::write(pages.join("about-overlay.html"), "a").unwrap();
        fs::write(pages.join("notes.txt"), "n").unwrap();
        fs::write(pages.join("-overlay.html"), "?").unwrap();

        let names: Vec<_> = Builder::new(&config).fragments().unwrap()
            .into_iter()
            .map(|f| f.page.to_string())
            .collect();

        assert_eq!(names, ["about", "zeta"]);
    }

    #[test]
    fn script_is_optional_and_stylesheet_is_not() {
        let (_dir, config) = project();
        fs::write(config.path("pages/about-overlay.html"), "<p>about</p>").unwrap();
        fs::write(config.path("pages/links-overlay.html"), "<p>links</p>").unwrap();
        fs::write(config.path("css/about.css"), "p {}").unwrap();
        fs::write(config.path("css/links.css"), "p {}").unwrap();
        fs::write(config.path("js/links.js"), "export {}").unwrap();

        let report = Builder::bare(&config).run(Policy::FailFast).unwrap();
        assert_eq!(report.completed.len(), 2);

        let about = fs::read_to_string(config.output().join("about.html")).unwrap();
        assert_eq!(about, "<h1>about</h1><p>about</p>");
        assert!(!config.output().join("js/about.js").exists());

        let links = fs::read_to_string(config.output().join("links.html")).unwrap();
        assert!(links.ends_with(r#"<script type="module" src="js/links.js"></script>"#));
        assert!(config.output().join("js/links.js").is_file());
        assert!(config.output().join("css/links.css").is_file());

        fs::remove_file(config.path("css/about.css")).unwrap();
        let error = Builder::bare(&config).run(Policy::FailFast).unwrap_err();
        assert_eq!(error.message(), "every page needs a stylesheet");
    }

    #[test]
    fn keep_going_isolates_pages() {
        let (_dir, config) = project();
        fs::write(config.path("pages/about-overlay.html"), "<p>about</p>").unwrap();
        fs::write(config.path("pages/broken-overlay.html"), "<p>broken</p>").unwrap();
        fs::write(config.path("css/about.css"), "p {}").unwrap();

        let report = Builder::bare(&config).run(Policy::KeepGoing).unwrap();
        assert_eq!(report.completed, [config.output().join("about.html")]);
        assert_eq!(report.failed.len(), 1);
        assert!(!config.output().join("broken.html").exists());
    }

    #[test]
    fn scaffold_replaces_previous_output() {
        let (_dir, config) = project();
        fs::create_dir_all(config.output().join("stale")).unwrap();
        fs::write(config.output().join("stale/old.html"), "old").unwrap();

        Builder::bare(&config).scaffold().unwrap();
        assert!(!config.output().join("stale").exists());
        assert!(config.output().join("css").is_dir());
        assert!(config.output().join("js").is_dir());
    }

    #[test]
    fn missing_transform_target_fails() {
        let (_dir, config) = project();
        fs::write(config.path("pages/about-overlay.html"), "<p>about</p>").unwrap();
        fs::write(config.path("css/about.css"), "p {}").unwrap();

        let error = Builder::bare(&config)
            .transform(transform::ThirdPartyAssets)
            .run(Policy::FailFast)
            .unwrap_err();

        assert!(error.causes().any(|e| e.message() == "page targeted by a data transform does not exist"));
    }
}
