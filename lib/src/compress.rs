use std::fs;
use std::path::Path;

use image::ImageReader;
use jpeg_encoder::{ColorType, Encoder};

use crate::config::{CompressTarget, Config};
use crate::error::{Result, Chainable};
use crate::fstree::FsTree;
use crate::report::{Policy, Report};
use crate::util::has_extension;

pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Re-encodes JPEGs in place at each configured directory's quality.
#[derive(Debug)]
pub struct Compressor<'c> {
    config: &'c Config,
}

impl<'c> Compressor<'c> {
    pub fn new(config: &'c Config) -> Self {
        Compressor { config }
    }

    pub fn run(&self, policy: Policy) -> Result<Report> {
        self.config.check_environment()?;

        let mut report = Report::default();
        for target in &self.config.compress.targets {
            self.compress_target(target, policy, &mut report)?;
        }

        Ok(report)
    }

    /// Re-encodes the JPEGs directly inside `target.dir`. Subdirectories and
    /// other files are left alone.
    pub fn compress_target(&self, target: &CompressTarget, policy: Policy, report: &mut Report) -> Result<()> {
        let dir = self.config.path(&target.dir);
        let tree = FsTree::shallow(&dir).chain(error!("failed to list image directory"));
        let Some(tree) = report.attempt(policy, &dir, tree)? else {
            return Ok(());
        };

        for entry in tree.child_files(tree.root_id()) {
            if !has_extension(&entry.file_name, JPEG_EXTENSIONS) {
                tracing::debug!("skipping {}: not a JPEG", entry.path.display());
                continue;
            }

            let result = recompress(&entry.path, target.quality);
            if report.attempt(policy, &entry.path, result)?.is_some() {
                tracing::info!("compressed {}/{} to quality {}",
                    target.dir.display(), entry.file_name, target.quality);

                report.complete(entry.path.to_path_buf());
            }
        }

        Ok(())
    }
}

/// Decodes the image at `path` and overwrites it with a JPEG of `quality`
/// (1 to 100; 0 is treated as 1) using optimized Huffman tables.
pub fn recompress(path: &Path, quality: u8) -> Result<()> {
    let context = || error!("failed to re-encode image", "path" => path.display());
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .chain_with(context)?
        .decode()
        .chain_with(context)?;

    let (Ok(width), Ok(height)) = (u16::try_from(image.width()), u16::try_from(image.height())) else {
        return err! {
            "image is too large to encode as JPEG",
            "path" => path.display(),
            "dimensions" => format!("{}x{}", image.width(), image.height()),
        };
    };

    let (pixels, color) = if image.color().has_color() {
        (image.to_rgb8().into_raw(), ColorType::Rgb)
    } else {
        (image.to_luma8().into_raw(), ColorType::Luma)
    };

    let mut encoded = Vec::new();
    let mut encoder = Encoder::new(&mut encoded, quality.clamp(1, 100));
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(&pixels, width, height, color).chain_with(context)?;

    fs::write(path, &encoded).chain_with(context)
}
