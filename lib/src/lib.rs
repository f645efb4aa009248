#![doc = svgbobdoc::transform!(
//! The build pipeline for a small static personal site.
//!
//! # Overview
//!
//! The site is a handful of pages sharing one shell. Each page is a fragment
//! of HTML; a few pages also display tables read from delimited data files.
//! Two tools operate on a project directory:
//!
//!   * [`Builder`] assembles every page into a fresh output directory.
//!   * [`Compressor`] re-encodes the site's JPEGs in place.
//!
//! Both refuse to run unless the project directory carries the configured
//! name, and both are driven entirely by a [`Config`].
//!
//! ## Building
//!
//! ```svgbob
//!  +-----------+     +------------+     +------------+     +-----------+
//!  | base.html |     | pages/     |     | css/ js/   |     | csv/      |
//!  +-----+-----+     +-----+------+     +-----+------+     +-----+-----+
//!        |                 |                  |                  |
//!        v                 v                  v                  |
//!  +-----+-----+     +-----+------+     +-----+------+           |
//!  | Template  |     | Page       |<----+ assemble   |           |
//!  +-----+-----+     +-----+------+     +------------+           |
//!        |                 |                                     v
//!        |                 |                              +------+------+
//!        |                 +<-----------------------------+ Transform   |
//!        |                 |                              +-------------+
//!        v                 v
//!  +-----+-----------------+------+
//!  | render: one pass, one write  |
//!  +-------------+----------------+
//!                |
//!                v
//!          build/<page>.html
//! ```
//!
//! 1. The previous output is removed and the output layout recreated.
//! 2. Shared assets (stylesheet, scripts, fonts, images) are copied verbatim.
//! 3. Every `<page>-overlay.html` fragment becomes a [`Page`]. Its stylesheet
//!    is copied; its script, if there is one, is copied and referenced.
//! 4. [`Transform`]s fill data placeholders on their target pages: the
//!    restaurant table and cuisine filters, pinned third-party tags, and the
//!    album grids and song tables.
//! 5. Each page renders through the shell [`Template`] and is written once.
//!
//! Placeholders are named [`Slot`]s resolved in a single pass, so a value can
//! never be mistaken for a placeholder, and an unfilled required slot is an
//! error rather than a stray marker in the output.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod fstree;
pub mod value;
pub mod config;
pub mod template;
pub mod page;
pub mod data;
pub mod transform;
pub mod report;
pub mod build;
pub mod compress;

pub use build::Builder;
pub use compress::Compressor;
pub use config::Config;
pub use page::Page;
pub use report::{Policy, Report};
pub use template::{Slot, Slots, Template};
pub use transform::Transform;

pub use tracing;
