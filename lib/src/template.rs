//! Named-slot templates.
//!
//! A [`Template`] is parsed once into literal text and [`Slot`] segments.
//! Rendering walks the segments and writes each slot's [`Fill`] verbatim; the
//! output is never rescanned, so a value can't be mistaken for a placeholder.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use derive_more::{Debug, Deref, From};
use memchr::memmem;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::value::Source;

/// Every placeholder the site's sources may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    PageContent,
    PageName,
    Script,
    ExtraScript,
    ExtraLink,
    RestaurantRows,
    CuisineRows,
    AlbumGrid,
}

const TOKEN_PREFIX: &str = "REPLACEME_";
const COMMENT_OPEN: &str = "<!-- ";
const COMMENT_CLOSE: &str = " -->";

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::PageContent,
        Slot::PageName,
        Slot::Script,
        Slot::ExtraScript,
        Slot::ExtraLink,
        Slot::RestaurantRows,
        Slot::CuisineRows,
        Slot::AlbumGrid,
    ];

    /// The bare token, e.g. `REPLACEME_PAGENAME`.
    pub const fn token(self) -> &'static str {
        match self {
            Slot::PageContent => "REPLACEME_PAGECONTENT",
            Slot::PageName => "REPLACEME_PAGENAME",
            Slot::Script => "REPLACEME_SCRIPT",
            Slot::ExtraScript => "REPLACEME_EXTRASCRIPT",
            Slot::ExtraLink => "REPLACEME_EXTRALINK",
            Slot::RestaurantRows => "REPLACEME_RESTAURANTROWS",
            Slot::CuisineRows => "REPLACEME_CUISINEROWS",
            Slot::AlbumGrid => "REPLACEME_ALBUMGRID",
        }
    }

    /// Comment slots only match as `<!-- TOKEN -->` and may be left unfilled.
    pub const fn is_comment(self) -> bool {
        matches!(self, Slot::Script | Slot::ExtraScript | Slot::ExtraLink)
    }

    /// The exact text this slot replaces in a source.
    pub fn marker(self) -> String {
        if self.is_comment() {
            format!("{COMMENT_OPEN}{}{COMMENT_CLOSE}", self.token())
        } else {
            self.token().to_string()
        }
    }

    /// If `source[at..]` begins with this slot's token, the byte range of the
    /// full marker.
    fn match_at(self, source: &str, at: usize) -> Option<Range<usize>> {
        if !source[at..].starts_with(self.token()) {
            return None;
        }

        let end = at + self.token().len();
        if !self.is_comment() {
            return Some(at..end);
        }

        let opened = source[..at].ends_with(COMMENT_OPEN);
        let closed = source[end..].starts_with(COMMENT_CLOSE);
        (opened && closed).then(|| (at - COMMENT_OPEN.len())..(end + COMMENT_CLOSE.len()))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marker())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(Range<usize>),
    Slot(Slot),
}

#[derive(Debug, Clone)]
pub struct Template {
    name: Arc<str>,
    #[debug(ignore)]
    source: Arc<str>,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Template {
        let (name, source) = (name.into(), source.into());
        let mut segments = vec![];
        let mut cursor = 0;
        for at in memmem::find_iter(source.as_bytes(), TOKEN_PREFIX) {
            if at < cursor {
                continue;
            }

            let found = Slot::ALL.iter()
                .find_map(|&slot| slot.match_at(&source, at).map(|range| (slot, range)));

            if let Some((slot, range)) = found {
                if range.start > cursor {
                    segments.push(Segment::Text(cursor..range.start));
                }

                segments.push(Segment::Slot(slot));
                cursor = range.end;
            }
        }

        if cursor < source.len() {
            segments.push(Segment::Text(cursor..source.len()));
        }

        Template { name, source, segments }
    }

    /// Reads and parses `input`, naming the template after its path.
    pub fn read<I: Source>(input: I) -> Result<Template> {
        let name = input.path()
            .map(Path::display)
            .map_or_else(|| "<string>".to_string(), |p| p.to_string());

        Ok(Template::parse(name, input.read()?))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The slots in order of appearance, with repeats.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(*slot),
            Segment::Text(_) => None,
        })
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.slots().filter(|&s| s == slot).count()
    }

    pub fn has_slots(&self) -> bool {
        self.slots().next().is_some()
    }

    /// Renders `self` with `slots`. Every non-comment slot must be filled;
    /// unfilled comment slots render as nothing.
    pub fn render(&self, slots: &Slots) -> Result<String> {
        let mut output = String::with_capacity(self.source.len());
        self.render_into(slots, &mut output, None)?;
        Ok(output)
    }

    fn render_into(&self, slots: &Slots, out: &mut String, outer: Option<&Template>) -> Result<()> {
        for segment in &self.segments {
            let slot = match segment {
                Segment::Text(range) => {
                    out.push_str(&self.source[range.clone()]);
                    continue;
                }
                Segment::Slot(slot) => *slot,
            };

            match slots.get(&slot) {
                Some(Fill::Text(text)) => out.push_str(text),
                Some(Fill::Template(inner)) => match outer {
                    None => inner.render_into(slots, out, Some(self))?,
                    Some(outer) => return err! {
                        "placeholder repeats inside its own replacement",
                        "placeholder" => slot,
                        "template" => self.name,
                        "enclosing template" => outer.name,
                    },
                },
                None if slot.is_comment() => {},
                None => return err! {
                    "placeholder was never filled",
                    "placeholder" => slot,
                    "template" => self.name,
                    if outer.is_some() => "enclosing template" => outer.map_or("", |t| &*t.name),
                },
            }
        }

        Ok(())
    }
}

/// What a slot renders as.
#[derive(Debug, Clone, From)]
pub enum Fill {
    Text(Arc<str>),
    Template(Template),
}

impl From<String> for Fill {
    fn from(value: String) -> Self {
        Fill::Text(value.into())
    }
}

impl From<&str> for Fill {
    fn from(value: &str) -> Self {
        Fill::Text(value.into())
    }
}

/// Slot values for one render.
#[derive(Debug, Clone, Default, Deref)]
pub struct Slots(FxHashMap<Slot, Fill>);

impl Slots {
    pub fn new() -> Self {
        Slots::default()
    }

    /// Sets `slot` to `fill`, returning the previous fill. Text that itself
    /// contains a placeholder marker is rejected.
    pub fn insert(&mut self, slot: Slot, fill: impl Into<Fill>) -> Result<Option<Fill>> {
        let fill = fill.into();
        if let Fill::Text(text) = &fill {
            let parsed = Template::parse("", text.clone());
            let leaked = parsed.slots().next();
            if let Some(leaked) = leaked {
                return err! {
                    "value contains a placeholder marker",
                    "slot being filled" => slot,
                    "marker found" => leaked,
                };
            }
        }

        Ok(self.0.insert(slot, fill))
    }

    /// [`Slots::insert()`], for chaining.
    pub fn with(mut self, slot: Slot, fill: impl Into<Fill>) -> Result<Self> {
        self.insert(slot, fill)?;
        Ok(self)
    }
}
