use std::sync::Arc;

use crate::error::Result;
use crate::template::{Fill, Slot, Slots, Template};

/// A page between assembly and output: its fragment plus every slot value
/// gathered for it so far. Nothing is written until [`Page::render()`].
#[derive(Debug, Clone)]
pub struct Page {
    pub name: Arc<str>,
    pub slots: Slots,
}

impl Page {
    pub fn new(name: impl Into<Arc<str>>, fragment: Template) -> Result<Page> {
        let name = name.into();
        let slots = Slots::new()
            .with(Slot::PageName, name.clone())?
            .with(Slot::PageContent, fragment)?;

        Ok(Page { name, slots })
    }

    pub fn fragment(&self) -> Option<&Template> {
        match self.slots.get(&Slot::PageContent) {
            Some(Fill::Template(fragment)) => Some(fragment),
            _ => None,
        }
    }

    pub fn fill(&mut self, slot: Slot, fill: impl Into<Fill>) -> Result<()> {
        self.slots.insert(slot, fill)?;
        Ok(())
    }

    /// Fails unless the page's fragment contains `slot`.
    pub fn require(&self, slot: Slot) -> Result<()> {
        if self.fragment().map_or(0, |f| f.count(slot)) > 0 {
            return Ok(());
        }

        err! {
            "page is missing a data placeholder",
            "page" => self.name,
            "placeholder" => slot,
        }
    }

    /// The complete document: `shell` with this page's slots filled.
    pub fn render(&self, shell: &Template) -> Result<String> {
        shell.render(&self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_through_shell() {
        let shell = Template::parse("base.html", "<title>REPLACEME_PAGENAME</title>REPLACEME_PAGECONTENT<!-- REPLACEME_SCRIPT -->");
        let fragment = Template::parse("about-overlay.html", "<p>hi</p>");
        let mut page = Page::new("about", fragment).unwrap();

        assert_eq!(page.render(&shell).unwrap(), "<title>about</title><p>hi</p>");

        page.fill(Slot::Script, r#"<script type="module" src="js/about.js"></script>"#).unwrap();
        assert!(page.render(&shell).unwrap().ends_with(r#"<script type="module" src="js/about.js"></script>"#));
    }

    #[test]
    fn require_checks_fragment_only() {
        let page = Page::new("music", Template::parse("m", "REPLACEME_ALBUMGRID")).unwrap();
        assert!(page.require(Slot::AlbumGrid).is_ok());
        assert!(page.require(Slot::RestaurantRows).is_err());
    }
}
