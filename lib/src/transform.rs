//! Data passes run on assembled pages before they're written.

use std::fmt::Debug;

use crate::config::Config;
use crate::data::*;
use crate::error::{Result, Chainable};
use crate::page::Page;
use crate::template::Slot;

pub trait Transform: Debug {
    /// Name of the page this transform fills in.
    fn target<'c>(&self, config: &'c Config) -> &'c str;

    fn apply(&self, config: &Config, page: &mut Page) -> Result<()>;
}

/// The restaurant table and its cuisine filters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Restaurants;

impl Transform for Restaurants {
    fn target<'c>(&self, config: &'c Config) -> &'c str {
        &config.restaurants.page
    }

    fn apply(&self, config: &Config, page: &mut Page) -> Result<()> {
        let settings = &config.restaurants;
        page.require(Slot::RestaurantRows)?;
        page.require(Slot::CuisineRows)?;

        let path = config.path(&settings.data);
        let skip = usize::from(settings.skip_first_record);
        let restaurants = Restaurant::load(path.as_path(), skip)?;
        let tags = Restaurant::cuisine_tags(&restaurants, &settings.cuisine_separator);

        page.fill(Slot::RestaurantRows, RestaurantRows(&restaurants).to_string())?;
        page.fill(Slot::CuisineRows, CuisineFilters(&tags).to_string())?;
        tracing::info!("{}: {} restaurants, {} cuisines", page.name, restaurants.len(), tags.len());
        Ok(())
    }
}

/// Externally hosted script and stylesheet tags, pinned by integrity hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThirdPartyAssets;

impl Transform for ThirdPartyAssets {
    fn target<'c>(&self, config: &'c Config) -> &'c str {
        &config.assets.page
    }

    fn apply(&self, config: &Config, page: &mut Page) -> Result<()> {
        page.fill(Slot::ExtraScript, config.assets.script.as_str())?;
        page.fill(Slot::ExtraLink, config.assets.link.as_str())
    }
}

/// Album grids, then song tables, for each configured year, newest first.
#[derive(Debug, Default, Clone, Copy)]
pub struct Music;

impl Transform for Music {
    fn target<'c>(&self, config: &'c Config) -> &'c str {
        &config.music.page
    }

    fn apply(&self, config: &Config, page: &mut Page) -> Result<()> {
        let settings = &config.music;
        page.require(Slot::AlbumGrid)?;

        let mut html = String::new();
        for year in settings.album_years() {
            let path = config.path(settings.albums_file(year));
            let albums = Album::load(path.as_path(), year)
                .chain_with(|| error!("failed to load albums", "year" => year))?;

            let grid = AlbumGrid { year, albums: &albums, image_dir: &settings.image_dir };
            html.push_str(&grid.to_string());
            tracing::debug!("{year}: {} albums", albums.len());
        }

        for year in settings.song_years() {
            let path = config.path(settings.songs_file(year));
            let songs = Song::load(path.as_path(), year)
                .chain_with(|| error!("failed to load songs", "year" => year))?;

            html.push_str(&SongTable { year, songs: &songs }.to_string());
            tracing::debug!("{year}: {} songs", songs.len());
        }

        page.fill(Slot::AlbumGrid, html)
    }
}

/// The site's transforms, in the order they run.
pub fn defaults() -> Vec<Box<dyn Transform>> {
    vec![Box::new(Restaurants), Box::new(ThirdPartyAssets), Box::new(Music)]
}
