//! Records read from the site's delimited data files and the HTML they render
//! as. Files are expected in display order; only derived tag sets are sorted.

pub mod restaurants;
pub mod music;

pub use restaurants::{Restaurant, RestaurantRows, CuisineFilters};
pub use music::{Album, Song, Tier, AlbumGrid, SongTable};
