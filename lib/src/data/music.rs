use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::util::normalize_key;
use crate::value::{Csv, Source};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    #[serde(rename = "Album")]
    pub title: String,
    /// Comma-separated; the first is the primary artist.
    #[serde(rename = "Artist")]
    pub artists: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Rating", deserialize_with = "padded_f64")]
    pub rating: f64,
    #[serde(rename = "Favorite Songs")]
    pub favorites: String,
    /// The year of the file the album was listed in.
    #[serde(skip)]
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Song {
    #[serde(rename = "Song")]
    pub title: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(skip)]
    pub year: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn of(rating: f64) -> Option<Tier> {
        match rating {
            r if r >= 9.0 => Some(Tier::Gold),
            r if r >= 8.0 => Some(Tier::Silver),
            r if r >= 7.0 => Some(Tier::Bronze),
            _ => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }
}

/// A number that may be padded with whitespace, e.g. ` 9.2`.
fn padded_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.trim().parse().map_err(serde::de::Error::custom)
}

impl Album {
    pub fn load<I: Source>(input: I, year: u16) -> Result<Vec<Album>> {
        let mut albums: Vec<Album> = Csv::default().records(input)?;
        albums.iter_mut().for_each(|a| a.year = year);
        Ok(albums)
    }

    pub fn tier(&self) -> Option<Tier> {
        Tier::of(self.rating)
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.split(',').next().unwrap_or_default()
    }

    /// `<artist>_<album>`, both normalized: the file stem of the album's art.
    pub fn image_key(&self) -> String {
        format!("{}_{}", normalize_key(self.primary_artist()), normalize_key(&self.title))
    }

    /// Site-relative path of the album's art under `image_dir`.
    pub fn image_path(&self, image_dir: &str) -> String {
        format!("{image_dir}/{}/{}.jpg", self.year, self.image_key())
    }
}

impl Song {
    pub fn load<I: Source>(input: I, year: u16) -> Result<Vec<Song>> {
        let mut songs: Vec<Song> = Csv::default().records(input)?;
        songs.iter_mut().for_each(|s| s.year = year);
        Ok(songs)
    }
}

/// A year's album grid: one block per album, framed by its tier.
#[derive(Debug, Clone, Copy)]
pub struct AlbumGrid<'a> {
    pub year: u16,
    pub albums: &'a [Album],
    pub image_dir: &'a str,
}

impl fmt::Display for AlbumGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<div class="album-grid" id="album-grid-{}">"#, self.year)?;
        for album in self.albums {
            let tier = album.tier().map_or("", Tier::class);
            write!(f, "\t")?;
            write!(f, r#"<div class="album-block {tier}">"#)?;
            write!(f, r#"<img class="album-img" src="{}" width="135px" height="135px">"#, album.image_path(self.image_dir))?;
            write!(f, r#"<div class="album-name"><i>{}</i></div>"#, album.title)?;
            write!(f, r#"<div class="album-artist"><b>By: </b><u>{}</u></div>"#, album.artists)?;
            write!(f, r#"<div class="album-genre"><b>Genre: </b>{}</div>"#, album.genre)?;
            write!(f, r#"<div class="album-favorites hidden">{}</div>"#, album.favorites)?;
            write!(f, r#"<div class="album-year hidden"><b>Release year: </b>{}</div>"#, album.year)?;
            writeln!(f, "</div>")?;
        }

        writeln!(f, "</div>")
    }
}

/// A year's song table.
#[derive(Debug, Clone, Copy)]
pub struct SongTable<'a> {
    pub year: u16,
    pub songs: &'a [Song],
}

impl fmt::Display for SongTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<table class="song-table" id="song-table-{}">"#, self.year)?;
        write!(f, "\t")?;
        write!(f, r#"<thead class="song-table-header"><tr class="song-row">"#)?;
        write!(f, r#"<th class="song-name">Song</th><th class="song-artist">Artist</th>"#)?;
        write!(f, r#"<th class="song-album">Album</th><th class="song-genre">Genre</th>"#)?;
        writeln!(f, r#"<th class="song-year hidden">Year</th></tr></thead>"#)?;

        write!(f, "\t<tbody>")?;
        for song in self.songs {
            write!(f, "\t\t")?;
            write!(f, r#"<tr class="song-row">"#)?;
            write!(f, r#"<td class="song-name">{}</td>"#, song.title)?;
            write!(f, r#"<td class="song-artist">{}</td>"#, song.artist)?;
            write!(f, r#"<td class="song-album">{}</td>"#, song.album)?;
            write!(f, r#"<td class="song-genre">{}</td>"#, song.genre)?;
            write!(f, r#"<td class="song-year hidden">{}</td>"#, song.year)?;
            writeln!(f, "</tr>")?;
        }

        writeln!(f, "\t</tbody></table>")
    }
}
