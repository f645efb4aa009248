use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use crate::error::Result;
use crate::value::{Csv, Source};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Restaurant {
    pub name: String,
    /// One or more cuisines joined by a separator, e.g. `Thai / Vegan`.
    pub cuisine: String,
    pub visited: String,
    pub rating: String,
    pub notes: String,
    pub gps: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
}

impl Restaurant {
    /// Reads every record of `input`, discarding the first `skip`.
    pub fn load<I: Source>(input: I, skip: usize) -> Result<Vec<Restaurant>> {
        Csv::default().skip(skip).records(input)
    }

    pub fn cuisines<'a>(&'a self, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.cuisine.split(separator)
    }

    /// Distinct cuisines across `restaurants`, sorted. Case-sensitive.
    pub fn cuisine_tags<'a, I>(restaurants: I, separator: &str) -> BTreeSet<&'a str>
        where I: IntoIterator<Item = &'a Restaurant>
    {
        restaurants.into_iter()
            .flat_map(|r| r.cuisine.split(separator))
            .collect()
    }
}

/// Table rows, one per restaurant. Rating, notes, location, and source are
/// hidden columns: searchable and read by scripts, never displayed.
#[derive(Debug, Clone, Copy)]
pub struct RestaurantRows<'a>(pub &'a [Restaurant]);

impl fmt::Display for RestaurantRows<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in self.0 {
            write!(f, "<tr>")?;
            write!(f, r#"<td class="name">{}</td>"#, r.name)?;
            write!(f, r#"<td class="cuisine">{}</td>"#, r.cuisine)?;
            write!(f, r#"<td class="visited">{}</td>"#, r.visited)?;
            write!(f, r#"<td class="shown"><input type="checkbox" onclick="manuallySelectRestaurant(this)" checked=""></td>"#)?;
            write!(f, r#"<td class="rating hidden">{}</td>"#, r.rating)?;
            write!(f, r#"<td class="notes hidden">{}</td>"#, r.notes)?;
            write!(f, r#"<td class="gps hidden">{}</td>"#, r.gps)?;
            write!(f, r#"<td class="originalUrl hidden">{}</td>"#, r.original_url)?;
            writeln!(f, "</tr>")?;
        }

        Ok(())
    }
}

/// One filter checkbox per cuisine, in iteration order.
#[derive(Debug, Clone, Copy)]
pub struct CuisineFilters<'a>(pub &'a BTreeSet<&'a str>);

impl fmt::Display for CuisineFilters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cuisine in self.0 {
            write!(f, r#"<div class="multi-option"><label><input type="checkbox">{cuisine}</label></div>"#)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
name,cuisine,visited,rating,notes,gps,originalUrl
Header Echo,Mexican,no,,,,
Taco Haven,Mexican / Tex-Mex,yes,8,Great salsa,\"29.4,-98.5\",https://example.com/a
Pho Place,Vietnamese,no,,,,
Mi Tierra,Mexican,yes,7,Late night,\"29.4,-98.4\",https://example.com/b
";

    #[test]
    fn load_skips_requested_records() {
        assert_eq!(Restaurant::load(DATA, 0).unwrap().len(), 4);

        let restaurants = Restaurant::load(DATA, 1).unwrap();
        assert_eq!(restaurants.len(), 3);
        assert_eq!(restaurants[0].name, "Taco Haven");
        assert_eq!(restaurants[0].gps, "29.4,-98.5");
        assert_eq!(restaurants[0].original_url, "https://example.com/a");
    }

    #[test]
    fn cuisine_tags_are_distinct_and_sorted() {
        let restaurants = Restaurant::load(DATA, 1).unwrap();
        let tags = Restaurant::cuisine_tags(&restaurants, " / ");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["Mexican", "Tex-Mex", "Vietnamese"]);

        let filters = CuisineFilters(&Restaurant::cuisine_tags(&restaurants, " / ")).to_string();
        assert_eq!(filters.matches("multi-option").count(), 3);
        assert_eq!(filters.matches(">Mexican<").count(), 1);
        assert!(filters.find("Tex-Mex").unwrap() < filters.find("Vietnamese").unwrap());
    }

    #[test]
    fn cuisine_tags_are_case_sensitive() {
        let a = Restaurant { cuisine: "thai".into(), ..sample() };
        let b = Restaurant { cuisine: "Thai / thai".into(), ..sample() };
        let tags = Restaurant::cuisine_tags([&a, &b], " / ");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["Thai", "thai"]);
    }

    #[test]
    fn rows_render_one_per_record_with_hidden_columns() {
        let restaurants = Restaurant::load(DATA, 1).unwrap();
        let rows = RestaurantRows(&restaurants).to_string();
        assert_eq!(rows.lines().count(), 3);

        let first = rows.lines().next().unwrap();
        assert!(first.starts_with(r#"<tr><td class="name">Taco Haven</td><td class="cuisine">Mexican / Tex-Mex</td>"#));
        assert!(first.contains(r#"<td class="rating hidden">8</td>"#));
        assert!(first.contains(r#"<td class="notes hidden">Great salsa</td>"#));
        assert!(first.contains(r#"<td class="gps hidden">29.4,-98.5</td>"#));
        assert!(first.ends_with(r#"<td class="originalUrl hidden">https://example.com/a</td></tr>"#));
    }

    fn sample() -> Restaurant {
        Restaurant {
            name: "x".into(),
            cuisine: String::new(),
            visited: "no".into(),
            rating: String::new(),
            notes: String::new(),
            gps: String::new(),
            original_url: String::new(),
        }
    }
}
