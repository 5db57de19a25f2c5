//! Text reports for search and reverse lookups.

use std::fmt;

use crate::api::Place;
use crate::links::Links;

/// A place with its derived links, as printed in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceEntry {
    pub name: String,
    pub view_url: String,
    pub edit_url: String,
}

impl PlaceEntry {
    pub fn new(place: &Place, links: &Links) -> Self {
        let (view_url, edit_url) = links.for_point(place.point());
        Self {
            name: place.display_name.clone(),
            view_url,
            edit_url,
        }
    }
}

impl fmt::Display for PlaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, view on OSM: <{}>, edit in JOSM: <{}>",
            self.name, self.view_url, self.edit_url
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeGroup {
    pub name: String,
    pub places: Vec<PlaceEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub name: String,
    pub types: Vec<TypeGroup>,
}

/// Search results grouped by category, then type.
///
/// Groups keep the order in which their first member was inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedReport {
    categories: Vec<CategoryGroup>,
}

impl GroupedReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_places(places: &[Place], links: &Links) -> Self {
        let mut report = Self::new();
        for place in places {
            report.insert(&place.category, &place.type_, PlaceEntry::new(place, links));
        }
        report
    }

    pub fn insert(&mut self, category: &str, type_: &str, entry: PlaceEntry) {
        let idx = match self.categories.iter().position(|c| c.name == category) {
            Some(idx) => idx,
            None => {
                self.categories.push(CategoryGroup {
                    name: category.to_string(),
                    types: Vec::new(),
                });
                self.categories.len() - 1
            }
        };
        let types = &mut self.categories[idx].types;

        match types.iter_mut().find(|t| t.name == type_) {
            Some(group) => group.places.push(entry),
            None => types.push(TypeGroup {
                name: type_.to_string(),
                places: vec![entry],
            }),
        }
    }

    pub fn categories(&self) -> &[CategoryGroup] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.types)
            .map(|t| t.places.len())
            .sum()
    }
}

impl fmt::Display for GroupedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in &self.categories {
            writeln!(f, "{}", category.name)?;
            for group in &category.types {
                writeln!(f, "  {}", group.name)?;
                for place in &group.places {
                    writeln!(f, "    {}", place)?;
                }
            }
        }
        Ok(())
    }
}

/// One-line answer to a reverse lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseReport {
    pub category: String,
    pub type_: String,
    pub entry: PlaceEntry,
}

impl fmt::Display for ReverseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.category, self.type_, self.entry)
    }
}
