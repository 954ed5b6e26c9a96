use clap::ValueEnum;

/// The two axes of the combination space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    Genre,
    Type,
}

impl Dimension {
    /// Fixed key under which this dimension's owned list is persisted.
    pub fn store_key(self) -> &'static str {
        match self {
            Dimension::Genre => "gds_owned_genres",
            Dimension::Type => "gds_owned_types",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Dimension::Genre => "genre",
            Dimension::Type => "type",
        }
    }
}

/// The user's owned values per dimension. Lists are duplicate-free and keep
/// insertion order, which `enumerate_all` relies on for its tie ordering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Inventory {
    genres: Vec<String>,
    types: Vec<String>,
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

impl Inventory {
    pub fn new(genres: Vec<String>, types: Vec<String>) -> Inventory {
        Inventory {
            genres: dedupe(genres),
            types: dedupe(types),
        }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn owned(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Genre => &self.genres,
            Dimension::Type => &self.types,
        }
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.owned(dimension).iter().any(|owned| owned == value)
    }

    fn owned_mut(&mut self, dimension: Dimension) -> &mut Vec<String> {
        match dimension {
            Dimension::Genre => &mut self.genres,
            Dimension::Type => &mut self.types,
        }
    }

    /// Adds the value if absent, removes it if present. Returns whether the
    /// value is owned after the call.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) -> bool {
        let owned = self.owned_mut(dimension);
        if let Some(position) = owned.iter().position(|v| v == value) {
            owned.remove(position);
            false
        } else {
            owned.push(value.to_string());
            true
        }
    }

    /// Replaces the dimension's list with the given universe.
    pub fn select_all(&mut self, dimension: Dimension, universe: &[String]) {
        *self.owned_mut(dimension) = dedupe(universe.to_vec());
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.owned_mut(dimension).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn new_drops_duplicates_keeping_first_occurrence() {
        let inventory = Inventory::new(
            values(&["RPG", "Puzzle", "RPG"]),
            values(&["Fantasy", "Fantasy", "Art"]),
        );
        assert_eq!(inventory.genres(), ["RPG", "Puzzle"]);
        assert_eq!(inventory.types(), ["Fantasy", "Art"]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut inventory = Inventory::default();
        assert!(inventory.toggle(Dimension::Genre, "RPG"));
        assert!(inventory.contains(Dimension::Genre, "RPG"));
        assert!(!inventory.toggle(Dimension::Genre, "RPG"));
        assert!(!inventory.contains(Dimension::Genre, "RPG"));
        assert!(inventory.genres().is_empty());
    }

    #[test]
    fn toggle_keeps_insertion_order() {
        let mut inventory = Inventory::default();
        inventory.toggle(Dimension::Type, "Mushroom");
        inventory.toggle(Dimension::Type, "Art");
        inventory.toggle(Dimension::Type, "Fantasy");
        inventory.toggle(Dimension::Type, "Art");
        assert_eq!(inventory.types(), ["Mushroom", "Fantasy"]);
    }

    #[test]
    fn select_all_takes_the_universe() {
        let mut inventory = Inventory::default();
        inventory.toggle(Dimension::Genre, "RPG");
        let universe = values(&["Adventure", "Puzzle", "RPG"]);
        inventory.select_all(Dimension::Genre, &universe);
        assert_eq!(inventory.genres(), ["Adventure", "Puzzle", "RPG"]);
    }

    #[test]
    fn clear_empties_one_dimension_only() {
        let mut inventory = Inventory::new(values(&["RPG"]), values(&["Fantasy"]));
        inventory.clear(Dimension::Genre);
        assert!(inventory.genres().is_empty());
        assert_eq!(inventory.types(), ["Fantasy"]);
    }

    #[test]
    fn store_keys_are_fixed() {
        assert_eq!(Dimension::Genre.store_key(), "gds_owned_genres");
        assert_eq!(Dimension::Type.store_key(), "gds_owned_types");
    }
}
