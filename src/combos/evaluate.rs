use super::rating::{Rating, RatingFilter};
use super::table::ComboTable;

/// One evaluated pairing. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboResult {
    pub genre: String,
    pub game_type: String,
    pub rating: Rating,
}

/// Rates a single pick. `None` when either side is still unselected (empty
/// string), which the caller treats as "no selection yet" rather than an
/// error.
pub fn rate_one(table: &ComboTable, genre: &str, game_type: &str) -> Option<ComboResult> {
    if genre.is_empty() || game_type.is_empty() {
        return None;
    }
    Some(ComboResult {
        genre: genre.to_string(),
        game_type: game_type.to_string(),
        rating: table.rating_of(genre, game_type),
    })
}

/// Rates the full cross-product of the owned sets, best ratings first. The
/// sort is stable, so entries with the same rating keep the enumeration order
/// (genres outer, types inner).
pub fn enumerate_all(
    table: &ComboTable,
    owned_genres: &[String],
    owned_types: &[String],
) -> Vec<ComboResult> {
    let mut results = Vec::with_capacity(owned_genres.len() * owned_types.len());
    for genre in owned_genres {
        for game_type in owned_types {
            results.push(ComboResult {
                genre: genre.clone(),
                game_type: game_type.clone(),
                rating: table.rating_of(genre, game_type),
            });
        }
    }
    results.sort_by_key(|result| result.rating.priority());
    results
}

/// Keeps only the results matching the filter, order preserved. `All` is the
/// identity.
pub fn filter_by_rating(mut results: Vec<ComboResult>, filter: RatingFilter) -> Vec<ComboResult> {
    if let RatingFilter::Only(rating) = filter {
        results.retain(|result| result.rating == rating);
    }
    results
}

/// The owned pairs reaching the Amazing tier. For each owned genre, in owned
/// order, walks that genre's Amazing-tier list in its source order and keeps
/// the types the user owns. Deliberately not the same ordering as
/// `enumerate_all` filtered to Amazing: there ties follow owned-types order,
/// here they follow the tier list.
pub fn best_combos(
    table: &ComboTable,
    owned_genres: &[String],
    owned_types: &[String],
) -> Vec<(String, String)> {
    let mut combos = Vec::new();
    for genre in owned_genres {
        for game_type in table.amazing_types(genre) {
            if owned_types.iter().any(|owned| owned == game_type) {
                combos.push((genre.clone(), game_type.clone()));
            }
        }
    }
    combos
}
