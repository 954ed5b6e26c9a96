mod evaluate;
mod load;
mod rating;
mod table;

pub use evaluate::{best_combos, enumerate_all, filter_by_rating, rate_one, ComboResult};
pub use load::{load_table, TierData};
pub use rating::{Rating, RatingFilter};
pub use table::{ComboTable, Problem as TableProblem, TableBuild, SEEDED_TYPES};
