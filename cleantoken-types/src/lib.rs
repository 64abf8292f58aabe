pub mod forecast;
pub mod perk;
pub mod series;
pub mod transaction;

pub use forecast::{ForecastMethod, ForecastResult};
pub use perk::{Perk, PerkCatalog};
pub use series::{Reading, Series, SeriesError};
pub use transaction::Transaction;
