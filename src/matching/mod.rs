// Player identity resolution: normalization of free-text identity fields and
// the scored matcher that reconciles scraped auction rows with projections.

pub mod matcher;
pub mod normalize;
