// Scraped auction data: canonical typed records, the strict boundary parse
// that produces them, and the per-room fetch coalescing discipline.

pub mod coalesce;
pub mod parse;
pub mod types;
