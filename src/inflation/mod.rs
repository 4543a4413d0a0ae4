// Market-inflation analytics: realized and forward-looking inflation over
// matched auction data, adjusted for positional scarcity and per-team budget
// constraints.

pub mod budget;
pub mod engine;
pub mod scarcity;
