pub mod lanes;
pub mod rex;
pub mod spawn;
