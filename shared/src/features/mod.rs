//! Feature construction: per-date records, the date table and derived columns

mod daily;
mod engineer;
mod table;

pub use daily::*;
pub use engineer::*;
pub use table::*;
