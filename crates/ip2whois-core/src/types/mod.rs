mod date;
mod query;
mod record;

pub use date::*;
pub use query::*;
pub use record::*;
