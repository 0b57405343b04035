pub mod extracted;
pub mod record;

pub use extracted::*;
pub use record::*;
