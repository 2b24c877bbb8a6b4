pub mod address;
pub mod record;
pub mod schema;
pub mod table;

pub use address::*;
pub use record::*;
pub use table::*;
