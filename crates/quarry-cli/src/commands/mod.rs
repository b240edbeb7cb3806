//! Command implementations.

pub mod describe;
pub mod load;
pub mod profile;
pub mod search;

pub use self::describe::execute_describe;
pub use self::load::execute_load;
pub use self::profile::execute_profile;
pub use self::search::execute_search;
