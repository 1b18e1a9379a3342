pub mod combination;
pub mod requests;
pub mod sentinels;

pub use combination::*;
pub use requests::*;
pub use sentinels::*;
