pub mod legacy;
pub mod mem;
pub mod postgres;
pub mod traits;

pub use legacy::*;
pub use mem::*;
pub use postgres::*;
pub use traits::*;
