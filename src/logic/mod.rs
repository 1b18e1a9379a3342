pub mod canonical;
pub mod combine;
pub mod validate;

pub use canonical::*;
pub use combine::*;
pub use validate::*;
