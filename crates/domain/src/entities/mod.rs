pub mod member;
pub mod room;

pub use member::*;
pub use room::*;
