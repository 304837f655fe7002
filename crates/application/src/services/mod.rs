pub mod member_service;
pub mod room_service;

#[cfg(test)]
mod room_service_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use member_service::*;
pub use room_service::*;
