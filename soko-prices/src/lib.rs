#[cfg(feature = "api")]
pub mod amis;
pub mod county;
pub mod error;
pub mod record;
