pub mod error;
pub mod period;
