pub mod classify;
pub mod convert;
pub mod error;
pub mod mutation;
pub mod outline;
pub mod property;
