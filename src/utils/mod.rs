pub mod clipboard;
pub mod fs;
pub mod id;
pub mod jsonpath;
