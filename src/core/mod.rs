pub mod domain;
pub mod morton;
pub mod spatial;
