pub mod booking;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod runtime;
pub mod search;

pub use aviowiki::domain::Airport;
