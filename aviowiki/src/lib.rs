mod aviowiki_url;
mod client;
pub mod domain;

pub use aviowiki_url::*;
pub use client::*;
