mod airport;
mod search_page;

pub use airport::*;
pub use search_page::*;
