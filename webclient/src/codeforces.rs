pub mod client;
pub mod urls;
mod helper;

pub use client::*;
pub use helper::{scrape_problem_ids, scrape_samples, scrape_title};
pub use urls::*;
