// exported modules
pub mod error;
pub mod model;

// client impls
pub mod codeforces;

// re-exports
pub use codeforces::CodeforcesClient;
pub use error::*;
pub use model::*;

pub fn new_source(platform: Platform) -> Result<Box<dyn ProblemSource>> {
    use Platform::*;
    match platform {
        Codeforces => Ok(Box::new(CodeforcesClient::new()?)),
    }
}

// internal modules
mod http;
mod util;
