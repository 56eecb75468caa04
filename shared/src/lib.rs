pub mod error;
pub mod models;
pub mod validation;

pub use error::{VoteError, Result};
pub use models::*;
pub use validation::*;
