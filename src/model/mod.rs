mod content;
mod review;
mod schema;

pub use content::{Content, Mcq};
pub use review::{Review, ReviewStatus};
pub use schema::Schema;
