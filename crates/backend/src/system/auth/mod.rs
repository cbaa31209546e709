pub mod extractor;

pub use extractor::{CurrentActor, ACTOR_HEADER};
