mod checks;
mod concept;
mod engine;

pub use engine::{completion, validate};
