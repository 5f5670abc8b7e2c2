mod engine;
mod replay;

pub use engine::{NavError, NextState, next};
pub use replay::{Prompt, replay};
