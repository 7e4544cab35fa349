mod merge;
mod models;
mod synthesizer;

pub(crate) use merge::*;
pub(crate) use models::*;
pub(crate) use synthesizer::*;
