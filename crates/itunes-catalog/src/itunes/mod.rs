mod client;
mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use client::*;
pub use parser::ParseError;
pub use types::*;
