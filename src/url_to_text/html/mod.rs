mod parser;
mod selectors;

pub use parser::ContentParser;
