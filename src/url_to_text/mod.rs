//! Turning a recipe web page into text a model can read.

pub mod fetchers;
pub mod html;
