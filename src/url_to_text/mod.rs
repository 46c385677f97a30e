//! Turning a page into text an AI provider can read.

pub mod fetchers;
pub mod html;
pub mod text;
