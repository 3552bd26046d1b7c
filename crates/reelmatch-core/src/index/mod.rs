pub mod title;

pub use title::{normalize, TitleIndex};
