//! Spider for the pttdigit.com board: hub listings lead to post pages, and each post page
//! yields one [`Post`] with its replies.

pub mod assemble;
pub mod extract;
pub mod model;
pub mod selectors;
pub mod spider;

pub use model::{Post, PostStub, Reply};
pub use selectors::SelectorMap;
pub use spider::{ForumSpider, HubPage};

#[cfg(test)]
mod fixtures;
