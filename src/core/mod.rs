pub mod builders;
pub mod directory;
pub mod fanout;

#[cfg(test)]
pub(crate) mod fake;

pub use crate::domain::model::{Author, Comment, Company, Employee, Post, PostDetails};
pub use crate::domain::ports::{ConfigProvider, DirectoryApi, Storage};
pub use crate::utils::error::Result;
