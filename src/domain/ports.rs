use crate::domain::model::{Author, Comment, Employee, Post};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
}

/// The four read operations of the remote directory service.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn get_employees(&self) -> Result<Vec<Employee>>;
    async fn get_employee(&self, employee_id: u64) -> Result<Author>;
    async fn get_employee_posts(&self, employee_id: u64) -> Result<Vec<Post>>;
    async fn get_post_comments(&self, post_id: u64) -> Result<Vec<Comment>>;
}
