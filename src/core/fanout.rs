use crate::domain::model::{Post, PostDetails};
use crate::domain::ports::DirectoryApi;
use crate::utils::error::{DirectoryError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fetches author and comments of every post, at most `max_concurrent`
/// posts at a time. The result is in the order of `posts`.
///
/// A failed author lookup fails the whole batch; a failed comment lookup
/// leaves that post with no comments.
pub async fn fetch_post_details<A>(
    api: Arc<A>,
    posts: &[Post],
    max_concurrent: usize,
) -> Result<Vec<PostDetails>>
where
    A: DirectoryApi + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for (index, post) in posts.iter().cloned().enumerate() {
        let api = Arc::clone(&api);
        let sem = Arc::clone(&semaphore);

        join_set.spawn(async move {
            let _permit = match sem.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    return (
                        index,
                        Err(DirectoryError::Scheduling {
                            message: e.to_string(),
                        }),
                    )
                }
            };

            let (author, comments) = tokio::join!(
                api.get_employee(post.author_id),
                api.get_post_comments(post.id)
            );

            let author = match author {
                Ok(author) => author,
                Err(e) => return (index, Err(e)),
            };
            let comments = comments.unwrap_or_else(|e| {
                tracing::warn!("⚠️ Rendering post {} without comments: {}", post.id, e);
                Vec::new()
            });

            (
                index,
                Ok(PostDetails {
                    post,
                    author,
                    comments,
                }),
            )
        });
    }

    let mut slots: Vec<Option<PostDetails>> = vec![None; posts.len()];
    while let Some(joined) = join_set.join_next().await {
        let (index, details) = joined?;
        match details {
            Ok(details) => slots[index] = Some(details),
            Err(e) => {
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    tracing::debug!("Fetched details for {} posts", posts.len());
    Ok(slots.into_iter().flatten().collect())
}
