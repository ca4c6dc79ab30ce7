use crate::error::ForumClientError;
use crate::{Comment, ForumApi, NewPost, Post, PostEdit, Profile, SortMode, UpvoteResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct ForumClientHttp {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    posts: Vec<Post>,
}

impl ForumClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, ForumClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Arc::new(Client::builder().build()?),
            base_url,
            token: None,
        })
    }

    /// Bearer token minted by the identity service.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token).filter(|t| !t.trim().is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ForumClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(ForumClientError::from_http_response(resp).await)
        }
    }

    async fn empty(resp: Response) -> Result<(), ForumClientError> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ForumClientError::from_http_response(resp).await)
        }
    }
}

#[async_trait(?Send)]
impl ForumApi for ForumClientHttp {
    async fn feed(&self, search: &str, sort: SortMode) -> Result<Vec<Post>, ForumClientError> {
        let resp = self
            .client
            .get(self.url("/posts"))
            .query(&[("search", search), ("sort", sort.as_str())])
            .send()
            .await?;
        let feed: FeedResponse = Self::json(resp).await?;
        debug!(count = feed.posts.len(), "feed fetched");
        Ok(feed.posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Post, ForumClientError> {
        let resp = self.client.get(self.url(&format!("/posts/{id}"))).send().await?;
        Self::json(resp).await
    }

    async fn upvote(&self, id: Uuid) -> Result<UpvoteResult, ForumClientError> {
        let resp = self
            .client
            .post(self.url(&format!("/posts/{id}/upvote")))
            .send()
            .await?;
        Self::json(resp).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ForumClientError> {
        let req = self.client.post(self.url("/posts")).json(post);
        let resp = self.authorized(req).send().await?;
        Self::json(resp).await
    }

    async fn update_post(&self, id: Uuid, edit: &PostEdit) -> Result<Post, ForumClientError> {
        let req = self.client.put(self.url(&format!("/posts/{id}"))).json(edit);
        let resp = self.authorized(req).send().await?;
        Self::json(resp).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ForumClientError> {
        let req = self.client.delete(self.url(&format!("/posts/{id}")));
        let resp = self.authorized(req).send().await?;
        Self::empty(resp).await
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ForumClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/posts/{post_id}/comments")))
            .send()
            .await?;
        Self::json(resp).await
    }

    async fn add_comment(&self, post_id: Uuid, content: &str) -> Result<Comment, ForumClientError> {
        if content.trim().is_empty() {
            return Err(ForumClientError::InvalidRequest(
                "comment cannot be empty".into(),
            ));
        }
        let req = self
            .client
            .post(self.url(&format!("/posts/{post_id}/comments")))
            .json(&serde_json::json!({ "content": content }));
        let resp = self.authorized(req).send().await?;
        Self::json(resp).await
    }

    async fn edit_comment(&self, id: Uuid, content: &str) -> Result<Comment, ForumClientError> {
        if content.trim().is_empty() {
            return Err(ForumClientError::InvalidRequest(
                "comment cannot be empty".into(),
            ));
        }
        let req = self
            .client
            .put(self.url(&format!("/comments/{id}")))
            .json(&serde_json::json!({ "content": content }));
        let resp = self.authorized(req).send().await?;
        Self::json(resp).await
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), ForumClientError> {
        let req = self.client.delete(self.url(&format!("/comments/{id}")));
        let resp = self.authorized(req).send().await?;
        Self::empty(resp).await
    }

    async fn create_profile(&self, display_name: &str) -> Result<Profile, ForumClientError> {
        let req = self
            .client
            .post(self.url("/profile"))
            .json(&serde_json::json!({ "display_name": display_name }));
        let resp = self.authorized(req).send().await?;
        Self::json(resp).await
    }
}
