use async_trait::async_trait;
use log::trace;
use reader_menu::{FollowError, FollowService};
use reader_post::Post;
use std::time::Duration;
use tokio::time::sleep;

/// Stands in for the REST follow endpoint: waits, then succeeds or fails as configured.
pub struct SimulatedFollowService {
    latency: Duration,
    fail: bool,
}

impl SimulatedFollowService {
    pub fn new(latency: Duration, fail: bool) -> Self {
        SimulatedFollowService { latency, fail }
    }
}

#[async_trait]
impl FollowService for SimulatedFollowService {
    async fn toggle_following(&self, post: &Post) -> Result<(), FollowError> {
        trace!("toggle following site {} after {:?}", post.site_id, self.latency);
        sleep(self.latency).await;

        if self.fail {
            Err(FollowError::new(format!(
                "simulated failure for site {}",
                post.site_id
            )))
        } else {
            Ok(())
        }
    }
}
