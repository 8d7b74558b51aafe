use async_trait::async_trait;
use log::{debug, info, warn};
use reader_post::Post;
use reader_ref::{PostId, SiteId};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use thiserror::Error as ThisError;
use tokio::sync::{mpsc::UnboundedSender, oneshot};

use crate::titles;

/// The one way a follow request can fail. The description is for logs, not for users.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Follow request failed: {description}")]
pub struct FollowError {
    pub description: String,
}

impl FollowError {
    pub fn new(description: impl Into<String>) -> Self {
        FollowError {
            description: description.into(),
        }
    }

    /// The request never reported back, e.g. the service panicked.
    pub fn interrupted() -> Self {
        FollowError::new("follow request was interrupted")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ToggleError {
    #[error("A follow change for post {0} is already in flight")]
    AlreadyPending(PostId),
}

#[async_trait]
pub trait FollowService: Send + Sync {
    /// Flips the viewer's follow relationship with the post's site.
    async fn toggle_following(&self, post: &Post) -> Result<(), FollowError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowDirection {
    Follow,
    Unfollow,
}

impl FollowDirection {
    pub fn from_current(is_following: bool) -> Self {
        if is_following {
            FollowDirection::Unfollow
        } else {
            FollowDirection::Follow
        }
    }

    pub fn target_state(self) -> bool {
        self == FollowDirection::Follow
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FollowDirection::Follow => titles::FOLLOWED,
            FollowDirection::Unfollow => titles::UNFOLLOWED,
        }
    }

    pub fn error_title(self) -> &'static str {
        match self {
            FollowDirection::Follow => titles::PROBLEM_FOLLOWING_TITLE,
            FollowDirection::Unfollow => titles::PROBLEM_UNFOLLOWING_TITLE,
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            FollowDirection::Follow => titles::PROBLEM_FOLLOWING_MESSAGE,
            FollowDirection::Unfollow => titles::PROBLEM_UNFOLLOWING_MESSAGE,
        }
    }
}

/// What the user is shown when a toggle fails: a dismissible alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowFailure {
    pub direction: FollowDirection,
    pub title: &'static str,
    pub message: &'static str,
    pub dismiss: &'static str,
    pub error: FollowError,
}

impl FollowFailure {
    pub fn new(direction: FollowDirection, error: FollowError) -> Self {
        FollowFailure {
            direction,
            title: direction.error_title(),
            message: direction.error_message(),
            dismiss: titles::OK,
            error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowSignal {
    Pending {
        post_id: PostId,
    },
    Succeeded {
        post_id: PostId,
        is_following: bool,
        message: &'static str,
    },
    Failed {
        post_id: PostId,
        failure: FollowFailure,
    },
    Feedback {
        post_id: PostId,
        cue: Feedback,
    },
}

impl FollowSignal {
    pub fn post_id(&self) -> PostId {
        match self {
            FollowSignal::Pending { post_id }
            | FollowSignal::Succeeded { post_id, .. }
            | FollowSignal::Failed { post_id, .. }
            | FollowSignal::Feedback { post_id, .. } => *post_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FollowSignal::Succeeded { .. } | FollowSignal::Failed { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowOutcome {
    Succeeded { is_following: bool },
    Failed(FollowFailure),
}

impl FollowOutcome {
    /// Reflects a confirmed change onto the post. Failures leave it untouched.
    pub fn apply(&self, post: &mut Post) -> bool {
        match self {
            FollowOutcome::Succeeded { is_following } => {
                post.is_following = *is_following;
                true
            }
            FollowOutcome::Failed(_) => false,
        }
    }
}

/// The context that owns the UI. Signals are handed to it and nowhere else.
pub trait SignalSink: Send + Sync {
    fn deliver(&self, signal: FollowSignal);
}

impl SignalSink for UnboundedSender<FollowSignal> {
    fn deliver(&self, signal: FollowSignal) {
        // The view may be gone by the time a request resolves.
        if let Err(err) = self.send(signal) {
            debug!("follow signal dropped, receiver is gone: {:?}", err.0);
        }
    }
}

pub struct FollowToggleController {
    service: Arc<dyn FollowService>,
    sink: Arc<dyn SignalSink>,
    pending: Arc<Mutex<HashSet<PostId>>>,
}

impl FollowToggleController {
    pub fn new(service: Arc<dyn FollowService>, sink: Arc<dyn SignalSink>) -> Self {
        FollowToggleController {
            service,
            sink,
            pending: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn is_pending(&self, post_id: PostId) -> bool {
        lock(&self.pending).contains(&post_id)
    }

    /// Asks the service to flip the follow state of `post`.
    ///
    /// Emits `Pending` before the request, then exactly one of `Succeeded` or
    /// `Failed`. A `Feedback::Success` cue follows a confirmed follow (never an
    /// unfollow), a `Feedback::Error` cue precedes every failure. The post itself
    /// is not modified; use [`FollowOutcome::apply`] once the outcome is known.
    ///
    /// The request runs on its own task. Dropping the returned future does not
    /// cancel it, and its terminal signal is still delivered to the sink.
    ///
    /// A second toggle for the same post while one is in flight is rejected
    /// without emitting anything.
    pub async fn toggle(&self, post: &Post) -> Result<FollowOutcome, ToggleError> {
        let post_id = post.id;
        let direction = FollowDirection::from_current(post.is_following);
        let mut request = self.start(post, direction)?;

        self.sink.deliver(FollowSignal::Pending { post_id });
        debug!("{:?} site {} for post {}", direction, post.site_id, post_id);

        let service = self.service.clone();
        let post = post.clone();
        let (outcome_sender, outcome) = oneshot::channel();
        tokio::spawn(async move {
            let result = service.toggle_following(&post).await;
            let outcome = request.settle(result);
            // Releases the pending mark, after the terminal signal went out.
            drop(request);
            if outcome_sender.send(outcome).is_err() {
                debug!("toggle for post {} finished after its caller left", post_id);
            }
        });

        Ok(match outcome.await {
            Ok(outcome) => outcome,
            // The task died before settling; its drop already reported the failure.
            Err(_) => FollowOutcome::Failed(FollowFailure::new(
                direction,
                FollowError::interrupted(),
            )),
        })
    }

    /// [`toggle`](Self::toggle), then apply the outcome to `post`.
    pub async fn toggle_and_apply(&self, post: &mut Post) -> Result<FollowOutcome, ToggleError> {
        let outcome = self.toggle(post).await?;
        outcome.apply(post);
        Ok(outcome)
    }

    fn start(&self, post: &Post, direction: FollowDirection) -> Result<InFlight, ToggleError> {
        if !lock(&self.pending).insert(post.id) {
            debug!("ignoring toggle for post {}, one is in flight", post.id);
            return Err(ToggleError::AlreadyPending(post.id));
        }
        Ok(InFlight {
            pending: self.pending.clone(),
            sink: self.sink.clone(),
            post_id: post.id,
            site_id: post.site_id,
            direction,
            settled: false,
        })
    }
}

fn lock(pending: &Mutex<HashSet<PostId>>) -> MutexGuard<'_, HashSet<PostId>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

// One issued request. Dropping it releases the post, and reports a failure if
// no terminal signal was sent yet.
struct InFlight {
    pending: Arc<Mutex<HashSet<PostId>>>,
    sink: Arc<dyn SignalSink>,
    post_id: PostId,
    site_id: SiteId,
    direction: FollowDirection,
    settled: bool,
}

impl InFlight {
    fn settle(&mut self, result: Result<(), FollowError>) -> FollowOutcome {
        self.settled = true;
        let (post_id, direction) = (self.post_id, self.direction);

        match result {
            Ok(()) => {
                let is_following = direction.target_state();
                info!(
                    "{} {} (post {})",
                    direction.success_message(),
                    self.site_id,
                    post_id
                );
                self.sink.deliver(FollowSignal::Succeeded {
                    post_id,
                    is_following,
                    message: direction.success_message(),
                });
                if direction == FollowDirection::Follow {
                    self.sink.deliver(FollowSignal::Feedback {
                        post_id,
                        cue: Feedback::Success,
                    });
                }
                FollowOutcome::Succeeded { is_following }
            }
            Err(error) => FollowOutcome::Failed(self.fail(error)),
        }
    }

    fn fail(&self, error: FollowError) -> FollowFailure {
        warn!("{:?} site {} failed: {}", self.direction, self.site_id, error);
        let failure = FollowFailure::new(self.direction, error);
        self.sink.deliver(FollowSignal::Feedback {
            post_id: self.post_id,
            cue: Feedback::Error,
        });
        self.sink.deliver(FollowSignal::Failed {
            post_id: self.post_id,
            failure: failure.clone(),
        });
        failure
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            self.fail(FollowError::interrupted());
        }
        lock(&self.pending).remove(&self.post_id);
    }
}
