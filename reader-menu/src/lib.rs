//! The reader's per-post menu: which actions are offered, and what picking one does.
//!
//! Rendering, the network call, the browser and the share sheet are all supplied by the
//! caller through the traits re-exported here.

pub mod block;
pub mod follow;
pub mod menu;
pub mod policy;
pub mod presenter;
pub mod session;
pub mod share;
pub mod titles;
pub mod visit;

pub use block::{BlockBus, BlockRequested, SubscriptionId, BLOCK_SITE_EVENT};
pub use follow::{
    Feedback, FollowDirection, FollowError, FollowFailure, FollowOutcome, FollowService,
    FollowSignal, FollowToggleController, SignalSink, ToggleError,
};
pub use menu::{Performed, PostMenu};
pub use policy::{action_sheet, compute_actions, ActionStyle, MenuAction, MenuActionKind};
pub use presenter::{Anchor, MenuPresenter, PresentationStyle, Rect};
pub use session::{Session, ViewerSession};
pub use share::Sharer;
pub use visit::{visit_request, visit_site, Browser, VisitRequest};
