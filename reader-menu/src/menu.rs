use log::debug;
use reader_post::Post;
use std::sync::Arc;

use crate::{
    block::BlockBus,
    follow::{FollowOutcome, FollowToggleController, ToggleError},
    policy::{action_sheet, MenuAction, MenuActionKind},
    presenter::{Anchor, MenuPresenter, PresentationStyle},
    session::Session,
    share::Sharer,
    visit::{visit_site, Browser},
};

/// What happened after an action was picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Performed {
    BlockRequested { subscribers: usize },
    Toggled(FollowOutcome),
    Visited,
    VisitDeclined,
    Shared,
    Cancelled,
}

/// Wires the menu policy to the collaborators that carry each action out.
pub struct PostMenu {
    session: Arc<dyn Session>,
    follow: FollowToggleController,
    blocks: Arc<BlockBus>,
    browser: Arc<dyn Browser>,
    sharer: Arc<dyn Sharer>,
    presenter: Arc<dyn MenuPresenter>,
}

impl PostMenu {
    pub fn new(
        session: Arc<dyn Session>,
        follow: FollowToggleController,
        blocks: Arc<BlockBus>,
        browser: Arc<dyn Browser>,
        sharer: Arc<dyn Sharer>,
        presenter: Arc<dyn MenuPresenter>,
    ) -> Self {
        PostMenu {
            session,
            follow,
            blocks,
            browser,
            sharer,
            presenter,
        }
    }

    pub fn actions(&self, post: &Post) -> Vec<MenuAction> {
        action_sheet(post, self.session.is_authenticated())
    }

    /// Builds the sheet for `post` and hands it to the presenter.
    pub fn show(&self, post: &Post, anchor: &Anchor) -> Vec<MenuAction> {
        let actions = self.actions(post);
        let style = PresentationStyle::choose(self.presenter.as_ref(), anchor);
        debug!(
            "showing {} actions for post {} as {:?}",
            actions.len(),
            post.id,
            style
        );
        self.presenter.show(&actions, style);
        actions
    }

    /// Runs the picked action. A confirmed follow change is applied to `post`.
    ///
    /// The action runs even if the sheet would not have offered it; offering is the
    /// policy's job, not this one's.
    pub async fn perform(
        &self,
        kind: MenuActionKind,
        post: &mut Post,
        anchor: &Anchor,
    ) -> Result<Performed, ToggleError> {
        self.presenter.dismiss();

        let performed = match kind {
            MenuActionKind::Block => Performed::BlockRequested {
                subscribers: self.blocks.emit_block_requested(post),
            },
            MenuActionKind::ToggleFollow => {
                Performed::Toggled(self.follow.toggle_and_apply(post).await?)
            }
            MenuActionKind::Visit => {
                if visit_site(post, self.browser.as_ref()) {
                    Performed::Visited
                } else {
                    Performed::VisitDeclined
                }
            }
            MenuActionKind::Share => {
                self.sharer.share(post, anchor);
                Performed::Shared
            }
            MenuActionKind::Cancel => Performed::Cancelled,
        };

        Ok(performed)
    }
}
