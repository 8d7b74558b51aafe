use reader_post::Post;

use crate::titles;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuActionKind {
    Block,
    ToggleFollow,
    Visit,
    Share,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStyle {
    Default,
    Destructive,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuAction {
    pub kind: MenuActionKind,
    pub label: &'static str,
    pub style: ActionStyle,
}

impl MenuAction {
    fn new(kind: MenuActionKind, label: &'static str, style: ActionStyle) -> Self {
        MenuAction { kind, label, style }
    }
}

/// Blocking is only offered to signed-in viewers reading a tag or the featured stream.
pub fn should_show_block(post: &Post, viewer_is_authenticated: bool) -> bool {
    match &post.topic {
        Some(topic) if viewer_is_authenticated => topic.is_tag() || topic.is_featured(),
        _ => false,
    }
}

pub fn follow_label(is_following: bool) -> &'static str {
    if is_following {
        titles::UNFOLLOW
    } else {
        titles::FOLLOW
    }
}

/// Actions offered for `post`, in display order: [block], follow toggle, visit, share.
pub fn compute_actions(post: &Post, viewer_is_authenticated: bool) -> Vec<MenuAction> {
    let mut actions = Vec::with_capacity(4);

    if should_show_block(post, viewer_is_authenticated) {
        actions.push(MenuAction::new(
            MenuActionKind::Block,
            titles::BLOCK_SITE,
            ActionStyle::Destructive,
        ));
    }

    actions.push(MenuAction::new(
        MenuActionKind::ToggleFollow,
        follow_label(post.is_following),
        ActionStyle::Default,
    ));
    actions.push(MenuAction::new(
        MenuActionKind::Visit,
        titles::VISIT,
        ActionStyle::Default,
    ));
    actions.push(MenuAction::new(
        MenuActionKind::Share,
        titles::SHARE,
        ActionStyle::Default,
    ));

    actions
}

/// The presentable sheet: the computed actions plus a trailing cancel entry.
pub fn action_sheet(post: &Post, viewer_is_authenticated: bool) -> Vec<MenuAction> {
    let mut actions = compute_actions(post, viewer_is_authenticated);
    actions.push(MenuAction::new(
        MenuActionKind::Cancel,
        titles::CANCEL,
        ActionStyle::Cancel,
    ));
    actions
}
