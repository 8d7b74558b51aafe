//! Fixed English copy for the post menu and the follow prompts.

pub const CANCEL: &str = "Cancel";
pub const BLOCK_SITE: &str = "Block This Site";
pub const SHARE: &str = "Share";
pub const VISIT: &str = "Visit";
pub const UNFOLLOW: &str = "Unfollow Site";
pub const FOLLOW: &str = "Follow Site";

pub const FOLLOWED: &str = "Followed site";
pub const UNFOLLOWED: &str = "Unfollowed site";

pub const PROBLEM_FOLLOWING_TITLE: &str = "Problem Following Site";
pub const PROBLEM_UNFOLLOWING_TITLE: &str = "Problem Unfollowing Site";
pub const PROBLEM_FOLLOWING_MESSAGE: &str = "There was a problem following the site.  If the problem persists you can contact us via the Me > Help & Support screen.";
pub const PROBLEM_UNFOLLOWING_MESSAGE: &str = "There was a problem unfollowing the site. If the problem persists you can contact us via the Me > Help & Support screen.";

pub const OK: &str = "OK";
