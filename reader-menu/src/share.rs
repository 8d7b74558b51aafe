use reader_post::Post;

use crate::presenter::Anchor;

/// The platform sharing flow. It gets the post and where the menu was anchored.
pub trait Sharer: Send + Sync {
    fn share(&self, post: &Post, anchor: &Anchor);
}
