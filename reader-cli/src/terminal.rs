use reader_menu::{
    ActionStyle, Anchor, Browser, Feedback, FollowSignal, MenuAction, MenuPresenter,
    PresentationStyle, Sharer, VisitRequest,
};
use reader_post::Post;
use reader_ref::TopicPath;

/// Prints the menu and its side effects to stdout.
pub struct Terminal {
    pub wide: bool,
}

impl MenuPresenter for Terminal {
    fn supports_anchored_popovers(&self) -> bool {
        self.wide
    }

    fn show(&self, actions: &[MenuAction], style: PresentationStyle) {
        match style {
            PresentationStyle::Popover { anchor } => println!("  [popover at {}]", anchor.view),
            PresentationStyle::ActionSheet => println!("  [action sheet]"),
        }
        for line in render_actions(actions) {
            println!("  {}", line);
        }
    }

    fn dismiss(&self) {}
}

impl Browser for Terminal {
    fn open(&self, request: VisitRequest) {
        println!("open {} (referrer: {})", request.url, request.adds_referrer);
    }
}

impl Sharer for Terminal {
    fn share(&self, post: &Post, anchor: &Anchor) {
        println!("share \"{}\" from {}", post.display_name(), anchor.view);
    }
}

pub fn render_actions(actions: &[MenuAction]) -> Vec<String> {
    actions
        .iter()
        .map(|action| match action.style {
            ActionStyle::Default => action.label.to_string(),
            ActionStyle::Destructive => format!("{} (!)", action.label),
            ActionStyle::Cancel => format!("[{}]", action.label),
        })
        .collect()
}

/// Where the post was found, as the list heading shows it.
pub fn render_topic(post: &Post) -> String {
    let topic = match &post.topic {
        Some(topic) => topic,
        None => return "no topic".to_string(),
    };
    match topic.path.kind() {
        TopicPath::Tag { slug } => format!("tag \"{}\"", slug),
        TopicPath::FreshlyPressed => "Freshly Pressed".to_string(),
        TopicPath::Site(site_id) => format!("site {}", site_id),
        TopicPath::List { owner, slug } => format!("list {}/{}", owner, slug),
        TopicPath::Following => "followed sites".to_string(),
        TopicPath::Other => topic
            .title
            .clone()
            .unwrap_or_else(|| topic.path.to_string()),
    }
}

pub fn render_signal(signal: &FollowSignal) -> String {
    format!("post {}: {}", signal.post_id(), render_signal_body(signal))
}

fn render_signal_body(signal: &FollowSignal) -> String {
    match signal {
        FollowSignal::Pending { .. } => "...".to_string(),
        FollowSignal::Succeeded { message, .. } => format!("✓ {}", message),
        FollowSignal::Feedback {
            cue: Feedback::Success,
            ..
        } => "(haptic: success)".to_string(),
        FollowSignal::Feedback {
            cue: Feedback::Error,
            ..
        } => "(haptic: error)".to_string(),
        FollowSignal::Failed { failure, .. } => format!(
            "{}\n{}\n[{}]",
            failure.title, failure.message, failure.dismiss
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_menu::{action_sheet, FollowDirection, FollowError, FollowFailure};
    use reader_post::Topic;
    use reader_ref::{PostId, SiteId};

    #[test]
    fn test_render_actions() {
        let post = Post::new(PostId(1), SiteId(2))
            .with_topic(Topic::from_path("/read/tags/cats/posts").unwrap());
        assert_eq!(
            render_actions(&action_sheet(&post, true)),
            vec![
                "Block This Site (!)",
                "Follow Site",
                "Visit",
                "Share",
                "[Cancel]"
            ]
        );
    }

    #[test]
    fn test_render_failure() {
        let signal = FollowSignal::Failed {
            post_id: PostId(1),
            failure: FollowFailure::new(FollowDirection::Follow, FollowError::new("boom")),
        };
        let rendered = render_signal(&signal);
        assert!(rendered.starts_with("post 1: Problem Following Site\n"));
        assert!(rendered.ends_with("[OK]"));
    }

    #[test]
    fn test_render_topic() {
        let post = |path: &str| {
            Post::new(PostId(1), SiteId(2)).with_topic(Topic::from_path(path).unwrap())
        };
        assert_eq!(
            render_topic(&post("/read/tags/caf%C3%A9/posts")),
            "tag \"café\""
        );
        assert_eq!(
            render_topic(&post("/rest/v1.2/freshly-pressed")),
            "Freshly Pressed"
        );
        assert_eq!(render_topic(&post("/read/sites/42/posts")), "site 42");
        assert_eq!(
            render_topic(&post("/read/list/dinosaur/favourites/posts")),
            "list dinosaur/favourites"
        );
        assert_eq!(render_topic(&post("/read/following")), "followed sites");
        assert_eq!(render_topic(&post("/read/liked")), "/read/liked");
        assert_eq!(render_topic(&Post::new(PostId(1), SiteId(2))), "no topic");
    }
}
