use log::debug;
use reader_post::Post;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitRequest {
    pub url: Url,
    /// Ask the embedded browser to send the reader's referrer.
    pub adds_referrer: bool,
}

/// The embedded browser that "Visit" opens.
pub trait Browser: Send + Sync {
    fn open(&self, request: VisitRequest);
}

pub fn visit_request(post: &Post) -> Option<VisitRequest> {
    let permalink = post.permalink()?;
    Some(VisitRequest {
        url: permalink.into_url(),
        adds_referrer: true,
    })
}

/// Opens the post's site, or does nothing when the permalink is missing or malformed.
pub fn visit_site(post: &Post, browser: &dyn Browser) -> bool {
    match visit_request(post) {
        Some(request) => {
            browser.open(request);
            true
        }
        None => {
            debug!("post {} has no usable permalink, not visiting", post.id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_ref::{PostId, SiteId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBrowser {
        opened: Mutex<Vec<VisitRequest>>,
    }

    impl Browser for RecordingBrowser {
        fn open(&self, request: VisitRequest) {
            self.opened.lock().unwrap().push(request);
        }
    }

    fn post() -> Post {
        Post::new(PostId(3), SiteId(30))
    }

    #[test]
    fn test_visit_opens_permalink_with_referrer() {
        let browser = RecordingBrowser::default();
        let post = post().with_permalink("https://example.wordpress.com/hello/");

        assert!(visit_site(&post, &browser));

        let opened = browser.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].url.as_str(), "https://example.wordpress.com/hello/");
        assert!(opened[0].adds_referrer);
    }

    #[test]
    fn test_malformed_permalink_is_a_silent_no_op() {
        let browser = RecordingBrowser::default();
        assert!(!visit_site(&post().with_permalink("not a url"), &browser));
        assert!(!visit_site(&post(), &browser));
        assert!(browser.opened.lock().unwrap().is_empty());
    }
}
