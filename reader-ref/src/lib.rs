use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};
use thiserror::Error as ThisError;
use url::Url;
use urlencoding::decode;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
    #[error("Failed to parse url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unsupported url: {0}")]
    UnsupportedUrl(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a topic path points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicPath {
    Tag { slug: String },
    FreshlyPressed,
    Site(SiteId),
    List { owner: String, slug: String },
    Following,
    Other,
}

/// Path of a reader topic, either absolute (`https://host/...`) or rooted (`/read/...`).
///
/// Paths come percent-encoded from the API, so a raw space is not accepted: a tag
/// like "café au lait" must arrive as `/read/tags/caf%C3%A9%20au%20lait/posts`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicRef(String);

impl TopicRef {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Topic",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^(https?://[^/\s]+)?/[^\s]*$").unwrap();
        }
        &*RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }

    pub fn kind(&self) -> TopicPath {
        lazy_static! {
            static ref TAG_RE: Regex = Regex::new(r"/read/tags/(?P<slug>[^/]+)/posts/?$").unwrap();
            static ref FRESHLY_PRESSED_RE: Regex = Regex::new(r"/freshly-pressed/?$").unwrap();
            static ref SITE_RE: Regex = Regex::new(r"/read/sites/(?P<id>\d+)/posts/?$").unwrap();
            static ref LIST_RE: Regex =
                Regex::new(r"/read/list/(?P<owner>[^/]+)/(?P<slug>[^/]+)/posts/?$").unwrap();
            static ref FOLLOWING_RE: Regex = Regex::new(r"/read/following/?$").unwrap();
        }
        let path = self.path_without_query();

        if let Some(caps) = TAG_RE.captures(path) {
            return TopicPath::Tag {
                slug: decode_segment(&caps["slug"]),
            };
        }
        if FRESHLY_PRESSED_RE.is_match(path) {
            return TopicPath::FreshlyPressed;
        }
        if let Some(caps) = SITE_RE.captures(path) {
            // digits only, but may still overflow u64
            if let Ok(id) = caps["id"].parse::<u64>() {
                return TopicPath::Site(SiteId(id));
            }
        }
        if let Some(caps) = LIST_RE.captures(path) {
            return TopicPath::List {
                owner: decode_segment(&caps["owner"]),
                slug: decode_segment(&caps["slug"]),
            };
        }
        if FOLLOWING_RE.is_match(path) {
            return TopicPath::Following;
        }
        TopicPath::Other
    }

    pub fn is_tag(&self) -> bool {
        matches!(self.kind(), TopicPath::Tag { .. })
    }

    pub fn is_freshly_pressed(&self) -> bool {
        matches!(self.kind(), TopicPath::FreshlyPressed)
    }

    fn path_without_query(&self) -> &str {
        match self.0.find(&['?', '#'][..]) {
            Some(index) => &self.0[..index],
            None => self.0.as_str(),
        }
    }
}

impl TryFrom<String> for TopicRef {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TopicRef::from_string(value)
    }
}

impl From<TopicRef> for String {
    fn from(value: TopicRef) -> String {
        value.0
    }
}

impl fmt::Display for TopicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A post permalink that is safe to hand to a browser: absolute http(s) with a host.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permalink(Url);

impl Permalink {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        let url = Url::parse(string.trim())?;
        match url.scheme() {
            "http" | "https" if url.host().is_some() => Ok(Self(url)),
            _ => Err(RefError::UnsupportedUrl(string)),
        }
    }

    pub fn is_match(string: &str) -> bool {
        Self::from_string(string.to_string()).is_ok()
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl TryFrom<String> for Permalink {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Permalink::from_string(value)
    }
}

impl From<Permalink> for String {
    fn from(value: Permalink) -> String {
        value.0.into()
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

fn decode_segment(segment: &str) -> String {
    match decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(path: &str) -> TopicRef {
        TopicRef::from_string(path.to_string()).unwrap()
    }

    #[test]
    fn test_is_topic_path() {
        assert!(TopicRef::is_match(
            "https://public-api.wordpress.com/rest/v1.2/read/tags/cats/posts"
        ));
        assert!(TopicRef::is_match("/read/following"));
        assert!(!TopicRef::is_match("read/following"));
        assert!(!TopicRef::is_match("not a path"));
    }

    #[test]
    fn test_tag_topic() {
        let topic = topic("https://public-api.wordpress.com/rest/v1.2/read/tags/cats/posts");
        assert_eq!(
            topic.kind(),
            TopicPath::Tag {
                slug: "cats".to_string()
            }
        );
        assert!(topic.is_tag());
        assert!(!topic.is_freshly_pressed());
    }

    #[test]
    fn test_tag_slug_is_decoded() {
        let topic = topic("/read/tags/caf%C3%A9%20au%20lait/posts");
        assert_eq!(
            topic.kind(),
            TopicPath::Tag {
                slug: "café au lait".to_string()
            }
        );
        assert!(!TopicRef::is_match("/read/tags/café au lait/posts"));
    }

    #[test]
    fn test_freshly_pressed_topic() {
        let topic = topic("https://public-api.wordpress.com/rest/v1.2/freshly-pressed");
        assert_eq!(topic.kind(), TopicPath::FreshlyPressed);
        assert!(topic.is_freshly_pressed());
        assert!(!topic.is_tag());
    }

    #[test]
    fn test_site_list_and_following_topics() {
        assert_eq!(
            topic("/rest/v1.2/read/sites/12345/posts").kind(),
            TopicPath::Site(SiteId(12345))
        );
        assert_eq!(
            topic("/rest/v1.2/read/list/dinosaur/favourites/posts").kind(),
            TopicPath::List {
                owner: "dinosaur".to_string(),
                slug: "favourites".to_string()
            }
        );
        assert_eq!(
            topic("/rest/v1.2/read/following?number=20").kind(),
            TopicPath::Following
        );
        assert_eq!(topic("/rest/v1.2/read/liked").kind(), TopicPath::Other);
    }

    #[test]
    fn test_topic_serde() {
        let topic: TopicRef = serde_json::from_str("\"/read/tags/dogs/posts\"").unwrap();
        assert!(topic.is_tag());
        assert!(serde_json::from_str::<TopicRef>("\"dogs\"").is_err());
    }

    #[test]
    fn test_permalink() {
        let permalink =
            Permalink::from_string("https://example.wordpress.com/2017/01/01/hello/".to_string())
                .unwrap();
        assert_eq!(permalink.into_url().host_str(), Some("example.wordpress.com"));

        assert!(!Permalink::is_match("not a url"));
        assert!(!Permalink::is_match(""));
        assert!(!Permalink::is_match("mailto:someone@example.com"));
        assert!(!Permalink::is_match("/2017/01/01/hello/"));
        assert!(Permalink::is_match("http://example.com"));
    }
}
