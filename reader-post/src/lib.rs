// Shapes follow the WordPress.com REST v1.2 reader responses.

use reader_ref::{Permalink, PostId, RefError, SiteId, TopicRef};
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_with::{serde_as, DefaultOnError};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PostError {
    #[error("Failed to parse posts json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid reference: {0}")]
    Ref(#[from] RefError),
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Post {
    #[serde(alias = "ID")]
    pub id: PostId,
    #[serde(alias = "site_ID")]
    pub site_id: SiteId,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub title: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub site_name: Option<String>,
    // Kept raw: a malformed permalink is still a post, it just cannot be visited.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "URL")]
    pub permalink: Option<String>,
    // A topic that cannot be read means no topic, not a broken feed.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub is_following: bool,
}

impl Post {
    pub fn new(id: PostId, site_id: SiteId) -> Self {
        Post {
            id,
            site_id,
            title: None,
            site_name: None,
            permalink: None,
            topic: None,
            is_following: false,
        }
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }

    pub fn with_following(mut self, is_following: bool) -> Self {
        self.is_following = is_following;
        self
    }

    /// The permalink, if present and well-formed.
    pub fn permalink(&self) -> Option<Permalink> {
        let raw = self.permalink.as_ref()?;
        Permalink::from_string(raw.clone()).ok()
    }

    pub fn display_name(&self) -> String {
        match (&self.site_name, &self.title) {
            (Some(site), Some(title)) => format!("{} - {}", site, title),
            (Some(site), None) => site.clone(),
            (None, Some(title)) => title.clone(),
            (None, None) => format!("post {} on site {}", self.id, self.site_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    Tag,
    Site,
    List,
    Team,
    Default,
    #[serde(other)]
    Unknown,
}

/// Reader topic, decoded from either a bare path string or a topic map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Topic {
    pub path: TopicRef,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub topic_type: Option<TopicType>,
}

impl Topic {
    pub fn from_path(path: &str) -> Result<Self, PostError> {
        Ok(path.parse()?)
    }

    pub fn with_type(mut self, topic_type: TopicType) -> Self {
        self.topic_type = Some(topic_type);
        self
    }

    pub fn is_tag(&self) -> bool {
        self.topic_type == Some(TopicType::Tag) || self.path.is_tag()
    }

    /// Freshly Pressed is the only featured topic.
    pub fn is_featured(&self) -> bool {
        self.path.is_freshly_pressed()
    }
}

impl FromStr for Topic {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Topic {
            path: s.to_string().try_into()?,
            title: None,
            topic_type: None,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostList {
    Bare(Vec<Post>),
    Wrapped { posts: Vec<Post> },
}

/// Accepts either a bare array of posts or a `{ "posts": [...] }` response body.
pub fn parse_posts(json: &str) -> Result<Vec<Post>, PostError> {
    let list: PostList = serde_json::from_str(json)?;
    Ok(match list {
        PostList::Bare(posts) => posts,
        PostList::Wrapped { posts } => posts,
    })
}

#[serde_as]
#[derive(Deserialize)]
struct TopicFields {
    path: TopicRef,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    title: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, rename = "type")]
    topic_type: Option<TopicType>,
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeserializeTopic;

        impl<'de> Visitor<'de> for DeserializeTopic {
            type Value = Topic;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("topic path string or topic map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Topic, E>
            where
                E: de::Error,
            {
                FromStr::from_str(value).map_err(|err| E::custom(format!("{}", err)))
            }

            fn visit_map<M>(self, map: M) -> Result<Topic, M::Error>
            where
                M: MapAccess<'de>,
            {
                let fields = TopicFields::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(Topic {
                    path: fields.path,
                    title: fields.title,
                    topic_type: fields.topic_type,
                })
            }
        }

        deserializer.deserialize_any(DeserializeTopic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_from_api_shape() {
        let json = r#"{
            "ID": 42,
            "site_ID": 7,
            "title": "Hello",
            "URL": "https://example.wordpress.com/2017/01/01/hello/",
            "topic": { "path": "/read/tags/cats/posts", "title": "cats", "type": "tag" },
            "is_following": true
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, PostId(42));
        assert_eq!(post.site_id, SiteId(7));
        assert!(post.is_following);
        assert!(post.topic.as_ref().unwrap().is_tag());
        assert!(post.permalink().is_some());
    }

    #[test]
    fn test_topic_as_plain_path() {
        let json = r#"{ "id": 1, "site_id": 2, "topic": "/rest/v1.2/freshly-pressed" }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        let topic = post.topic.unwrap();
        assert!(topic.is_featured());
        assert!(!topic.is_tag());
    }

    #[test]
    fn test_lenient_optional_fields() {
        let json = r#"{ "id": 1, "site_id": 2, "title": 5, "is_following": "yes", "permalink": "not a url" }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.title, None);
        assert!(!post.is_following);
        assert!(post.topic.is_none());
        assert_eq!(post.permalink.as_deref(), Some("not a url"));
        assert!(post.permalink().is_none());
    }

    #[test]
    fn test_explicit_tag_type_without_tag_path() {
        let topic = Topic::from_path("/read/search").unwrap().with_type(TopicType::Tag);
        assert!(topic.is_tag());
        let topic = Topic::from_path("/read/search").unwrap().with_type(TopicType::Site);
        assert!(!topic.is_tag());
    }

    #[test]
    fn test_parse_posts() {
        let bare = r#"[{ "id": 1, "site_id": 2 }, { "id": 3, "site_id": 4 }]"#;
        assert_eq!(parse_posts(bare).unwrap().len(), 2);

        let wrapped = r#"{ "found": 1, "posts": [{ "ID": 1, "site_ID": 2 }] }"#;
        assert_eq!(parse_posts(wrapped).unwrap().len(), 1);

        assert!(parse_posts("{}").is_err());
    }

    #[test]
    fn test_parse_posts_with_unreadable_topics() {
        let json = r#"[
            { "id": 1, "site_id": 2 },
            { "id": 3, "site_id": 4, "topic": "cats" },
            { "id": 5, "site_id": 6, "topic": { "path": "cats", "type": "tag" } },
            { "id": 7, "site_id": 8, "topic": 12 },
            { "id": 9, "site_id": 10, "topic": "/read/tags/cats/posts" }
        ]"#;
        let posts = parse_posts(json).unwrap();
        assert_eq!(posts.len(), 5);
        assert!(posts[..4].iter().all(|post| post.topic.is_none()));
        assert!(posts[4].topic.as_ref().unwrap().is_tag());
    }

    #[test]
    fn test_topic_serializes_as_map() {
        let topic = Topic::from_path("/read/tags/cats/posts")
            .unwrap()
            .with_type(TopicType::Tag);
        let json = serde_json::to_string(&topic).unwrap();
        let back: Topic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, topic);
    }

    #[test]
    fn test_display_name() {
        let post = Post::new(PostId(1), SiteId(2));
        assert_eq!(post.display_name(), "post 1 on site 2");
    }
}
