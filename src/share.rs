//! Post text and social links offered next to a finished card.

use url::Url;

use crate::error::{CustomizerError, Result};

pub const DEFAULT_SHARE_TEXT: &str = "Looking forward to meeting #robotics #investors and #founders at the @SOSV #RoboticsMatchup on Dec 1-5 and 8-12. It's 100% virtual and free > https://sosv.com/sosv-matchups/";

pub const LINKEDIN_FEED_URL: &str = "https://www.linkedin.com/feed/";
pub const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// Name the download link saves the card under.
pub const DOWNLOAD_FILENAME: &str = "my-robotics-card.png";

/// Links carry only the post text; the card is attached by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub text: String,
}

impl Default for ShareLinks {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_TEXT)
    }
}

impl ShareLinks {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn tweet_url(&self) -> Result<String> {
        Url::parse_with_params(TWEET_INTENT_URL, &[("text", self.text.as_str())])
            .map(String::from)
            .map_err(|e| CustomizerError::ConfigError(format!("bad share url: {}", e)))
    }

    pub fn linkedin_url(&self) -> &'static str {
        LINKEDIN_FEED_URL
    }
}
