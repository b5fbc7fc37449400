use nr_core::{Article, Error, Result};
use url::Url;

const X_INTENT_URL: &str = "https://twitter.com/intent/tweet";
const LINKEDIN_SHARE_URL: &str = "https://www.linkedin.com/shareArticle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub x: String,
    pub linkedin: String,
    /// The bare article link, for copying.
    pub copy: String,
}

impl ShareLinks {
    pub fn for_article(article: &Article) -> Result<Self> {
        let text = format!("Check out this article: {}", article.title);

        let x = Url::parse_with_params(X_INTENT_URL, &[("url", article.url.as_str()), ("text", text.as_str())])
            .map_err(|e| Error::External(e.into()))?;
        let linkedin = Url::parse_with_params(
            LINKEDIN_SHARE_URL,
            &[
                ("mini", "true"),
                ("url", article.url.as_str()),
                ("title", article.title.as_str()),
            ],
        )
        .map_err(|e| Error::External(e.into()))?;

        Ok(Self {
            x: x.into(),
            linkedin: linkedin.into(),
            copy: article.url.clone(),
        })
    }
}
