//! Keyword ideas and question ideas for a seed keyword.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::{EnvelopeError, Tagged, lenient};
use super::{AhrefsClient, absent_on_error};

const IDEAS_ENDPOINT: &str = "stGetFreeKeywordIdeas";

/// Which list an idea came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdeaLabel {
    #[serde(rename = "keyword ideas")]
    Keyword,
    #[serde(rename = "question ideas")]
    Question,
}

/// One suggested keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordIdea {
    pub keyword: String,
    pub country: String,
    pub difficulty: String,
    pub volume: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledIdea {
    pub label: IdeaLabel,
    pub value: KeywordIdea,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdeasPayload {
    #[serde(default, deserialize_with = "lenient")]
    all_ideas: Option<IdeaList>,
    #[serde(default, deserialize_with = "lenient")]
    question_ideas: Option<IdeaList>,
}

#[derive(Debug, Deserialize)]
struct IdeaList {
    #[serde(default, deserialize_with = "lenient")]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIdea {
    #[serde(default)]
    keyword: Option<Value>,
    #[serde(default)]
    country: Option<Value>,
    #[serde(default)]
    difficulty_label: Option<Value>,
    #[serde(default)]
    volume_label: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
}

/// Strings pass through; other scalars are rendered; missing and null fall back.
fn label_or(value: Option<Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

impl RawIdea {
    fn simplify(self) -> KeywordIdea {
        KeywordIdea {
            keyword: label_or(self.keyword, "No keyword"),
            country: label_or(self.country, "-"),
            difficulty: label_or(self.difficulty_label, "Unknown"),
            volume: label_or(self.volume_label, "Unknown"),
            updated_at: label_or(self.updated_at, "-"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeasRequest<'a> {
    with_question_ideas: bool,
    captcha: &'a str,
    search_engine: &'a str,
    country: &'a str,
    keyword: (&'a str, &'a str),
}

/// Keyword ideas first, then question ideas, each in upstream order.
///
/// A well-formed reply with no ideas gives an empty list.
pub fn extract_keyword_ideas(reply: Value) -> Result<Vec<LabeledIdea>, EnvelopeError> {
    let payload: IdeasPayload = Tagged::leading(reply)?.into_payload()?;

    let labeled = |label: IdeaLabel, list: Option<IdeaList>| {
        list.into_iter()
            .flat_map(|list| list.results)
            .filter(Value::is_object)
            .filter_map(|raw| serde_json::from_value::<RawIdea>(raw).ok())
            .map(move |raw| LabeledIdea { label, value: raw.simplify() })
    };

    Ok(labeled(IdeaLabel::Keyword, payload.all_ideas)
        .chain(labeled(IdeaLabel::Question, payload.question_ideas))
        .collect())
}

impl AhrefsClient {
    /// Keyword and question ideas for `keyword`, or `None` if the reply is unusable.
    pub async fn keyword_ideas(
        &self, token: &str, keyword: &str, country: &str, search_engine: &str,
    ) -> Option<Vec<LabeledIdea>> {
        let body = IdeasRequest {
            with_question_ideas: true,
            captcha: token,
            search_engine,
            country,
            keyword: ("Some", keyword),
        };

        let reply = absent_on_error(IDEAS_ENDPOINT, self.post_json(IDEAS_ENDPOINT, &body).await)?;
        let ideas = absent_on_error(IDEAS_ENDPOINT, extract_keyword_ideas(reply))?;

        tracing::debug!(keyword, country, count = ideas.len(), "keyword ideas retrieved");
        Some(ideas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ahrefs::AhrefsConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn idea(keyword: &str) -> Value {
        json!({
            "keyword": keyword,
            "country": "us",
            "difficultyLabel": "Easy",
            "volumeLabel": "1K-10K",
            "updatedAt": "2025-04-01T00:00:00Z"
        })
    }

    #[test]
    fn test_merge_order() {
        let reply = json!(["Ok", {
            "allIdeas": {"results": [idea("rust"), idea("rust lang")], "total": 2},
            "questionIdeas": {"results": [idea("what is rust"), idea("is rust safe"), idea("why rust")], "total": 3}
        }]);

        let ideas = extract_keyword_ideas(reply).unwrap();

        assert_eq!(ideas.len(), 5);
        assert!(ideas[..2].iter().all(|i| i.label == IdeaLabel::Keyword));
        assert!(ideas[2..].iter().all(|i| i.label == IdeaLabel::Question));
        assert_eq!(ideas[0].value.keyword, "rust");
        assert_eq!(ideas[4].value.keyword, "why rust");
        assert_eq!(ideas[0].value.difficulty, "Easy");
        assert_eq!(ideas[0].value.volume, "1K-10K");
    }

    #[test]
    fn test_empty_merge_is_empty_list() {
        let reply = json!(["Ok", {"allIdeas": {"results": []}}]);
        assert_eq!(extract_keyword_ideas(reply).unwrap(), Vec::new());
    }

    #[test]
    fn test_defaults() {
        let reply = json!(["Ok", {"questionIdeas": {"results": [{"difficultyLabel": null, "volumeLabel": 500}]}}]);
        let ideas = extract_keyword_ideas(reply).unwrap();

        assert_eq!(
            ideas[0],
            LabeledIdea {
                label: IdeaLabel::Question,
                value: KeywordIdea {
                    keyword: "No keyword".into(),
                    country: "-".into(),
                    difficulty: "Unknown".into(),
                    volume: "500".into(),
                    updated_at: "-".into(),
                },
            }
        );
    }

    #[test]
    fn test_off_type_entries_keep_the_rest() {
        let reply = json!(["Ok", {
            "allIdeas": {"results": [idea("rust"), "junk", 4]},
            "questionIdeas": {"results": {"not": "a list"}}
        }]);

        let ideas = extract_keyword_ideas(reply).unwrap();

        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].value.keyword, "rust");
    }

    #[test]
    fn test_serialized_shape() {
        let rendered = serde_json::to_value(LabeledIdea {
            label: IdeaLabel::Keyword,
            value: RawIdea {
                keyword: Some(json!("seo")),
                country: None,
                difficulty_label: None,
                volume_label: None,
                updated_at: None,
            }
            .simplify(),
        })
        .unwrap();

        assert_eq!(
            rendered,
            json!({
                "label": "keyword ideas",
                "value": {"keyword": "seo", "country": "-", "difficulty": "Unknown", "volume": "Unknown", "updatedAt": "-"}
            })
        );
    }

    #[test]
    fn test_unusable_reply() {
        assert!(extract_keyword_ideas(json!(["Ok"])).is_err());
        assert!(extract_keyword_ideas(json!(["Ok", "nope"])).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let body = IdeasRequest {
            with_question_ideas: true,
            captcha: "T",
            search_engine: "Google",
            country: "us",
            keyword: ("Some", "rust"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "withQuestionIdeas": true,
                "captcha": "T",
                "searchEngine": "Google",
                "country": "us",
                "keyword": ["Some", "rust"]
            })
        );
    }

    #[tokio::test]
    async fn test_keyword_ideas_over_http() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v4/stGetFreeKeywordIdeas");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!(["Ok", {"allIdeas": {"results": [idea("rust")]}}]));
            })
            .await;

        let client = AhrefsClient::new(AhrefsConfig { base_url: server.base_url(), ..Default::default() }).unwrap();
        let ideas = client.keyword_ideas("T", "rust", "us", "Google").await.unwrap();

        assert_eq!(ideas.len(), 1);
        mock.assert_async().await;
    }
}
