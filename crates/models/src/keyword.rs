use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::errors::ModelError;
use crate::{require_amount, require_text, Record};

pub type KeywordId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordState {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keyword {
    pub id: KeywordId,
    pub campaign_id: CampaignId,
    pub text: String,
    pub bid: f64,
    pub match_type: MatchType,
    pub state: KeywordState,
}

impl Record for Keyword {
    const COLLECTION: &'static str = "keywords";

    fn id(&self) -> u64 {
        self.id
    }
}

/// Keyword fields supplied on creation; the owning campaign is passed separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordInput {
    pub text: String,
    pub bid: f64,
    pub match_type: MatchType,
    #[serde(default)]
    pub state: KeywordState,
}

impl KeywordInput {
    pub fn new(text: impl Into<String>, bid: f64, match_type: MatchType, state: KeywordState) -> Self {
        Self { text: text.into(), bid, match_type, state }
    }

    pub fn validate(self) -> Result<Self, ModelError> {
        Ok(Self {
            text: require_text("text", &self.text)?,
            bid: require_amount("bid", self.bid)?,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_lowercase_wire_names() {
        let raw = r#"{"id":2,"campaign_id":1,"text":"shoes","bid":1.25,"match_type":"broad","state":"enabled"}"#;
        let kw: Keyword = serde_json::from_str(raw).unwrap();
        assert_eq!(kw.match_type, MatchType::Broad);
        assert_eq!(kw.state, KeywordState::Enabled);

        let bad = raw.replace("broad", "fuzzy");
        assert!(serde_json::from_str::<Keyword>(&bad).is_err());
    }

    #[test]
    fn input_state_defaults_to_enabled() {
        let input: KeywordInput =
            serde_json::from_str(r#"{"text":"shoes","bid":0.5,"match_type":"exact"}"#).unwrap();
        assert_eq!(input.state, KeywordState::Enabled);
    }

    #[test]
    fn input_validation() {
        let ok = KeywordInput::new(" red shoes ", 0.0, MatchType::Exact, KeywordState::Disabled)
            .validate()
            .unwrap();
        assert_eq!(ok.text, "red shoes");
        assert_eq!(ok.state, KeywordState::Disabled);
        assert_eq!(
            KeywordInput::new("", 1.0, MatchType::Exact, KeywordState::Enabled).validate(),
            Err(ModelError::Validation("text required".into()))
        );
        assert!(KeywordInput::new("x", -2.0, MatchType::Exact, KeywordState::Enabled).validate().is_err());
    }
}
