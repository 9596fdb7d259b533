//! Onboarding survey persistence.
//!
//! The survey is stored as one JSON document next to the journal entries,
//! with a separate completion flag so callers can check whether onboarding
//! is done without parsing the answers.

use crate::constants::{SURVEY_COMPLETED_KEY, SURVEY_COMPLETED_VALUE, SURVEY_DATA_KEY};
use crate::errors::{AppResult, StorageError, ValidationError};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Answers to the onboarding survey. All fields are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyResponses {
    pub vision_month: String,
    #[serde(rename = "vision1Year")]
    pub vision_1_year: String,
    #[serde(rename = "vision5Years")]
    pub vision_5_years: String,
    #[serde(rename = "vision10Years")]
    pub vision_10_years: String,
    #[serde(rename = "vision20Years")]
    pub vision_20_years: String,
    pub vision_lifelong: String,
    pub routine_weekday: String,
    pub routine_weekend: String,
    pub doing_well: String,
    pub struggling_with: String,
    pub change_one_thing: String,
    pub anything_else: String,
}

impl SurveyResponses {
    /// Serialized names of the required answers that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("visionLifelong", &self.vision_lifelong),
            ("routineWeekday", &self.routine_weekday),
            ("doingWell", &self.doing_well),
            ("strugglingWith", &self.struggling_with),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Stores the onboarding survey through an injected key-value backend.
pub struct OnboardingStore {
    backend: Arc<dyn KeyValueStore>,
}

impl OnboardingStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Validates and stores the survey, then marks onboarding complete.
    ///
    /// # Errors
    ///
    /// - `ValidationError::IncompleteSurvey` if a required answer is blank;
    ///   nothing is written.
    /// - `StorageError` if either write fails. The completion flag is only
    ///   set after the answers were stored.
    pub fn submit(&self, survey: &SurveyResponses) -> AppResult<()> {
        let missing = survey.missing_required();
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteSurvey { missing }.into());
        }

        let serialized = serde_json::to_string(survey).map_err(|source| StorageError::Encode {
            key: SURVEY_DATA_KEY.to_string(),
            source,
        })?;
        self.backend.set(SURVEY_DATA_KEY, &serialized)?;
        self.backend
            .set(SURVEY_COMPLETED_KEY, SURVEY_COMPLETED_VALUE)?;

        info!("Onboarding survey submitted");
        Ok(())
    }

    /// Returns the stored survey, or empty answers if none can be read.
    pub fn load(&self) -> SurveyResponses {
        let raw = match self.backend.get(SURVEY_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SurveyResponses::default(),
            Err(e) => {
                warn!("Error loading survey data: {}", e);
                return SurveyResponses::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Stored survey data is not valid JSON: {}", e);
            SurveyResponses::default()
        })
    }

    pub fn is_completed(&self) -> bool {
        match self.backend.get(SURVEY_COMPLETED_KEY) {
            Ok(flag) => flag.as_deref() == Some(SURVEY_COMPLETED_VALUE),
            Err(e) => {
                warn!("Error reading onboarding flag: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::storage::MemoryStore;

    fn complete_survey() -> SurveyResponses {
        SurveyResponses {
            vision_lifelong: "Live with curiosity".to_string(),
            routine_weekday: "Work, gym, read".to_string(),
            doing_well: "Sleeping enough".to_string(),
            struggling_with: "Focus".to_string(),
            ..SurveyResponses::default()
        }
    }

    #[test]
    fn test_missing_required_fields() {
        let survey = SurveyResponses {
            vision_lifelong: "Something".to_string(),
            routine_weekday: "  ".to_string(),
            vision_month: "Not required".to_string(),
            ..SurveyResponses::default()
        };

        assert_eq!(
            survey.missing_required(),
            vec!["routineWeekday", "doingWell", "strugglingWith"]
        );
        assert!(complete_survey().missing_required().is_empty());
    }

    #[test]
    fn test_submit_incomplete_survey_writes_nothing() {
        let backend = Arc::new(MemoryStore::new());
        let store = OnboardingStore::new(backend.clone());

        let result = store.submit(&SurveyResponses::default());

        match result {
            Err(AppError::Validation(ValidationError::IncompleteSurvey { missing })) => {
                assert_eq!(missing.len(), 4);
            }
            other => panic!("Expected IncompleteSurvey, got {:?}", other),
        }
        assert!(backend.is_empty());
        assert!(!store.is_completed());
    }

    #[test]
    fn test_submit_stores_survey_and_flag() {
        let backend = Arc::new(MemoryStore::new());
        let store = OnboardingStore::new(backend.clone());
        assert!(!store.is_completed());

        store.submit(&complete_survey()).unwrap();

        assert!(store.is_completed());
        assert_eq!(store.load(), complete_survey());
        assert_eq!(
            backend.get(SURVEY_COMPLETED_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let survey = SurveyResponses {
            vision_1_year: "a".to_string(),
            vision_20_years: "b".to_string(),
            change_one_thing: "c".to_string(),
            ..SurveyResponses::default()
        };

        let value = serde_json::to_value(&survey).unwrap();
        assert_eq!(value["vision1Year"], "a");
        assert_eq!(value["vision20Years"], "b");
        assert_eq!(value["changeOneThing"], "c");
        assert_eq!(value.as_object().unwrap().len(), 12);
    }

    #[test]
    fn test_load_malformed_survey_falls_back() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(SURVEY_DATA_KEY, "[1, 2").unwrap();
        let store = OnboardingStore::new(backend);

        assert_eq!(store.load(), SurveyResponses::default());
    }
}
