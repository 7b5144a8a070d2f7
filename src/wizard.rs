//! Two-step intake wizard.
//!
//! The whole flow is a tiny state machine: collect the draft, then show it
//! back for confirmation. The serialized form doubles as the stored session
//! value and the step reply sent to the frontend, so both always agree on
//! where the person is.

use serde::{Deserialize, Serialize};

use crate::submission::{Draft, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Wizard {
    CollectingData {
        /// Draft carried back from the confirmation screen, re-displayed so
        /// nothing the person typed is lost.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefill: Option<Draft>,
    },
    Confirming {
        draft: Draft,
    },
}

impl Default for Wizard {
    fn default() -> Self {
        Wizard::CollectingData { prefill: None }
    }
}

impl Wizard {
    /// Validates the posted draft and moves to the confirmation step. On a
    /// validation failure the state is left untouched. Submitting while
    /// already confirming replaces the parked draft, an edit-and-resubmit.
    pub fn submit(&mut self, draft: Draft) -> Result<(), ValidationError> {
        draft.validate()?;

        *self = Wizard::Confirming { draft };

        Ok(())
    }

    /// Returns to the collection step, keeping the draft for re-display.
    pub fn back(&mut self) {
        let current = std::mem::take(self);

        *self = match current {
            Wizard::Confirming { draft } => Wizard::CollectingData {
                prefill: Some(draft),
            },
            other => other,
        };
    }

    /// The draft staged for confirmation, if the wizard is on that step.
    pub fn confirming(&self) -> Option<&Draft> {
        match self {
            Wizard::Confirming { draft } => Some(draft),
            Wizard::CollectingData { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::Sex;

    fn draft() -> Draft {
        Draft {
            full_name: "Joao Pereira".to_string(),
            birth_date: "1988-11-02".to_string(),
            nationality: "Mocambicana".to_string(),
            sex: Sex::Male,
            primary_phone: "+258 84 123 4567".to_string(),
            alternate_phone: "+258 82 765 4321".to_string(),
            email: "joao@example.com".to_string(),
        }
    }

    #[test]
    fn submit_moves_to_confirming_with_fields_unchanged() {
        let mut wizard = Wizard::default();

        wizard.submit(draft()).unwrap();

        assert_eq!(wizard.confirming(), Some(&draft()));
    }

    #[test]
    fn invalid_submit_leaves_state_unchanged() {
        let mut wizard = Wizard::default();

        let mut bad = draft();
        bad.email = "no-at-sign".to_string();

        assert_eq!(
            wizard.submit(bad),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(wizard, Wizard::default());
    }

    #[test]
    fn back_preserves_the_draft() {
        let mut wizard = Wizard::default();
        wizard.submit(draft()).unwrap();

        wizard.back();

        assert_eq!(
            wizard,
            Wizard::CollectingData {
                prefill: Some(draft())
            }
        );
    }

    #[test]
    fn back_from_collecting_is_a_no_op() {
        let mut wizard = Wizard::CollectingData {
            prefill: Some(draft()),
        };

        wizard.back();

        assert_eq!(
            wizard,
            Wizard::CollectingData {
                prefill: Some(draft())
            }
        );
    }

    #[test]
    fn nothing_to_confirm_while_collecting() {
        assert_eq!(Wizard::default().confirming(), None);
    }

    #[test]
    fn stored_form_round_trips_through_the_step_tag() {
        let mut wizard = Wizard::default();
        wizard.submit(draft()).unwrap();

        let json = serde_json::to_string(&wizard).unwrap();
        assert!(json.contains("\"step\":\"confirming\""));

        let restored: Wizard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }
}
