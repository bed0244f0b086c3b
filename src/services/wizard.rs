//! Multi-step form wizard service
//!
//! Drives the demo form wizard: three fixed steps (personal, professional,
//! order details) submitted over consecutive requests. In-progress state is
//! session-backed via the cache layer under an opaque token with a TTL;
//! completing the final step returns the collected data and discards the
//! state.

use crate::cache::{Cache, CacheLayer};
use crate::models::{
    OrderDetails, PersonalDetails, ProfessionalDetails, WizardState, WizardStep, WizardStepData,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Error types for wizard operations
#[derive(Debug, thiserror::Error)]
pub enum WizardServiceError {
    /// Unknown or expired wizard token
    #[error("Wizard not found")]
    NotFound,

    /// Validation error (bad field, or submission for the wrong step)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// The collected data of a completed wizard, in step order
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompletedForm {
    pub form_data: (PersonalDetails, ProfessionalDetails, OrderDetails),
}

/// Outcome of a step submission
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// More steps remain; the returned state names the next one
    Advanced(WizardState),
    /// The final step was submitted; state has been discarded
    Completed(CompletedForm),
}

/// Multi-step form wizard service
pub struct WizardService {
    cache: Arc<Cache>,
    ttl: Duration,
}

impl WizardService {
    /// Create a new wizard service with the given state TTL
    pub fn new(cache: Arc<Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    fn cache_key(token: &str) -> String {
        format!("wizard:{}", token)
    }

    /// Start a new wizard and return its initial state
    pub async fn start(&self) -> Result<WizardState, WizardServiceError> {
        let state = WizardState::new(Uuid::new_v4().to_string());

        self.cache
            .set(&Self::cache_key(&state.token), &state, self.ttl)
            .await
            .context("Failed to store wizard state")?;

        Ok(state)
    }

    /// Get the current state of a wizard
    pub async fn get(&self, token: &str) -> Result<WizardState, WizardServiceError> {
        self.cache
            .get::<WizardState>(&Self::cache_key(token))
            .await
            .context("Failed to load wizard state")?
            .ok_or(WizardServiceError::NotFound)
    }

    /// Submit the current step's data.
    ///
    /// The payload must match the wizard's current step; validation errors
    /// leave the state unchanged. Submitting the final step returns the
    /// collected data and deletes the state.
    pub async fn submit(
        &self,
        token: &str,
        data: WizardStepData,
    ) -> Result<SubmitOutcome, WizardServiceError> {
        let mut state = self.get(token).await?;

        if data.step() != state.current_step {
            return Err(WizardServiceError::ValidationError(format!(
                "Expected step '{}', got '{}'",
                state.current_step,
                data.step()
            )));
        }

        match data {
            WizardStepData::Personal(personal) => {
                validate_personal(&personal)?;
                state.personal = Some(personal);
            }
            WizardStepData::Professional(professional) => {
                validate_professional(&professional)?;
                state.professional = Some(professional);
            }
            WizardStepData::OrderDetails(order) => {
                validate_order(&order)?;
                state.order = Some(order);
            }
        }

        match state.current_step.next() {
            Some(next) => {
                state.current_step = next;
                self.cache
                    .set(&Self::cache_key(token), &state, self.ttl)
                    .await
                    .context("Failed to store wizard state")?;
                Ok(SubmitOutcome::Advanced(state))
            }
            None => {
                // All steps collected: hand the data back and drop the state
                let form_data = (
                    state.personal.context("personal step missing")?,
                    state.professional.context("professional step missing")?,
                    state.order.context("order step missing")?,
                );
                self.cache
                    .delete(&Self::cache_key(token))
                    .await
                    .context("Failed to discard wizard state")?;
                Ok(SubmitOutcome::Completed(CompletedForm { form_data }))
            }
        }
    }
}

fn validate_personal(personal: &PersonalDetails) -> Result<(), WizardServiceError> {
    if personal.first_name.trim().is_empty() {
        return Err(WizardServiceError::ValidationError(
            "first_name must not be empty".to_string(),
        ));
    }
    if personal.last_name.trim().is_empty() {
        return Err(WizardServiceError::ValidationError(
            "last_name must not be empty".to_string(),
        ));
    }
    if !personal.email.contains('@') {
        return Err(WizardServiceError::ValidationError(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(())
}

fn validate_professional(professional: &ProfessionalDetails) -> Result<(), WizardServiceError> {
    if professional.company.trim().is_empty() {
        return Err(WizardServiceError::ValidationError(
            "company must not be empty".to_string(),
        ));
    }
    if professional.job_title.trim().is_empty() {
        return Err(WizardServiceError::ValidationError(
            "job_title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_order(order: &OrderDetails) -> Result<(), WizardServiceError> {
    if order.product.trim().is_empty() {
        return Err(WizardServiceError::ValidationError(
            "product must not be empty".to_string(),
        ));
    }
    if order.quantity == 0 {
        return Err(WizardServiceError::ValidationError(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::CacheConfig;

    fn service() -> WizardService {
        WizardService::new(
            create_cache(&CacheConfig::default()),
            Duration::from_secs(1800),
        )
    }

    fn personal() -> WizardStepData {
        WizardStepData::Personal(PersonalDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        })
    }

    fn professional() -> WizardStepData {
        WizardStepData::Professional(ProfessionalDetails {
            company: "Analytical Engines".to_string(),
            job_title: "Programmer".to_string(),
            experience_years: Some(10),
        })
    }

    fn order() -> WizardStepData {
        WizardStepData::OrderDetails(OrderDetails {
            product: "Difference engine".to_string(),
            quantity: 1,
            notes: None,
        })
    }

    #[tokio::test]
    async fn test_start_begins_at_personal() {
        let service = service();
        let state = service.start().await.expect("Start failed");

        assert_eq!(state.current_step, WizardStep::Personal);
        assert!(!state.token.is_empty());

        let loaded = service.get(&state.token).await.expect("Get failed");
        assert_eq!(loaded.current_step, WizardStep::Personal);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let service = service();
        let result = service.get("no-such-token").await;
        assert!(matches!(result, Err(WizardServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_full_walkthrough() {
        let service = service();
        let state = service.start().await.expect("Start failed");

        let outcome = service
            .submit(&state.token, personal())
            .await
            .expect("Submit failed");
        let state = match outcome {
            SubmitOutcome::Advanced(s) => s,
            SubmitOutcome::Completed(_) => panic!("Should not complete yet"),
        };
        assert_eq!(state.current_step, WizardStep::Professional);

        let outcome = service
            .submit(&state.token, professional())
            .await
            .expect("Submit failed");
        let state = match outcome {
            SubmitOutcome::Advanced(s) => s,
            SubmitOutcome::Completed(_) => panic!("Should not complete yet"),
        };
        assert_eq!(state.current_step, WizardStep::OrderDetails);

        let outcome = service
            .submit(&state.token, order())
            .await
            .expect("Submit failed");
        let completed = match outcome {
            SubmitOutcome::Completed(c) => c,
            SubmitOutcome::Advanced(_) => panic!("Should be complete"),
        };
        assert_eq!(completed.form_data.0.first_name, "Ada");
        assert_eq!(completed.form_data.1.company, "Analytical Engines");
        assert_eq!(completed.form_data.2.quantity, 1);

        // State is discarded after completion
        let result = service.get(&state.token).await;
        assert!(matches!(result, Err(WizardServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_out_of_order_submission_rejected() {
        let service = service();
        let state = service.start().await.expect("Start failed");

        let result = service.submit(&state.token, order()).await;
        assert!(matches!(
            result,
            Err(WizardServiceError::ValidationError(_))
        ));

        // State unchanged
        let loaded = service.get(&state.token).await.expect("Get failed");
        assert_eq!(loaded.current_step, WizardStep::Personal);
    }

    #[tokio::test]
    async fn test_invalid_fields_do_not_advance() {
        let service = service();
        let state = service.start().await.expect("Start failed");

        let bad = WizardStepData::Personal(PersonalDetails {
            first_name: "".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        });

        let result = service.submit(&state.token, bad).await;
        assert!(matches!(
            result,
            Err(WizardServiceError::ValidationError(_))
        ));

        let loaded = service.get(&state.token).await.expect("Get failed");
        assert_eq!(loaded.current_step, WizardStep::Personal);
        assert!(loaded.personal.is_none());
    }
}
