//! Multi-step form models
//!
//! The form wizard collects three groups of fields over consecutive
//! requests: personal details, professional details, and order details.
//! In-progress state is held in the cache layer keyed by an opaque token;
//! nothing is written to the relational store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Steps of the form wizard, in submission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Professional,
    OrderDetails,
}

impl WizardStep {
    /// The step following this one, or `None` for the final step
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Personal => Some(WizardStep::Professional),
            WizardStep::Professional => Some(WizardStep::OrderDetails),
            WizardStep::OrderDetails => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Personal => "personal",
            WizardStep::Professional => "professional",
            WizardStep::OrderDetails => "order_details",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First step: who is filling the form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Second step: where they work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessionalDetails {
    pub company: String,
    pub job_title: String,
    #[serde(default)]
    pub experience_years: Option<u32>,
}

/// Final step: what they want
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub product: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for a single wizard submission.
///
/// Tagged by step name so a submission is rejected when it does not match
/// the wizard's current step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum WizardStepData {
    Personal(PersonalDetails),
    Professional(ProfessionalDetails),
    OrderDetails(OrderDetails),
}

impl WizardStepData {
    /// The step this payload belongs to
    pub fn step(&self) -> WizardStep {
        match self {
            WizardStepData::Personal(_) => WizardStep::Personal,
            WizardStepData::Professional(_) => WizardStep::Professional,
            WizardStepData::OrderDetails(_) => WizardStep::OrderDetails,
        }
    }
}

/// In-progress wizard state, cached under its token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    /// Opaque token identifying this wizard run
    pub token: String,
    /// The step awaiting submission
    pub current_step: WizardStep,
    pub personal: Option<PersonalDetails>,
    pub professional: Option<ProfessionalDetails>,
    pub order: Option<OrderDetails>,
    /// When the wizard was started
    pub created_at: DateTime<Utc>,
}

impl WizardState {
    /// Start a fresh wizard under the given token
    pub fn new(token: String) -> Self {
        Self {
            token,
            current_step: WizardStep::Personal,
            personal: None,
            professional: None,
            order: None,
            created_at: Utc::now(),
        }
    }

    /// Check whether every step has been submitted
    pub fn is_complete(&self) -> bool {
        self.personal.is_some() && self.professional.is_some() && self.order.is_some()
    }
}
