//! Request and response types for the AI tips service.
//!
//! Clients send profile numbers either as JSON numbers or as the strings
//! typed into form inputs, so the incoming profile is parsed leniently and
//! then normalised into a [FinancialProfile] with defaults filled in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

const DEFAULT_AGE: u32 = 25;

/// The kind of advice to ask the AI service for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipType {
    #[default]
    General,
    Budgeting,
    Saving,
    Investing,
    Debt,
    Emergency,
}

impl TipType {
    pub const ALL: [TipType; 6] = [
        TipType::General,
        TipType::Budgeting,
        TipType::Saving,
        TipType::Investing,
        TipType::Debt,
        TipType::Emergency,
    ];

    /// The value sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TipType::General => "general",
            TipType::Budgeting => "budgeting",
            TipType::Saving => "saving",
            TipType::Investing => "investing",
            TipType::Debt => "debt",
            TipType::Emergency => "emergency",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TipType::General => "General Advice",
            TipType::Budgeting => "Budgeting",
            TipType::Saving => "Saving Money",
            TipType::Investing => "Investment",
            TipType::Debt => "Debt Management",
            TipType::Emergency => "Emergency Fund",
        }
    }

    /// Parse a wire value, `None` for anything unknown.
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tip_type| tip_type.as_str() == text.trim())
    }
}

/// How much investment risk the user is comfortable with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [
        RiskTolerance::Low,
        RiskTolerance::Medium,
        RiskTolerance::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTolerance::Low => "Conservative",
            RiskTolerance::Medium => "Moderate",
            RiskTolerance::High => "Aggressive",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|risk_tolerance| risk_tolerance.as_str() == text.trim())
    }
}

/// The financial profile as sent by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub monthly_income: Option<Value>,
    pub monthly_expenses: Option<Value>,
    pub savings_goal: Option<Value>,
    pub current_savings: Option<Value>,
    pub debt_amount: Option<Value>,
    pub age: Option<Value>,
    pub financial_goals: Option<Value>,
    pub spending_categories: Option<Value>,
    pub risk_tolerance: Option<String>,
}

/// The body of a request for tips, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TipsRequestInput {
    pub profile: Option<ProfileInput>,
    pub tip_type: Option<String>,
    pub context: Option<String>,
}

/// A validated financial profile with defaults filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialProfile {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub savings_goal: f64,
    pub current_savings: f64,
    pub debt_amount: f64,
    pub age: u32,
    pub financial_goals: Vec<String>,
    pub spending_categories: BTreeMap<String, f64>,
    pub risk_tolerance: RiskTolerance,
}

/// The request sent to the AI service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipsRequest {
    pub profile: FinancialProfile,
    pub tip_type: TipType,
    pub context: Option<String>,
}

/// The tips generated by the AI service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipsResponse {
    pub tips: Vec<String>,
    pub priority_level: String,
    pub estimated_impact: String,
    pub action_items: Vec<String>,
    pub personalized_message: String,
}

/// Read a number from a JSON number or a numeric string.
///
/// Empty strings, unparsable strings and non-finite numbers give `None`.
fn parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

/// Read a required number the way a truthiness check would.
///
/// A zero JSON number counts as missing, but a non-empty string such as `"0"`
/// is present and parsed.
fn parse_required(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(_) => parse_non_zero(value),
        Value::String(_) => parse_number(value),
        _ => None,
    }
}

/// Like [parse_number], but zero also counts as missing.
fn parse_non_zero(value: Option<&Value>) -> Option<f64> {
    parse_number(value).filter(|number| *number != 0.0)
}

fn parse_goals(value: Option<&Value>) -> Vec<String> {
    let goals: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        Some(Value::String(text)) => text.split(',').map(str::to_owned).collect(),
        _ => Vec::new(),
    };

    goals
        .into_iter()
        .map(|goal| goal.trim().to_owned())
        .filter(|goal| !goal.is_empty())
        .collect()
}

fn parse_categories(value: Option<&Value>) -> BTreeMap<String, f64> {
    match value {
        Some(Value::Object(categories)) => categories
            .iter()
            .filter_map(|(name, amount)| Some((name.clone(), parse_number(Some(amount))?)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

impl TryFrom<ProfileInput> for FinancialProfile {
    type Error = Error;

    /// Validate the profile and fill in defaults for the optional fields.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingProfileInformation] if the monthly income or
    /// monthly expenses are missing, unparsable or the number zero.
    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        let monthly_income = parse_required(input.monthly_income.as_ref())
            .ok_or(Error::MissingProfileInformation)?;
        let monthly_expenses = parse_required(input.monthly_expenses.as_ref())
            .ok_or(Error::MissingProfileInformation)?;

        let age = parse_non_zero(input.age.as_ref())
            .filter(|age| *age >= 1.0 && *age <= u32::MAX as f64)
            .map(|age| age.trunc() as u32)
            .unwrap_or(DEFAULT_AGE);

        let risk_tolerance = match input.risk_tolerance.as_deref() {
            None | Some("") => RiskTolerance::default(),
            Some(text) => RiskTolerance::parse(text).unwrap_or_else(|| {
                tracing::warn!("Unknown risk tolerance \"{text}\", using the default");
                RiskTolerance::default()
            }),
        };

        Ok(Self {
            monthly_income,
            monthly_expenses,
            savings_goal: parse_number(input.savings_goal.as_ref()).unwrap_or(0.0),
            current_savings: parse_number(input.current_savings.as_ref()).unwrap_or(0.0),
            debt_amount: parse_number(input.debt_amount.as_ref()).unwrap_or(0.0),
            age,
            financial_goals: parse_goals(input.financial_goals.as_ref()),
            spending_categories: parse_categories(input.spending_categories.as_ref()),
            risk_tolerance,
        })
    }
}

impl TryFrom<TipsRequestInput> for TipsRequest {
    type Error = Error;

    fn try_from(input: TipsRequestInput) -> Result<Self, Self::Error> {
        let profile = input
            .profile
            .ok_or(Error::MissingProfileInformation)?
            .try_into()?;

        let tip_type = match input.tip_type.as_deref() {
            None | Some("") => TipType::default(),
            Some(text) => TipType::parse(text).unwrap_or_else(|| {
                tracing::warn!("Unknown tip type \"{text}\", using the default");
                TipType::default()
            }),
        };

        let context = input
            .context
            .map(|context| context.trim().to_owned())
            .filter(|context| !context.is_empty());

        Ok(Self {
            profile,
            tip_type,
            context,
        })
    }
}
