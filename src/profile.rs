//! The fitness profile submitted by a user, plus the BMI context that feeds
//! the plan prompt.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietPreference {
    Vegetarian,
    NonVegetarian,
    Vegan,
}

impl DietPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::NonVegetarian => "Non-Vegetarian",
            DietPreference::Vegan => "Vegan",
        }
    }
}

/// WHO-style body-mass-index buckets used as prompt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "underweight",
            BmiStatus::Normal => "normal",
            BmiStatus::Overweight => "overweight",
            BmiStatus::Obese => "obese",
        }
    }
}

/// Everything the plan prompt needs about the user.
///
/// `goal`, `city` and `area` are required free text; the API layer rejects
/// requests where any of them is blank. Health conditions and allergies are
/// optional and default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub goal: String,
    pub city: String,
    pub area: String,
    pub age: u32,
    pub gender: Gender,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in meters.
    pub height: f64,
    pub diet_preference: DietPreference,
    #[serde(default)]
    pub health_conditions: String,
    #[serde(default)]
    pub allergies: String,
}

impl UserProfile {
    /// Body mass index, `kg / m^2`.
    pub fn bmi(&self) -> f64 {
        self.weight / (self.height * self.height)
    }

    pub fn bmi_status(&self) -> BmiStatus {
        let bmi = self.bmi();
        if bmi < 18.5 {
            BmiStatus::Underweight
        } else if bmi < 24.9 {
            BmiStatus::Normal
        } else if bmi < 29.9 {
            BmiStatus::Overweight
        } else {
            BmiStatus::Obese
        }
    }

    /// The free-text fields that must be filled in before a plan is requested.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.goal.trim().is_empty() {
            Some("goal")
        } else if self.city.trim().is_empty() {
            Some("city")
        } else if self.area.trim().is_empty() {
            Some("area")
        } else {
            None
        }
    }
}
