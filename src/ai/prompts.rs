//! The plan-request prompt and the example goals shown to users.
//!
//! Centralizing these strings makes it easy to tweak what the model is asked
//! for without digging through the request plumbing.

use crate::profile::UserProfile;

/// Example goal descriptions a rendering layer can offer as starting points.
pub const EXAMPLE_GOALS: [&str; 5] = [
    "I want to build lean muscle with a high-protein diet.",
    "I want to lose fat with an Indian vegetarian meal plan.",
    "I want to gain healthy weight with a balanced diet.",
    "I want to maintain my fitness with light workouts.",
    "I have diabetes and want a low-sugar meal plan.",
];

/// Render the full plan request for one profile.
///
/// The closing header list tells the model exactly which section headers to
/// echo back; section extraction anchors on those lines.
pub fn build_plan_prompt(profile: &UserProfile, labels: &[String]) -> String {
    let headers: String = labels
        .iter()
        .map(|label| format!("{label}:\n"))
        .collect();

    format!(
        "Based on the following details:\n\
         - Goal: {goal}\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Weight: {weight} kg\n\
         - Height: {height} m\n\
         - BMI Status: {bmi_status}\n\
         - Dietary Preference: {diet}\n\
         - Health Conditions: {conditions}\n\
         - Allergies: {allergies}\n\
         - Location: {city}, {area}\n\
         \n\
         Suggest:\n\
         1. 6 restaurant names (within 5 km of {area}, {city})\n\
         2. 6 breakfast ideas suitable for the user's goal\n\
         3. 5 dinner meal ideas\n\
         4. 6 workouts suitable for the user's body type and goal\n\
         \n\
         Use these headers in your response:\n\
         {headers}",
        goal = profile.goal,
        age = profile.age,
        gender = profile.gender.as_str(),
        weight = profile.weight,
        height = profile.height,
        bmi_status = profile.bmi_status().as_str(),
        diet = profile.diet_preference.as_str(),
        conditions = optional(&profile.health_conditions),
        allergies = optional(&profile.allergies),
        city = profile.city,
        area = profile.area,
    )
}

fn optional(text: &str) -> &str {
    if text.trim().is_empty() {
        "None"
    } else {
        text
    }
}
