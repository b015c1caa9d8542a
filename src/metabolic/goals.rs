//! Nutrition goals calculator
//!
//! Derives daily calorie and macro targets from body metrics using the
//! Mifflin-St Jeor BMR equation and a fixed 500 kcal/day deficit.

use serde::{Deserialize, Serialize};

/// Conversion factor: pounds to kilograms
const LB_TO_KG: f64 = 0.453592;

/// Conversion factor: inches to centimeters
const IN_TO_CM: f64 = 2.54;

/// Fixed daily calorie deficit applied to TDEE
const DAILY_DEFICIT_KCAL: f64 = 500.0;

/// Protein target: grams per pound of an assumed 75%-lean-mass estimate
const PROTEIN_PER_LB: f64 = 0.75;

/// Fat target: grams per pound of body weight
const FAT_PER_LB: f64 = 0.35;

/// Daily fiber target in grams, constant regardless of body metrics
const FIBER_G: i32 = 35;

/// Biological sex category for the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "male" => Sex::Male,
            "female" => Sex::Female,
            _ => Sex::Other,
        }
    }
}

/// Activity level category used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Unknown strings fall back to sedentary (multiplier 1.2)
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// TDEE multiplier for this activity level
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Body metrics input to the goals calculator
///
/// All fields are required here; callers substitute defaults upstream when a
/// stored profile is incomplete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub weight_lb: f64,
    pub height_in: f64,
    pub age: f64,
    pub sex: Sex,
    pub activity: ActivityLevel,
}

/// Daily calorie and macro targets
///
/// Pure function of ProfileMetrics; never persisted, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub calories: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fats_g: i32,
    pub fiber_g: i32,
}

impl Default for NutritionGoals {
    /// Fallback goals used when no profile is stored
    fn default() -> Self {
        Self {
            calories: 2000,
            protein_g: 150,
            carbs_g: 200,
            fats_g: 65,
            fiber_g: FIBER_G,
        }
    }
}

/// Basal metabolic rate via Mifflin-St Jeor
///
/// The "other" sex category reuses the male formula. That mirrors the product
/// policy as shipped; there is no third formula in the literature this app
/// draws from, and the gap is documented rather than papered over.
pub fn basal_metabolic_rate(metrics: &ProfileMetrics) -> f64 {
    let kg = metrics.weight_lb * LB_TO_KG;
    let cm = metrics.height_in * IN_TO_CM;
    let base = 10.0 * kg + 6.25 * cm - 5.0 * metrics.age;

    match metrics.sex {
        Sex::Male | Sex::Other => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure: BMR scaled by activity level
pub fn total_daily_energy_expenditure(metrics: &ProfileMetrics) -> f64 {
    basal_metabolic_rate(metrics) * metrics.activity.multiplier()
}

/// Calculate daily nutrition goals from body metrics
///
/// Deterministic and total: every numeric input produces an output, with no
/// validation or clamping. Carbs can go negative for very low calorie targets
/// combined with the protein/fat floors of a heavy body weight; that boundary
/// is left as-is.
pub fn calculate_nutrition_goals(metrics: &ProfileMetrics) -> NutritionGoals {
    let tdee = total_daily_energy_expenditure(metrics);
    let calories = (tdee - DAILY_DEFICIT_KCAL).round() as i32;

    let protein_g = (PROTEIN_PER_LB * metrics.weight_lb).round() as i32;
    let fats_g = (FAT_PER_LB * metrics.weight_lb).round() as i32;

    // Remaining calories after protein (4 kcal/g) and fat (9 kcal/g)
    let carbs_g =
        ((calories as f64 - (protein_g * 4) as f64 - (fats_g * 9) as f64) / 4.0).round() as i32;

    NutritionGoals {
        calories,
        protein_g,
        carbs_g,
        fats_g,
        fiber_g: FIBER_G,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(weight_lb: f64, height_in: f64, age: f64, sex: Sex, activity: ActivityLevel) -> ProfileMetrics {
        ProfileMetrics {
            weight_lb,
            height_in,
            age,
            sex,
            activity,
        }
    }

    #[test]
    fn test_protein_and_fat_scale_with_weight() {
        let light = calculate_nutrition_goals(&metrics(150.0, 70.0, 40.0, Sex::Male, ActivityLevel::Moderate));
        let heavy = calculate_nutrition_goals(&metrics(300.0, 70.0, 40.0, Sex::Male, ActivityLevel::Moderate));

        assert!(heavy.protein_g > light.protein_g);
        assert!(heavy.fats_g > light.fats_g);
        // Protein is proportional to weight: doubling weight doubles the target
        assert!(heavy.protein_g as f64 >= 1.5 * light.protein_g as f64);
    }

    #[test]
    fn test_bmr_sex_constant_difference() {
        let male = metrics(180.0, 70.0, 35.0, Sex::Male, ActivityLevel::Sedentary);
        let female = metrics(180.0, 70.0, 35.0, Sex::Female, ActivityLevel::Sedentary);

        let diff = basal_metabolic_rate(&male) - basal_metabolic_rate(&female);
        assert!((diff - 166.0).abs() < 1e-9);

        let male_goals = calculate_nutrition_goals(&male);
        let female_goals = calculate_nutrition_goals(&female);
        assert!(female_goals.calories < male_goals.calories);
    }

    #[test]
    fn test_other_sex_uses_male_formula() {
        let male = metrics(180.0, 70.0, 35.0, Sex::Male, ActivityLevel::Light);
        let other = metrics(180.0, 70.0, 35.0, Sex::Other, ActivityLevel::Light);

        assert_eq!(
            calculate_nutrition_goals(&male),
            calculate_nutrition_goals(&other)
        );
    }

    #[test]
    fn test_activity_level_ordering() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ];

        let calories: Vec<i32> = levels
            .iter()
            .map(|&activity| {
                calculate_nutrition_goals(&metrics(200.0, 70.0, 45.0, Sex::Male, activity)).calories
            })
            .collect();

        for pair in calories.windows(2) {
            assert!(pair[0] < pair[1], "expected {} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_fiber_is_constant() {
        let a = calculate_nutrition_goals(&metrics(120.0, 62.0, 25.0, Sex::Female, ActivityLevel::Sedentary));
        let b = calculate_nutrition_goals(&metrics(350.0, 78.0, 70.0, Sex::Male, ActivityLevel::VeryActive));

        assert_eq!(a.fiber_g, 35);
        assert_eq!(b.fiber_g, 35);
    }

    #[test]
    fn test_unknown_activity_defaults_to_sedentary() {
        assert_eq!(ActivityLevel::from_str("couch"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str(""), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str("VERY_ACTIVE"), ActivityLevel::VeryActive);
    }

    #[test]
    fn test_reference_profile() {
        // 312 lb, 72 in, 61 years, male, very active
        let m = metrics(312.0, 72.0, 61.0, Sex::Male, ActivityLevel::VeryActive);

        let bmr = basal_metabolic_rate(&m);
        assert!((bmr - 2258.2).abs() < 1.0);

        let tdee = total_daily_energy_expenditure(&m);
        assert!((tdee - 4290.6).abs() < 2.0);

        let goals = calculate_nutrition_goals(&m);
        assert!(goals.calories > 3700 && goals.calories < 3900);
        assert!(goals.protein_g > 220 && goals.protein_g < 250);
        assert!(goals.carbs_g > 450 && goals.carbs_g < 500);
        assert!(goals.fats_g > 100 && goals.fats_g < 120);
        assert_eq!(goals.fiber_g, 35);
    }

    #[test]
    fn test_negative_carbs_not_clamped() {
        // Heavy, short, old, sedentary: low calorie target with high
        // protein/fat floors pushes carbs negative. Preserved as-is.
        let m = metrics(400.0, 58.0, 90.0, Sex::Female, ActivityLevel::Sedentary);
        let goals = calculate_nutrition_goals(&m);

        let carb_kcal = goals.calories - goals.protein_g * 4 - goals.fats_g * 9;
        if carb_kcal < 0 {
            assert!(goals.carbs_g < 0);
        }
    }
}
