//! Body-composition derivations: BMI and the U.S. Navy circumference
//! method. Stateless; inputs come from a measurement row plus the
//! customer's gender.

use serde::Serialize;

use crate::models::customer::Gender;
use crate::models::measurement::Measurement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseI,
    ObeseII,
    ObeseIII,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatCategory {
    VeryLow,
    Low,
    Normal,
    High,
    VeryHigh,
    ExtremelyHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyFatResult {
    pub value: f64,
    pub category: BodyFatCategory,
}

/// Required inputs that were absent or non-positive, named as guidance for
/// the operator rather than surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInputs(pub Vec<&'static str>);

/// Combined report for one measurement. `bmi` is null when height or weight
/// is unavailable; `body_fat` is null with `missing` listing what the Navy
/// formula still needs.
#[derive(Debug, Clone, Serialize)]
pub struct BodyComposition {
    pub bmi: Option<BmiResult>,
    pub body_fat: Option<BodyFatResult>,
    pub missing: Vec<&'static str>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// BMI = weight / height², height in meters, rounded to one decimal.
/// Requires both inputs present and positive; otherwise unavailable.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<BmiResult> {
    let height = height_cm.filter(|v| *v > 0.0)?;
    let weight = weight_kg.filter(|v| *v > 0.0)?;
    let meters = height / 100.0;
    let value = round1(weight / (meters * meters));
    Some(BmiResult {
        value,
        category: bmi_category(value),
    })
}

fn bmi_category(value: f64) -> BmiCategory {
    if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 25.0 {
        BmiCategory::Normal
    } else if value < 30.0 {
        BmiCategory::Overweight
    } else if value < 35.0 {
        BmiCategory::ObeseI
    } else if value < 40.0 {
        BmiCategory::ObeseII
    } else {
        BmiCategory::ObeseIII
    }
}

/// Navy body-fat percentage. Needs height, waist, neck and gender; anyone
/// not recorded as male is measured with the female formula, which also
/// needs the hip circumference. The result is clamped to [0, 100] and
/// rounded to one decimal; degenerate tape measurements (waist not larger
/// than neck) clamp to 0 rather than producing a non-finite value.
pub fn body_fat(
    gender: Option<Gender>,
    height_cm: Option<f64>,
    waist_cm: Option<f64>,
    neck_cm: Option<f64>,
    hip_cm: Option<f64>,
) -> Result<BodyFatResult, MissingInputs> {
    let mut missing = Vec::new();
    if gender.is_none() {
        missing.push("gender");
    }
    if height_cm.filter(|v| *v > 0.0).is_none() {
        missing.push("height");
    }
    if waist_cm.filter(|v| *v > 0.0).is_none() {
        missing.push("waist");
    }
    if neck_cm.filter(|v| *v > 0.0).is_none() {
        missing.push("neck");
    }
    if matches!(gender, Some(g) if g != Gender::Male) && hip_cm.filter(|v| *v > 0.0).is_none() {
        missing.push("hip");
    }
    if !missing.is_empty() {
        return Err(MissingInputs(missing));
    }

    let gender = gender.unwrap_or(Gender::Other);
    let height = height_cm.unwrap_or_default();
    let waist = waist_cm.unwrap_or_default();
    let neck = neck_cm.unwrap_or_default();

    let raw = if gender == Gender::Male {
        495.0 / (1.0324 - 0.19077 * (waist - neck).log10() + 0.15456 * height.log10()) - 450.0
    } else {
        let hip = hip_cm.unwrap_or_default();
        495.0 / (1.29579 - 0.35004 * (waist + hip - neck).log10() + 0.22100 * height.log10())
            - 450.0
    };
    // max/min instead of clamp so NaN from a degenerate log10 collapses to 0.
    let value = round1(raw.max(0.0).min(100.0));
    Ok(BodyFatResult {
        value,
        category: body_fat_category(value, gender),
    })
}

fn body_fat_category(value: f64, gender: Gender) -> BodyFatCategory {
    let thresholds = if gender == Gender::Male {
        [6.0, 14.0, 18.0, 25.0, 32.0]
    } else {
        [14.0, 21.0, 25.0, 32.0, 38.0]
    };
    if value < thresholds[0] {
        BodyFatCategory::VeryLow
    } else if value < thresholds[1] {
        BodyFatCategory::Low
    } else if value < thresholds[2] {
        BodyFatCategory::Normal
    } else if value < thresholds[3] {
        BodyFatCategory::High
    } else if value < thresholds[4] {
        BodyFatCategory::VeryHigh
    } else {
        BodyFatCategory::ExtremelyHigh
    }
}

/// Full report for a measurement row.
pub fn evaluate(gender: Option<Gender>, measurement: &Measurement) -> BodyComposition {
    let bmi = bmi(measurement.height_cm, measurement.weight_kg);
    match body_fat(
        gender,
        measurement.height_cm,
        measurement.waist_cm,
        measurement.neck_cm,
        measurement.hip_cm,
    ) {
        Ok(result) => BodyComposition {
            bmi,
            body_fat: Some(result),
            missing: Vec::new(),
        },
        Err(MissingInputs(missing)) => BodyComposition {
            bmi,
            body_fat: None,
            missing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_rounds_to_one_decimal() {
        let result = bmi(Some(175.0), Some(80.2)).unwrap();
        assert_eq!(result.value, 26.2);
        assert_eq!(result.category, BmiCategory::Overweight);
    }

    #[test]
    fn bmi_unavailable_without_positive_inputs() {
        assert!(bmi(None, Some(80.0)).is_none());
        assert!(bmi(Some(175.0), None).is_none());
        assert!(bmi(Some(0.0), Some(80.0)).is_none());
        assert!(bmi(Some(175.0), Some(-1.0)).is_none());
    }

    #[test]
    fn bmi_bands() {
        assert_eq!(bmi(Some(180.0), Some(55.0)).unwrap().category, BmiCategory::Underweight);
        assert_eq!(bmi(Some(180.0), Some(70.0)).unwrap().category, BmiCategory::Normal);
        assert_eq!(bmi(Some(180.0), Some(100.0)).unwrap().category, BmiCategory::ObeseI);
        assert_eq!(bmi(Some(160.0), Some(110.0)).unwrap().category, BmiCategory::ObeseIII);
    }

    #[test]
    fn navy_male_computable_without_hip() {
        let result = body_fat(Some(Gender::Male), Some(180.0), Some(85.0), Some(38.0), None)
            .unwrap();
        assert!(result.value >= 0.0 && result.value <= 100.0);
        assert_eq!(result.category, BodyFatCategory::Normal);
    }

    #[test]
    fn navy_female_requires_hip() {
        let err = body_fat(Some(Gender::Female), Some(165.0), Some(70.0), Some(33.0), None)
            .unwrap_err();
        assert_eq!(err.0, vec!["hip"]);

        let result =
            body_fat(Some(Gender::Female), Some(165.0), Some(70.0), Some(33.0), Some(95.0))
                .unwrap();
        assert!(result.value >= 0.0 && result.value <= 100.0);
    }

    #[test]
    fn navy_lists_every_missing_field() {
        let err = body_fat(None, None, None, Some(38.0), None).unwrap_err();
        assert_eq!(err.0, vec!["gender", "height", "waist"]);
    }

    #[test]
    fn navy_degenerate_tape_clamps_to_zero() {
        let result = body_fat(Some(Gender::Male), Some(180.0), Some(38.0), Some(38.0), None)
            .unwrap();
        assert_eq!(result.value, 0.0);
        assert_eq!(result.category, BodyFatCategory::VeryLow);
    }

    #[test]
    fn evaluate_combines_bmi_and_missing_guidance() {
        let measurement = Measurement {
            id: 1,
            customer_id: 1,
            measured_on: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            height_cm: Some(175.0),
            weight_kg: Some(80.2),
            waist_cm: None,
            hip_cm: None,
            arm_cm: None,
            neck_cm: Some(38.0),
            body_fat_pct: None,
            muscle_pct: None,
            notes: None,
            recorded_at: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };
        let report = evaluate(Some(Gender::Male), &measurement);
        assert_eq!(report.bmi.unwrap().value, 26.2);
        assert!(report.body_fat.is_none());
        assert_eq!(report.missing, vec!["waist"]);
    }
}
