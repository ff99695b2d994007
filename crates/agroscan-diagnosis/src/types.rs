//! Diagnosis and dealer directory wire types.

use agroscan_core::{Dealer, TreatmentStep};
use serde::Deserialize;

/// Response body of `POST /diagnose`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosisResponse {
    pub disease_name: String,
    /// Confidence in percent, `0..=100`.
    pub confidence_score: f64,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    pub recommended_product: String,
}

/// One treatment step as the diagnosis API sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEntry {
    /// Free-form label such as `"1"` or `"Day 3"`.
    #[serde(deserialize_with = "day_label")]
    pub day: String,
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl DiagnosisResponse {
    /// Confidence clamped to `0..=100`.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence_score.clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn treatment_steps(&self) -> Vec<TreatmentStep> {
        self.timeline
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                TreatmentStep::from_labelled_day(
                    &entry.day,
                    i + 1,
                    entry.title.clone(),
                    entry.detail.clone(),
                )
            })
            .collect()
    }
}

/// `GET /dealers` answers either with a bare array or `{"dealers": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DealersPayload {
    List(Vec<Dealer>),
    Wrapped { dealers: Vec<Dealer> },
}

impl DealersPayload {
    #[must_use]
    pub fn into_dealers(self) -> Vec<Dealer> {
        match self {
            DealersPayload::List(dealers) | DealersPayload::Wrapped { dealers } => dealers,
        }
    }
}

/// Accepts the day label as either a JSON string or a number.
fn day_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(u64),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(s) => s,
        Label::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_response_parses_timeline_with_mixed_day_types() {
        let json = serde_json::json!({
            "disease_name": "Late Blight (Phytophthora infestans)",
            "confidence_score": 94.7,
            "timeline": [
                { "day": "Day 1", "title": "Urgent Treatment", "detail": "Spray Mancozeb - 2g/L water" },
                { "day": 3, "title": "Follow-up Application", "detail": "Apply Chlorothalonil - 1.5g/L water" },
                { "day": "7", "title": "Prevention Protocol" }
            ],
            "recommended_product": "Mancozeb 75% WP"
        });
        let resp: DiagnosisResponse = serde_json::from_value(json).unwrap();
        let steps = resp.treatment_steps();
        let days: Vec<u32> = steps.iter().map(|s| s.day).collect();
        assert_eq!(days, vec![1, 3, 7]);
        assert_eq!(steps[2].detail, "");
    }

    #[test]
    fn confidence_is_clamped() {
        let resp = DiagnosisResponse {
            disease_name: "x".into(),
            confidence_score: 140.0,
            timeline: vec![],
            recommended_product: "y".into(),
        };
        assert!((resp.confidence() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dealers_payload_accepts_both_shapes() {
        let dealer = serde_json::json!({
            "id": "1", "name": "Krishi Seva Kendra", "address": "Main Road, Pune",
            "distance": "2.3 km", "hasStock": true, "lat": 18.5204, "lng": 73.8567
        });
        let bare: DealersPayload = serde_json::from_value(serde_json::json!([dealer])).unwrap();
        let wrapped: DealersPayload =
            serde_json::from_value(serde_json::json!({ "dealers": [dealer] })).unwrap();
        assert_eq!(bare.into_dealers().len(), 1);
        assert_eq!(wrapped.into_dealers()[0].name, "Krishi Seva Kendra");
    }
}
