use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Inferred emotional state attached to answers, puzzle runs and songs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    Happy,
    Sad,
    Angry,
    Calm,
    Depressed,
    Neutral,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 6] = [
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Angry,
        MoodLabel::Calm,
        MoodLabel::Depressed,
        MoodLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "Happy",
            MoodLabel::Sad => "Sad",
            MoodLabel::Angry => "Angry",
            MoodLabel::Calm => "Calm",
            MoodLabel::Depressed => "Depressed",
            MoodLabel::Neutral => "Neutral",
        }
    }

    /// Style class used when rendering the label, e.g. `mood-happy`
    pub fn css_class(&self) -> String {
        format!("mood-{}", self.as_str().to_lowercase())
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MoodLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown mood '{wanted}'"))
    }
}

/// Which elicitation experience produced the mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Quiz,
    Images,
    Puzzle,
    Combined,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Quiz => "quiz",
            ModuleType::Images => "images",
            ModuleType::Puzzle => "puzzle",
            ModuleType::Combined => "combined",
        }
    }
}

/// A song as returned by the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub song_id: Option<i64>,
    pub title: String,
    pub artist: String,
    pub mood: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub youtube_link: String,
}

impl Default for Song {
    fn default() -> Self {
        Song {
            song_id: None,
            title: "Unknown".to_string(),
            artist: "Unknown".to_string(),
            mood: MoodLabel::Neutral.to_string(),
            cover_url: String::new(),
            youtube_link: String::new(),
        }
    }
}

/// Telemetry of a finished puzzle as sent to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformancePayload {
    pub time: u32,
    pub mistakes: u32,
    #[serde(rename = "avgTimePerTile")]
    pub avg_time_per_tile: f64,
}

/// Request body for `POST /get_recommendations`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    pub mood: MoodLabel,
    pub module_type: ModuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selections: Option<BTreeMap<String, MoodLabel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformancePayload>,
}

impl RecommendationRequest {
    pub fn new(mood: MoodLabel, module_type: ModuleType) -> Self {
        Self {
            mood,
            module_type,
            confidence: None,
            selections: None,
            performance: None,
        }
    }
}

/// Response body of `POST /get_recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    pub success: bool,
    #[serde(default)]
    pub songs: Vec<Song>,
    pub dominant_mood: Option<String>,
    pub error: Option<String>,
}

/// Request body for `POST /register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /reset_password`
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Response body shared by the auth endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_label_parses_case_insensitively() {
        assert_eq!("happy".parse::<MoodLabel>(), Ok(MoodLabel::Happy));
        assert_eq!(" DEPRESSED ".parse::<MoodLabel>(), Ok(MoodLabel::Depressed));
        assert!("ecstatic".parse::<MoodLabel>().is_err());
    }

    #[test]
    fn test_mood_label_css_class() {
        assert_eq!(MoodLabel::Calm.css_class(), "mood-calm");
    }

    #[test]
    fn test_recommendation_request_omits_missing_metadata() {
        let request = RecommendationRequest::new(MoodLabel::Sad, ModuleType::Combined);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json, serde_json::json!({"mood": "Sad", "module_type": "combined"}));
    }

    #[test]
    fn test_performance_payload_uses_camel_case_average() {
        let mut request = RecommendationRequest::new(MoodLabel::Happy, ModuleType::Puzzle);
        request.performance = Some(PerformancePayload {
            time: 20,
            mistakes: 1,
            avg_time_per_tile: 0.75,
        });
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["performance"]["avgTimePerTile"], 0.75);
        assert_eq!(json["performance"]["time"], 20);
    }

    #[test]
    fn test_recommendation_response_tolerates_missing_songs() {
        let json = r#"{"success": false, "error": "No mood detected"}"#;
        let response: RecommendationResponse = serde_json::from_str(json).unwrap();

        assert!(!response.success);
        assert!(response.songs.is_empty());
        assert_eq!(response.error.as_deref(), Some("No mood detected"));
    }

    #[test]
    fn test_song_deserializes_backend_shape() {
        let json = r#"{"song_id": 3, "title": "Happy", "artist": "Pharrell Williams",
            "mood": "Happy", "cover_url": "https://img/1.jpg", "youtube_link": "https://yt/1"}"#;
        let song: Song = serde_json::from_str(json).unwrap();

        assert_eq!(song.song_id, Some(3));
        assert_eq!(song.artist, "Pharrell Williams");
    }
}
