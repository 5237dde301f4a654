use crate::models::{ModuleType, MoodLabel, PerformancePayload, RecommendationResponse, Song};
use askama_escape::{escape, Html};
use chrono::{DateTime, Local};
use std::fmt::Write;

pub const NO_SONGS_MESSAGE: &str = "No songs found for this mood. Please try again.";

/// Shown when a song's cover image is missing or fails to load
pub const PLACEHOLDER_COVER: &str = "data:image/svg+xml,%3Csvg xmlns=%27http://www.w3.org/2000/svg%27 width=%27200%27 height=%27200%27%3E%3Crect width=%27200%27 height=%27200%27 fill=%27%23ddd%27/%3E%3Ctext x=%27100%27 y=%27100%27 text-anchor=%27middle%27 fill=%27%23666%27%3E%F0%9F%8E%B5%3C/text%3E%3C/svg%3E";

/// Inline handler that swaps a broken cover for the placeholder
fn cover_fallback() -> String {
    format!("this.onerror=null;this.src='{PLACEHOLDER_COVER}'")
}

/// One recommended song, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct SongCard {
    pub title: String,
    pub artist: String,
    pub mood: String,
    pub cover_url: String,
    pub link: String,
}

impl From<&Song> for SongCard {
    fn from(song: &Song) -> Self {
        let cover_url = if song.cover_url.trim().is_empty() {
            PLACEHOLDER_COVER.to_string()
        } else {
            song.cover_url.clone()
        };

        SongCard {
            title: song.title.clone(),
            artist: song.artist.clone(),
            mood: song.mood.clone(),
            cover_url,
            link: song.youtube_link.clone(),
        }
    }
}

/// Everything the results page shows after a module finishes
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub mood: MoodLabel,
    pub module_type: ModuleType,
    pub confidence: Option<u8>,
    pub performance: Option<PerformancePayload>,
    pub songs: Vec<SongCard>,
    pub generated_at: DateTime<Local>,
}

impl RecommendationView {
    /// The server's `dominant_mood` wins over the mood that was sent when it parses
    pub fn new(
        mood: MoodLabel,
        module_type: ModuleType,
        response: &RecommendationResponse,
        generated_at: DateTime<Local>,
    ) -> Self {
        let mood = response
            .dominant_mood
            .as_deref()
            .and_then(|label| label.parse().ok())
            .unwrap_or(mood);

        RecommendationView {
            mood,
            module_type,
            confidence: None,
            performance: None,
            songs: response.songs.iter().map(SongCard::from).collect(),
            generated_at,
        }
    }

    pub fn with_confidence(mut self, confidence: Option<u8>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_performance(mut self, performance: Option<PerformancePayload>) -> Self {
        self.performance = performance;
        self
    }

    /// Line explaining where the mood came from
    pub fn basis(&self) -> &'static str {
        match self.module_type {
            ModuleType::Quiz => "Based on your quiz answers",
            ModuleType::Images => "Based on your 4 rounds of selections",
            ModuleType::Puzzle => "Based on your puzzle performance",
            ModuleType::Combined => "Based on all three activities",
        }
    }
}

fn esc(text: &str) -> String {
    escape(text, Html).to_string()
}

/// Results page markup; every song field is escaped
pub fn render_html(view: &RecommendationView) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"mood-summary\">\n");
    let _ = writeln!(
        html,
        "  <h3>Detected Mood: <span class=\"{}\">{}</span></h3>",
        view.mood.css_class(),
        view.mood
    );
    if let Some(confidence) = view.confidence {
        let _ = writeln!(html, "  <p>Confidence: {confidence}%</p>");
    }
    let _ = writeln!(html, "  <p>{}</p>", view.basis());
    if let Some(perf) = &view.performance {
        let _ = writeln!(
            html,
            "  <div class=\"performance-stats\"><span>Time: {}s</span><span>Mistakes: {}</span><span>Avg per tile: {:.1}s</span></div>",
            perf.time, perf.mistakes, perf.avg_time_per_tile
        );
    }
    let _ = writeln!(
        html,
        "  <p class=\"generated-at\">{}</p>",
        view.generated_at.format("%Y-%m-%d %H:%M")
    );
    html.push_str("</div>\n");

    if view.songs.is_empty() {
        let _ = writeln!(html, "<p class=\"no-songs\">{NO_SONGS_MESSAGE}</p>");
        return html;
    }

    html.push_str("<div class=\"songs-grid\">\n");
    for song in &view.songs {
        let _ = write!(
            html,
            concat!(
                "  <div class=\"song-card\">\n",
                "    <div class=\"song-cover\"><img src=\"{cover}\" alt=\"{title}\" onerror=\"{fallback}\"></div>\n",
                "    <div class=\"song-info\"><h4>{title}</h4><p>{artist}</p><span class=\"mood-tag\">{mood}</span></div>\n",
                "    <div class=\"song-actions\"><a href=\"{link}\" target=\"_blank\" class=\"play-btn\">Play</a></div>\n",
                "  </div>\n",
            ),
            cover = esc(&song.cover_url),
            fallback = esc(&cover_fallback()),
            title = esc(&song.title),
            artist = esc(&song.artist),
            mood = esc(&song.mood),
            link = esc(&song.link),
        );
    }
    html.push_str("</div>\n");
    html
}

/// Plain terminal rendering of the same view
pub fn render_text(view: &RecommendationView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Detected Mood: {}", view.mood);
    if let Some(confidence) = view.confidence {
        let _ = writeln!(out, "Confidence: {confidence}%");
    }
    let _ = writeln!(out, "{}", view.basis());
    if let Some(perf) = &view.performance {
        let _ = writeln!(
            out,
            "Time: {}s | Mistakes: {} | Avg per tile: {:.1}s",
            perf.time, perf.mistakes, perf.avg_time_per_tile
        );
    }
    out.push('\n');

    if view.songs.is_empty() {
        let _ = writeln!(out, "{NO_SONGS_MESSAGE}");
        return out;
    }

    for (i, song) in view.songs.iter().enumerate() {
        let _ = writeln!(out, "{}. {} by {} [{}]", i + 1, song.title, song.artist, song.mood);
        if !song.link.is_empty() {
            let _ = writeln!(out, "   {}", song.link);
        }
    }
    out
}
