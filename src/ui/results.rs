use crate::client::{SwaraClient, Transport};
use crate::error::ClientError;
use crate::models::RecommendationRequest;
use crate::ui::control::{ActionControl, Banner};
use crate::ui::render::RecommendationView;
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The "Get Recommendations" button and the banner under it
pub struct ResultsPage<'a, T: Transport> {
    client: &'a SwaraClient<T>,
    pub button: ActionControl,
    pub banner: Option<Banner>,
}

impl<'a, T: Transport> ResultsPage<'a, T> {
    pub fn new(client: &'a SwaraClient<T>) -> Self {
        Self {
            client,
            button: ActionControl::new("Get Recommendations", "Loading..."),
            banner: None,
        }
    }

    /// One attempt, no retry; failures leave an error banner behind
    pub fn fetch(&mut self, request: &RecommendationRequest) -> Option<RecommendationView> {
        let result = {
            let Some(busy) = self.button.begin() else {
                warn!("Recommendation request already in flight");
                return None;
            };
            debug!(button = busy.text(), mood = %request.mood, "Requesting recommendations");
            self.client.get_recommendations(request)
        };

        match result {
            Ok(response) => {
                info!(
                    mood = %request.mood,
                    songs = response.songs.len(),
                    "Received recommendations"
                );
                self.banner = None;
                Some(
                    RecommendationView::new(request.mood, request.module_type, &response, Local::now())
                        .with_confidence(request.confidence)
                        .with_performance(request.performance.clone()),
                )
            }
            Err(e) => {
                self.show_error(&e);
                None
            }
        }
    }

    /// Banner still up at `now`; an expired one is dismissed
    pub fn current_banner(&mut self, now: Instant) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(|banner| banner.is_expired(now)) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    fn show_error(&mut self, err: &ClientError) {
        warn!("Recommendation request failed: {err}");
        self.banner = Some(Banner::error(err.user_message()));
    }
}
