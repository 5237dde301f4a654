use crate::models::MoodLabel;
use serde::Serialize;

/// Ordered answers of one flow run, keyed by question id or round number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    entries: Vec<(String, Option<MoodLabel>)>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer; re-answering a key replaces it in place
    pub fn set(&mut self, key: impl Into<String>, label: Option<MoodLabel>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    pub fn get(&self, key: &str) -> Option<MoodLabel> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, label)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<MoodLabel>)> {
        self.entries.iter().map(|(k, label)| (k.as_str(), *label))
    }

    pub fn aggregate(&self) -> AggregationResult {
        MoodAggregator::aggregate(self.entries.iter().map(|(_, label)| *label))
    }
}

/// Dominant mood of a set of answers and how many of them agree with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub dominant_mood: MoodLabel,
    pub confidence_percent: u8,
}

/// Reduces mood labels to a single dominant mood
pub struct MoodAggregator;

impl MoodAggregator {
    /// Tally labels in input order and pick the most frequent one.
    ///
    /// Ties go to the label whose first occurrence comes earliest. Unlabelled
    /// entries are skipped; with nothing left the result is `Neutral` at 0%.
    pub fn aggregate<I>(labels: I) -> AggregationResult
    where
        I: IntoIterator<Item = Option<MoodLabel>>,
    {
        // (label, count) in order of first appearance
        let mut tally: Vec<(MoodLabel, u32)> = Vec::new();
        let mut total = 0u32;

        for label in labels.into_iter().flatten() {
            total += 1;
            match tally.iter_mut().find(|(seen, _)| *seen == label) {
                Some(entry) => entry.1 += 1,
                None => tally.push((label, 1)),
            }
        }

        if total == 0 {
            return AggregationResult {
                dominant_mood: MoodLabel::Neutral,
                confidence_percent: 0,
            };
        }

        let mut dominant = tally[0];
        for &(label, count) in &tally[1..] {
            if count > dominant.1 {
                dominant = (label, count);
            }
        }

        AggregationResult {
            dominant_mood: dominant.0,
            confidence_percent: Self::confidence_percent(dominant.1, total),
        }
    }

    /// `round(100 * count / total)` with halves rounded up
    pub fn confidence_percent(count: u32, total: u32) -> u8 {
        if total == 0 {
            return 0;
        }
        let percent = (200 * count + total) / (2 * total);
        percent.min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MoodLabel::*;

    fn answers(labels: &[MoodLabel]) -> AnswerSet {
        let mut set = AnswerSet::new();
        for (i, label) in labels.iter().enumerate() {
            set.set(format!("question{}", i + 1), Some(*label));
        }
        set
    }

    #[test]
    fn test_strict_majority_wins() {
        let result = answers(&[Happy, Sad, Happy, Calm, Happy]).aggregate();

        assert_eq!(result.dominant_mood, Happy);
        assert_eq!(result.confidence_percent, 60);
    }

    #[test]
    fn test_strict_majority_is_order_independent() {
        let orders = [
            [Sad, Angry, Sad, Calm, Sad],
            [Angry, Calm, Sad, Sad, Sad],
            [Sad, Sad, Sad, Angry, Calm],
        ];
        for order in orders {
            assert_eq!(answers(&order).aggregate().dominant_mood, Sad);
        }
    }

    #[test]
    fn test_tie_goes_to_first_occurrence() {
        assert_eq!(answers(&[Calm, Angry, Angry, Calm]).aggregate().dominant_mood, Calm);
        assert_eq!(answers(&[Angry, Calm, Calm, Angry]).aggregate().dominant_mood, Angry);
    }

    #[test]
    fn test_confidence_rounds_to_nearest() {
        // 1 of 3 is 33.3%, 2 of 3 is 66.7%
        assert_eq!(answers(&[Happy, Sad, Calm]).aggregate().confidence_percent, 33);
        assert_eq!(answers(&[Happy, Happy, Calm]).aggregate().confidence_percent, 67);
        // 1 of 8 is exactly 12.5%
        assert_eq!(MoodAggregator::confidence_percent(1, 8), 13);
        assert_eq!(MoodAggregator::confidence_percent(4, 4), 100);
    }

    #[test]
    fn test_confidence_matches_share_for_every_total() {
        for total in 1..=20u32 {
            for count in 1..=total {
                let expected = (100.0 * count as f64 / total as f64).round() as u8;
                assert_eq!(MoodAggregator::confidence_percent(count, total), expected);
            }
        }
    }

    #[test]
    fn test_unanswered_entries_are_ignored() {
        let mut set = answers(&[Sad, Sad]);
        set.set("question3", None);
        set.set("question4", Some(Happy));

        let result = set.aggregate();
        assert_eq!(result.dominant_mood, Sad);
        assert_eq!(result.confidence_percent, 67);
        assert_eq!(set.iter().filter(|(_, label)| label.is_some()).count(), 3);
    }

    #[test]
    fn test_empty_set_is_neutral_with_zero_confidence() {
        let result = AnswerSet::new().aggregate();

        assert_eq!(result.dominant_mood, Neutral);
        assert_eq!(result.confidence_percent, 0);

        let only_blanks = MoodAggregator::aggregate([None, None]);
        assert_eq!(only_blanks.confidence_percent, 0);
    }

    #[test]
    fn test_reanswer_replaces_in_place() {
        let mut set = answers(&[Happy, Sad]);
        set.set("question1", Some(Angry));

        assert_eq!(set.get("question1"), Some(Angry));
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["question1", "question2"]);
    }
}
