//! Risk classification of action labels into badge categories

use super::format::confidence_pct;
use super::types::Action;

/// Three-level risk category plus an uncoloured neutral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    Bad,
    Warn,
    Safe,
    #[default]
    Neutral,
}

impl Category {
    /// Badge label shown for this category
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bad => "BLOCK",
            Category::Warn => "CAUTION",
            Category::Safe => "SAFE",
            Category::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Bad => "bad",
            Category::Warn => "warn",
            Category::Safe => "safe",
            Category::Neutral => "neutral",
        };
        write!(f, "{}", name)
    }
}

impl From<&Action> for Category {
    fn from(action: &Action) -> Self {
        match action {
            Action::Block => Category::Bad,
            Action::Sell | Action::Short => Category::Warn,
            Action::Buy | Action::Long => Category::Safe,
            Action::Hold | Action::Other(_) => Category::Neutral,
        }
    }
}

/// Classify a raw action label. Total over every input, case-insensitive.
pub fn classify(label: &str) -> Category {
    Category::from(&Action::parse(label))
}

/// Classify an optional action; a missing action is neutral.
pub fn classify_action(action: Option<&Action>) -> Category {
    action.map(Category::from).unwrap_or_default()
}

/// Badge for a market signal, eg/ `SAFE: BUY`
pub fn market_badge(action: Option<&Action>) -> (String, Category) {
    let category = classify_action(action);
    let action = action.map(Action::as_str).unwrap_or("HOLD");
    (format!("{}: {}", category.label(), action), category)
}

/// Badge for a token verdict, eg/ `CAUTION: SELL (60%)`
pub fn token_badge(action: Option<&Action>, confidence: Option<f64>) -> (String, Category) {
    let category = classify_action(action);
    let action = action.map(Action::as_str).unwrap_or("-");
    let pct = confidence_pct(confidence.unwrap_or(0.0));
    (format!("{}: {} ({}%)", category.label(), action, pct), category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_labels() {
        struct TestCase {
            input: &'static str,
            expected: Category,
        }

        let tests = vec![
            TestCase { input: "BLOCK", expected: Category::Bad },
            TestCase { input: "block", expected: Category::Bad },
            TestCase { input: "SELL", expected: Category::Warn },
            TestCase { input: "Short", expected: Category::Warn },
            TestCase { input: "BUY", expected: Category::Safe },
            TestCase { input: "long", expected: Category::Safe },
            TestCase { input: "HOLD", expected: Category::Neutral },
            TestCase { input: "", expected: Category::Neutral },
            TestCase { input: "BUY ", expected: Category::Neutral },
            TestCase { input: "moon", expected: Category::Neutral },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = classify(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Bad.label(), "BLOCK");
        assert_eq!(Category::Warn.label(), "CAUTION");
        assert_eq!(Category::Safe.label(), "SAFE");
        assert_eq!(Category::Neutral.label(), "NEUTRAL");
        assert_eq!(Category::Safe.to_string(), "safe");
    }

    #[test]
    fn test_market_badge() {
        assert_eq!(
            market_badge(Some(&Action::Buy)),
            ("SAFE: BUY".to_string(), Category::Safe)
        );
        assert_eq!(
            market_badge(None),
            ("NEUTRAL: HOLD".to_string(), Category::Neutral)
        );
    }

    #[test]
    fn test_token_badge_confidence_is_informational() {
        let (low, low_category) = token_badge(Some(&Action::Sell), Some(0.1));
        let (high, high_category) = token_badge(Some(&Action::Sell), Some(0.9));
        assert_eq!(low, "CAUTION: SELL (10%)");
        assert_eq!(high, "CAUTION: SELL (90%)");
        assert_eq!(low_category, high_category);

        let (text, _) = token_badge(Some(&Action::Block), None);
        assert_eq!(text, "BLOCK: BLOCK (0%)");
    }
}
