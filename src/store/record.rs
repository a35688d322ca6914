/// Per-deck win/loss counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckRecord {
    /// Deck name exactly as recognized; case- and whitespace-sensitive
    pub name: String,
    pub wins: u64,
    pub losses: u64,
}

impl DeckRecord {
    /// Zero-initialized record for a freshly seen deck
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
        }
    }

    pub fn with_counts(name: impl Into<String>, wins: u64, losses: u64) -> Self {
        Self {
            name: name.into(),
            wins,
            losses,
        }
    }

    pub fn total(&self) -> u64 {
        self.wins.saturating_add(self.losses)
    }

    /// Only records with at least one resolved match are persisted or listed
    pub fn has_activity(&self) -> bool {
        self.wins > 0 || self.losses > 0
    }

    /// Integer win percentage, `None` when no games were played
    pub fn win_rate(&self) -> Option<u64> {
        let total = u128::from(self.wins) + u128::from(self.losses);
        if total == 0 {
            return None;
        }
        // At most 100, so the narrowing is lossless
        Some((u128::from(self.wins) * 100 / total) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_inactive() {
        let record = DeckRecord::new("Dragon Deck");
        assert_eq!(record.total(), 0);
        assert!(!record.has_activity());
        assert_eq!(record.win_rate(), None);
    }

    #[test]
    fn test_win_rate_truncates() {
        assert_eq!(DeckRecord::with_counts("a", 2, 1).win_rate(), Some(66));
        assert_eq!(DeckRecord::with_counts("b", 1, 0).win_rate(), Some(100));
        assert_eq!(DeckRecord::with_counts("c", 0, 4).win_rate(), Some(0));
        assert_eq!(DeckRecord::with_counts("d", 1, 2).win_rate(), Some(33));
    }

    #[test]
    fn test_huge_counters_do_not_overflow() {
        let big = DeckRecord::with_counts("Big", 200_000_000_000_000_000, 0);
        assert_eq!(big.win_rate(), Some(100));

        let near_max = DeckRecord::with_counts("Max", u64::MAX - 1, u64::MAX - 1);
        assert_eq!(near_max.total(), u64::MAX);
        assert_eq!(near_max.win_rate(), Some(50));
    }

    #[test]
    fn test_activity() {
        assert!(DeckRecord::with_counts("a", 0, 1).has_activity());
        assert!(DeckRecord::with_counts("a", 1, 0).has_activity());
    }
}
