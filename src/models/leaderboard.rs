use serde::Serialize;
use std::collections::HashMap;

/// A single contributor and how many contributions were counted for them
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub login: String,
    pub count: usize,
}

/// Login -> count mapping ordered by descending count.
///
/// Ties keep the order in which the logins were first seen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Count occurrences of each login and order the result
    pub fn from_logins<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<LeaderboardEntry> = Vec::new();

        for login in logins {
            let login = login.as_ref();
            match positions.get(login) {
                Some(&index) => entries[index].count += 1,
                None => {
                    positions.insert(login.to_string(), entries.len());
                    entries.push(LeaderboardEntry {
                        login: login.to_string(),
                        count: 1,
                    });
                }
            }
        }

        // sort_by is stable, so equal counts stay in first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total_contributions(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count_for(&self, login: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.login == login)
            .map(|e| e.count)
    }

    /// Keep only contributors with at least `min_count` contributions
    pub fn with_min_count(&self, min_count: usize) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.count >= min_count)
                .cloned()
                .collect(),
        }
    }
}
