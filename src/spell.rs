use std::ops::Deref;

const SUGGESTIONS: usize = 3;

/// Levenshtein distance with a reusable row buffer.
pub struct Spell(Vec<usize>);

impl Spell {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the closest `dictionary` entries to `word`, nearest first.
    pub fn suggest<T: Deref<Target = str>>(
        &mut self,
        word: &str,
        dictionary: impl IntoIterator<Item = T>,
    ) -> Vec<T> {
        let maximum = (word.chars().count() / 3).max(1);
        let mut results = Vec::new();
        for candidate in dictionary {
            let distance = self.distance(word, &candidate);
            if distance <= maximum {
                results.push((distance, candidate));
            }
        }
        results.sort_by(|left, right| {
            left.0
                .cmp(&right.0)
                .then_with(|| left.1.deref().cmp(right.1.deref()))
        });
        results
            .into_iter()
            .take(SUGGESTIONS)
            .map(|(_, candidate)| candidate)
            .collect()
    }

    fn distance(&mut self, left: &str, right: &str) -> usize {
        let right: Vec<char> = right.chars().map(|letter| letter.to_ascii_lowercase()).collect();
        let row = &mut self.0;
        row.clear();
        row.extend(0..=right.len());
        for (i, letter) in left.chars().map(|letter| letter.to_ascii_lowercase()).enumerate() {
            let mut diagonal = row[0];
            row[0] = i + 1;
            for j in 1..=right.len() {
                let above = row[j];
                let cost = usize::from(letter != right[j - 1]);
                row[j] = (above + 1).min(row[j - 1] + 1).min(diagonal + cost);
                diagonal = above;
            }
        }
        row[right.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let mut spell = Spell::new();
        assert_eq!(spell.distance("--rev", "--rev"), 0);
        assert_eq!(spell.distance("--rev", "--REV"), 0);
        assert_eq!(spell.distance("--rev", "--reb"), 1);
        assert_eq!(spell.distance("--rev", "--revs"), 1);
        assert_eq!(spell.distance("--rev", "--re"), 1);
        assert_eq!(spell.distance("", "--rev"), 5);
        assert_eq!(spell.distance("kitten", "sitting"), 3);
    }

    #[test]
    fn suggests_closest_first() {
        let suggestions = Spell::new().suggest(
            "--confg",
            ["--config", "--rev", "--conf", "--configs", "--verbose"],
        );
        assert_eq!(suggestions, ["--conf", "--config", "--configs"]);
    }

    #[test]
    fn suggests_nothing_when_too_far() {
        let suggestions = Spell::new().suggest("--x", ["--config", "--verbose"]);
        assert!(suggestions.is_empty());
    }
}
