//! Edit distance between code identifiers and subject phrases

/// Subjects longer than this only consider dropping a prefix and a suffix
const MAX_SUBSET_WORDS: usize = 16;

/// Case-insensitive Levenshtein distance
pub fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.to_lowercase().chars().collect();
    let right: Vec<char> = right.to_lowercase().chars().collect();
    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut previous: Vec<usize> = (0..=left.len()).collect();
    let mut current = vec![0; left.len() + 1];
    for (j, r) in right.iter().enumerate() {
        current[0] = j + 1;
        for (i, l) in left.iter().enumerate() {
            let substitution = previous[i] + usize::from(l != r);
            current[i + 1] = substitution.min(previous[i + 1] + 1).min(current[i] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[left.len()]
}

/// Distance between `identifier` and `subject` when whole words of the subject
/// may be dropped, each at `word_removal_cost`
///
/// At least one subject word is always kept.
pub fn edit_distance(identifier: &str, subject: &str, word_removal_cost: usize) -> usize {
    let words: Vec<&str> = subject.split(' ').collect();
    let n = words.len();

    if n > MAX_SUBSET_WORDS {
        return (0..n)
            .flat_map(|start| (start + 1..=n).map(move |end| (start, end)))
            .map(|(start, end)| {
                levenshtein(identifier, &words[start..end].join(" "))
                    + word_removal_cost * (n - (end - start))
            })
            .min()
            .unwrap_or_else(|| levenshtein(identifier, subject));
    }

    let full: u32 = (1u32 << n) - 1;
    (1..=full)
        .map(|kept| {
            let phrase = words
                .iter()
                .enumerate()
                .filter(|(i, _)| kept & (1 << i) != 0)
                .map(|(_, w)| *w)
                .collect::<Vec<_>>()
                .join(" ");
            let removed = n - kept.count_ones() as usize;
            levenshtein(identifier, &phrase) + word_removal_cost * removed
        })
        .min()
        .unwrap_or_else(|| levenshtein(identifier, subject))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_ignores_case() {
        assert_eq!(levenshtein("myMap", "MYMAP"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_free_word_removal() {
        assert_eq!(edit_distance("x", "xyz", 0), 2);
        assert_eq!(edit_distance("x", "specified x", 0), 0);
        assert_eq!(edit_distance("x", "specified xy", 0), 1);
        assert_eq!(edit_distance("specified", "specified xy", 0), 0);
        assert_eq!(edit_distance("map", "the specified myMap", 0), 2);
    }

    #[test]
    fn test_unit_word_removal() {
        assert_eq!(edit_distance("x", "x", 1), 0);
        assert_eq!(edit_distance("x", "xyz", 1), 2);
        assert_eq!(edit_distance("x", "specified x", 1), 1);
        assert_eq!(edit_distance("x", "specified xy", 1), 2);
        assert_eq!(edit_distance("specified", "specified xy", 1), 1);
        assert_eq!(edit_distance("x", "the specified xy", 1), 3);
    }

    #[test]
    fn test_expensive_word_removal() {
        assert_eq!(edit_distance("x", "xyz", 2), 2);
        assert_eq!(edit_distance("x", "specified x", 2), 2);
        assert_eq!(edit_distance("x", "specified xy", 2), 3);
        assert_eq!(edit_distance("map", "the specified myMap", 2), 6);
    }

    #[test]
    fn test_long_subjects_use_contiguous_runs() {
        let subject = vec!["word"; 20].join(" ") + " target";
        assert_eq!(edit_distance("target", &subject, 0), 0);
        assert_eq!(edit_distance("target", &subject, 1), 20);
    }
}
