use std::mem;

/// Amount of replace, delete, or insert operations to morph one word into the other.
///
/// Returns the distance and the longer word's length.
pub fn levenshtein_distance<'w>(mut word_a: &'w str, mut word_b: &'w str) -> (usize, usize) {
    let m = word_a.chars().count();
    let mut n = word_b.chars().count();

    if m > n {
        mem::swap(&mut word_a, &mut word_b);
        n = m;
    }

    let mut costs: Vec<usize> = (0..=n).collect();

    for (a, i) in word_a.chars().zip(1..) {
        let mut last_val = i;

        for (b, j) in word_b.chars().zip(1..) {
            let new_val = if a == b {
                costs[j - 1]
            } else {
                costs[j - 1].min(last_val).min(costs[j]) + 1
            };

            costs[j - 1] = last_val;
            last_val = new_val;
        }

        costs[n] = last_val;
    }

    (costs[n], n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        assert_eq!(levenshtein_distance("sniff", "sniff"), (0, 5));
        assert_eq!(levenshtein_distance("snif", "sniff"), (1, 5));
        assert_eq!(levenshtein_distance("kitten", "sitting"), (3, 7));
        assert_eq!(levenshtein_distance("", "wtp"), (3, 3));
    }
}
