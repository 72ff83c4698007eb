use rand::seq::SliceRandom;

const HIDDEN: char = '▢';

/// Progressively reveals a name, one call to [`NameHints::next`] at a time.
pub struct NameHints {
    level: u8,
    mask: Box<[bool]>,
    indices: Vec<usize>,
}

impl NameHints {
    pub fn new(name: &str) -> Self {
        // Indices of chars that still need to be revealed
        let mut indices: Vec<_> = name
            .chars()
            .enumerate()
            .skip(1) // first char revealed immediatly
            .filter(|(_, c)| !is_separator(*c))
            .map(|(i, _)| i)
            .collect();

        indices.shuffle(&mut rand::thread_rng());

        let mask: Box<[bool]> = name
            .chars()
            .enumerate()
            .map(|(i, c)| i == 0 || is_separator(c))
            .collect();

        Self {
            level: 0,
            mask,
            indices,
        }
    }

    pub fn next(&mut self, name: &str) -> String {
        self.level = self.level.saturating_add(1);

        if self.level == 1 {
            let letters = name.chars().filter(|c| !is_separator(*c)).count();

            return match name.chars().next() {
                Some(first) => format!(
                    "Let me give you a hint: The name has {letters} letters \
                    and starts with `{}`",
                    first.to_uppercase()
                ),
                None => "Even Jeff doesn't know this one".to_owned(),
            };
        }

        // Reveal about a quarter of the name per hint
        let amount = (self.mask.len() / 4).max(1);
        let mut revealed = false;

        for _ in 0..amount {
            let Some(i) = self.indices.pop() else { break };
            self.mask[i] = true;
            revealed = true;
        }

        if revealed && !self.indices.is_empty() {
            let hint: String = self
                .mask
                .iter()
                .zip(name.chars())
                .map(|(mask, c)| if *mask { c } else { HIDDEN })
                .collect();

            format!("Slowly revealing the name: `{hint}`")
        } else {
            format!("Bruh the name is literally `{name}` xd")
        }
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '\'')
}
