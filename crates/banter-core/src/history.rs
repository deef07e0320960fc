//! History bounding for remote completion calls.

use banter_llm::{Role, Turn};

/// Default number of user/assistant pairs kept in the window.
pub const DEFAULT_MAX_PAIRS: usize = 12;

/// Bound a history to the leading system turn (if any) plus the last
/// `max_pairs * 2` turns of the remainder.
///
/// The system turn is never evicted and does not count against the
/// window. Relative order is preserved and the input is not mutated;
/// applying `shape` to an already-bounded history returns it unchanged.
pub fn shape(history: &[Turn], max_pairs: usize) -> Vec<Turn> {
    let Some(first) = history.first() else {
        return Vec::new();
    };
    let (pinned, rest) = if first.role == Role::System {
        (&history[..1], &history[1..])
    } else {
        (&history[..0], history)
    };
    let window = max_pairs.saturating_mul(2);
    let start = rest.len().saturating_sub(window);
    pinned.iter().chain(rest[start..].iter()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_PAIRS, shape};
    use banter_llm::Turn;
    use pretty_assertions::assert_eq;

    fn exchanges(count: usize) -> Vec<Turn> {
        (0..count)
            .flat_map(|i| {
                [
                    Turn::user(format!("question {i}")),
                    Turn::assistant(format!("answer {i}")),
                ]
            })
            .collect()
    }

    #[test]
    fn empty_history_stays_empty() {
        assert_eq!(shape(&[], DEFAULT_MAX_PAIRS), Vec::<Turn>::new());
    }

    #[test]
    fn short_histories_pass_through() {
        let mut history = vec![Turn::system("rules")];
        history.extend(exchanges(3));
        assert_eq!(shape(&history, DEFAULT_MAX_PAIRS), history);
    }

    #[test]
    fn system_turn_survives_and_oldest_turns_drop() {
        let mut history = vec![Turn::system("rules")];
        history.extend(exchanges(15)); // system + 30 turns

        let shaped = shape(&history, DEFAULT_MAX_PAIRS);
        assert_eq!(shaped.len(), 25);
        assert_eq!(shaped[0], Turn::system("rules"));
        // The earliest 6 turns (3 exchanges) are gone.
        assert_eq!(shaped[1], Turn::user("question 3"));
        assert_eq!(shaped[24], Turn::assistant("answer 14"));
    }

    #[test]
    fn histories_without_a_system_turn_are_trimmed_whole() {
        let history = exchanges(15);
        let shaped = shape(&history, 12);
        assert_eq!(shaped.len(), 24);
        assert_eq!(shaped[0], Turn::user("question 3"));
    }

    #[test]
    fn shaping_is_idempotent() {
        let mut history = vec![Turn::system("rules")];
        history.extend(exchanges(20));

        let once = shape(&history, 12);
        let twice = shape(&once, 12);
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_pairs_keeps_only_the_system_turn() {
        let mut history = vec![Turn::system("rules")];
        history.extend(exchanges(2));
        assert_eq!(shape(&history, 0), vec![Turn::system("rules")]);
    }
}
