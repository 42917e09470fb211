//! Recovery key display layout.

/// Characters per displayed line
const LINE_LENGTH: usize = 16;

/// Characters per space-separated group
const GROUP_LENGTH: usize = 4;

/// Lay out a recovery key for reading aloud or writing down.
///
/// Spaces are stripped, the rest is cut into lines of 16 characters and each
/// line into groups of 4.
///
/// ```text
/// abcd1234abcd1234abcd1234abcd1234
///   → "abcd 1234 abcd 1234\nabcd 1234 abcd 1234"
/// ```
pub fn format_recovery_key(key: &str) -> String {
    let compact: Vec<char> = key.chars().filter(|c| *c != ' ').collect();

    compact
        .chunks(LINE_LENGTH)
        .map(|line| {
            line.chunks(GROUP_LENGTH)
                .map(|group| group.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
