//! String helpers used for prompt defaults, validation and derived fields

/// Anything with a length that prompt validation can measure.
pub trait Measure {
    fn measure(&self) -> usize;
}

impl Measure for str {
    fn measure(&self) -> usize {
        self.chars().count()
    }
}

impl Measure for String {
    fn measure(&self) -> usize {
        self.as_str().measure()
    }
}

impl<T> Measure for [T] {
    fn measure(&self) -> usize {
        self.len()
    }
}

impl<T> Measure for Vec<T> {
    fn measure(&self) -> usize {
        self.len()
    }
}

/// Turn a string into a nice title.
///
/// Splits on runs of non-word characters and underscores, upper-cases the first
/// character of each segment and joins the segments with single spaces.
///
/// `to_title("some-slug_string")` gives `"Some Slug String"`.
pub fn to_title(input: &str) -> String {
    input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Turn a string into a slug.
///
/// `to_slug("Nice Title!")` gives `"nice-title"`. The output only ever contains
/// lowercase ASCII letters and single inner hyphens, so applying it twice is a no-op.
pub fn to_slug(input: &str) -> String {
    let ascii: String = input
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    // Whitespace and hyphen runs both separate words. Digits are dropped last,
    // which can leave empty words behind ("a 1 b").
    ascii
        .split(|c: char| c == ' ' || c == '-')
        .map(|word| word.chars().filter(char::is_ascii_lowercase).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' | 'À'..='Å' => 'a',
        'è'..='ë' | 'È'..='Ë' => 'e',
        'ì'..='ï' | 'Ì'..='Ï' => 'i',
        'ò'..='ö' | 'Ò'..='Ö' => 'o',
        'ù'..='ü' | 'Ù'..='Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// Is a string a valid slug?
///
/// One lowercase letter, then any lowercase letters, digits or hyphens, never
/// ending in a hyphen.
pub fn is_slug(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !input.ends_with('-')
}

/// Is the length of a string or sequence at least `min_length`?
pub fn is_long_as<T: Measure + ?Sized>(min_length: usize, value: &T) -> bool {
    value.measure() >= min_length
}

/// SSH clone URL of a GitHub repository. Owner and name are used verbatim.
pub fn to_repository_url(owner: &str, name: &str) -> String {
    format!("git@github.com:{}/{}.git", owner, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_title_splits_on_separators() {
        assert_eq!(to_title("some-slug_string"), "Some Slug String");
        assert_eq!(to_title("hello   world!!"), "Hello World");
    }

    #[test]
    fn test_to_title_drops_empty_segments() {
        assert_eq!(to_title("--leading and trailing--"), "Leading And Trailing");
        assert_eq!(to_title(""), "");
    }

    #[test]
    fn test_to_title_leaves_digits_alone() {
        assert_eq!(to_title("3d-models"), "3d Models");
    }

    #[test]
    fn test_to_slug_basic() {
        assert_eq!(to_slug("Nice Title!"), "nice-title");
        assert_eq!(to_slug("  Test title  "), "test-title");
        assert_eq!(to_slug("nice-title"), "nice-title");
        assert_eq!(to_slug("my-site"), "my-site");
    }

    #[test]
    fn test_to_slug_folds_accents() {
        assert_eq!(to_slug("Crème Brûlée"), "creme-brulee");
        assert_eq!(to_slug("Año Niño"), "ano-nino");
    }

    #[test]
    fn test_to_slug_collapses_whitespace_and_hyphens() {
        assert_eq!(to_slug("a   b"), "a-b");
        assert_eq!(to_slug("a -- b"), "a-b");
        assert_eq!(to_slug("release 2 notes"), "release-notes");
    }

    #[test]
    fn test_to_slug_is_idempotent() {
        for input in [
            "Nice Title!",
            "Crème Brûlée 2000",
            "  --weird__input--  ",
            "abc123",
            "Ünïcödé Täg",
            "",
        ] {
            let once = to_slug(input);
            assert_eq!(to_slug(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_to_slug_output_is_slug_for_alphanumeric_input() {
        for input in ["abc", "Abc123", "9lives", "X", "project2go"] {
            let slug = to_slug(input);
            assert!(is_slug(&slug), "{:?} -> {:?}", input, slug);
        }
    }

    #[test]
    fn test_title_of_slug_is_capitalized() {
        assert_eq!(to_title(&to_slug("Nice Title!")), "Nice Title");
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("a"));
        assert!(is_slug("my-project-2"));
        assert!(!is_slug(""));
        assert!(!is_slug("no way Jose"));
        assert!(!is_slug("trailing-"));
        assert!(!is_slug("2fast"));
        assert!(!is_slug("Upper"));
        assert!(!is_slug("-lead"));
    }

    #[test]
    fn test_is_long_as_text_and_sequences() {
        assert!(!is_long_as(2, "a"));
        assert!(is_long_as(2, "ab"));
        assert!(is_long_as(0, ""));
        assert!(is_long_as(3, &vec![1, 2, 3]));
        assert!(!is_long_as(4, &[1, 2, 3][..]));
        assert!(is_long_as(5, "abcde"));
    }

    #[test]
    fn test_to_repository_url() {
        assert_eq!(
            to_repository_url("cloudfour", "test-title"),
            "git@github.com:cloudfour/test-title.git"
        );
        // No validation here
        assert_eq!(to_repository_url("", "x y"), "git@github.com:/x y.git");
    }
}
