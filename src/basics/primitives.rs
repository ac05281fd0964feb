// Pattern: Primitive Types
// Numbers, strings as UTF-8 bytes, and booleans.

// ============================================================================
// Strings
// ============================================================================

/// What indexing a string looks like: byte length, first byte, first char.
#[derive(Debug, Clone, PartialEq)]
pub struct StringFacts {
    pub text: String,
    pub len: usize,
    pub first_byte: Option<u8>,
    pub first_char: Option<char>,
}

pub fn string_facts(s: &str) -> StringFacts {
    StringFacts {
        text: s.to_string(),
        len: s.len(), // bytes, not chars
        first_byte: s.as_bytes().first().copied(),
        first_char: s.chars().next(),
    }
}

/// The character one past the first byte of `s`.
///
/// Returns `None` for an empty string or when the byte is already `0xFF`.
pub fn next_letter(s: &str) -> Option<char> {
    let first = *s.as_bytes().first()?;
    first.checked_add(1).map(char::from)
}

/// Splits into one-character strings, by Unicode scalar value.
pub fn split_chars(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}

// ============================================================================
// Booleans
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolTable {
    pub not_x: bool,
    pub or: bool,
    pub and: bool,
    pub nand: bool,
    pub nor_as_int: i32,
}

pub fn bool_table(x: bool, y: bool) -> BoolTable {
    BoolTable {
        not_x: !x,
        or: x || y,
        and: x && y,
        nand: !(x && y),
        nor_as_int: bool_to_int(!(x || y)),
    }
}

pub fn bool_to_int(b: bool) -> i32 {
    i32::from(b)
}

pub fn multiline() -> &'static str {
    "1
2
3
4"
}

pub fn run() {
    println!("1 + 1 = {}", 1 + 1);
    println!("1.0 + 1.0 = {}", 1.0_f64 + 1.0);

    let facts = string_facts("Hello World");
    println!("\nx:\t\t {}", facts.text);
    println!("len(x):\t\t {}", facts.len);
    if let (Some(byte), Some(ch)) = (facts.first_byte, facts.first_char) {
        println!("x[0]:\t\t {}", byte);
        println!("char(x[0]):\t {}", ch);
    }

    match next_letter("Hello World") {
        Some(c) => println!("{}", c),
        None => println!("(no next letter)"),
    }

    println!("{:?}", split_chars("Republic of Ireland"));

    let table = bool_table(true, false);
    println!("\nBooleans:");
    println!("{}", table.not_x);
    println!("{}", table.or);
    println!("{}", table.and);
    println!("{}", table.nand);
    println!("{}", table.nor_as_int);

    println!("{}", multiline());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_facts_count_bytes() {
        let facts = string_facts("Hello World");
        assert_eq!(facts.len, 11);
        assert_eq!(facts.first_byte, Some(72));
        assert_eq!(facts.first_char, Some('H'));

        // 'é' is two bytes
        assert_eq!(string_facts("é").len, 2);
    }

    #[test]
    fn string_facts_of_empty_string() {
        let facts = string_facts("");
        assert_eq!(facts.len, 0);
        assert_eq!(facts.first_byte, None);
        assert_eq!(facts.first_char, None);
    }

    #[test]
    fn next_letter_increments_first_byte() {
        assert_eq!(next_letter("Hello World"), Some('I'));
        assert_eq!(next_letter("a"), Some('b'));
        assert_eq!(next_letter(""), None);
    }

    #[test]
    fn split_chars_keeps_spaces() {
        let parts = split_chars("ab c");
        assert_eq!(parts, vec!["a", "b", " ", "c"]);
        assert_eq!(split_chars("Republic of Ireland").len(), 19);
    }

    #[test]
    fn bool_table_for_true_false() {
        let table = bool_table(true, false);
        assert!(!table.not_x);
        assert!(table.or);
        assert!(!table.and);
        assert!(table.nand);
        assert_eq!(table.nor_as_int, 0);

        assert_eq!(bool_table(false, false).nor_as_int, 1);
    }

    #[test]
    fn multiline_has_four_lines() {
        assert_eq!(multiline().lines().collect::<Vec<_>>(), vec!["1", "2", "3", "4"]);
    }
}
