// Pattern: Control Flow
// while-style and counting loops, if/else, and match in place of switch.

use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

pub fn count_up(n: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut i = 1;
    while i <= n {
        out.push(i);
        i += 1;
    }
    out
}

pub fn count_down(n: u32) -> Vec<u32> {
    (1..=n).rev().collect()
}

pub fn parity(i: i64) -> Parity {
    if i % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

pub fn number_word(n: i16) -> &'static str {
    match n {
        0 => "Zero",
        1 => "One",
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        _ => "Wrong number",
    }
}

pub fn parse_number_input(line: &str) -> Option<i16> {
    line.trim().parse().ok()
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints the loop demos, then asks for a number on `input`.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    writeln!(output, "{}", join(&count_up(10)))?;
    writeln!(output, "{}", join(&count_down(10)))?;

    for i in 1..=10 {
        match parity(i) {
            Parity::Even => writeln!(output, "{} : even", i)?,
            Parity::Odd => writeln!(output, "{} : odd", i)?,
        }
    }

    write!(output, "Enter number 1-5: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let word = parse_number_input(&line).map_or("Wrong number", number_word);
    writeln!(output, "{}", word)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loops_count_both_ways() {
        assert_eq!(count_up(3), vec![1, 2, 3]);
        assert_eq!(count_down(3), vec![3, 2, 1]);
        assert!(count_up(0).is_empty());
    }

    #[test]
    fn parity_handles_negatives() {
        assert_eq!(parity(4), Parity::Even);
        assert_eq!(parity(7), Parity::Odd);
        assert_eq!(parity(-3), Parity::Odd);
        assert_eq!(parity(0), Parity::Even);
    }

    #[test]
    fn number_words() {
        assert_eq!(number_word(0), "Zero");
        assert_eq!(number_word(5), "Five");
        assert_eq!(number_word(6), "Wrong number");
        assert_eq!(number_word(-1), "Wrong number");
    }

    #[test]
    fn run_reads_one_line() {
        let mut out = Vec::new();
        run(&b"3\n"[..], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("1 2 3 4 5 6 7 8 9 10\n10 9 8"));
        assert!(text.contains("2 : even\n"));
        assert!(text.contains("9 : odd\n"));
        assert!(text.ends_with("Enter number 1-5: Three\n"));
    }

    #[test]
    fn run_with_garbage_input() {
        let mut out = Vec::new();
        run(&b"abc\n"[..], &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("Wrong number\n"));
    }
}
