// Pattern: Fixed-Size Arrays
// The length is part of the type, so `[u8; 8]` can only ever hold 8 bits.

pub fn full_name(parts: [&str; 2]) -> String {
    parts.join(" ")
}

/// Reads `bits` most-significant first. Any non-zero element counts as 1.
pub fn bits_to_base10(bits: [u8; 8]) -> u32 {
    bits.iter()
        .enumerate()
        .filter(|(_, bit)| **bit != 0)
        .map(|(i, _)| 1u32 << (7 - i))
        .sum()
}

pub fn sum(values: [f64; 5]) -> f64 {
    values.iter().sum()
}

pub fn run() {
    println!("Arrays Examples:");

    let mut name = [""; 2];
    name[0] = "Oleksandr";
    name[1] = "Petrushchak";
    println!("{}", full_name(name));

    let mut bits = [0u8; 8];
    bits[0] = 1;
    bits[2] = 1;
    bits[3] = 1;
    bits[6] = 1;
    println!(
        "{:?} 8-bit binary number is {} in 10 base",
        bits,
        bits_to_base10(bits)
    );

    let values = [12.23, 23.34, 34.45, 45.56, 56.67];
    println!("Total sum of {:?} is {}", values, sum(values));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_to_base10_reads_msb_first() {
        assert_eq!(bits_to_base10([1, 0, 1, 1, 0, 0, 1, 0]), 178);
        assert_eq!(bits_to_base10([0; 8]), 0);
        assert_eq!(bits_to_base10([1; 8]), 255);
        assert_eq!(bits_to_base10([0, 0, 0, 0, 0, 0, 0, 1]), 1);
    }

    #[test]
    fn non_zero_counts_as_set() {
        assert_eq!(bits_to_base10([2, 0, 0, 0, 0, 0, 0, 0]), 128);
    }

    #[test]
    fn full_name_joins_with_space() {
        assert_eq!(full_name(["Ada", "Lovelace"]), "Ada Lovelace");
    }

    #[test]
    fn sum_of_five() {
        let total = sum([12.23, 23.34, 34.45, 45.56, 56.67]);
        assert!((total - 172.25).abs() < 1e-9);
    }
}
