// Pattern: HashMap Basics
// Insert, lookup, checked lookup, remove, iteration, shared mutation, equality.

use std::collections::HashMap;

pub type Ages = HashMap<String, i32>;

/// Lookup that falls back to the zero value when the key is missing.
pub fn age_or_zero(ages: &Ages, name: &str) -> i32 {
    ages.get(name).copied().unwrap_or_default()
}

pub fn maps_equal(a: &Ages, b: &Ages) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(key, value)| b.get(key) == Some(value))
}

fn add_person(ages: &mut Ages, name: &str, age: i32) {
    ages.insert(name.to_string(), age);
}

fn sorted(ages: &Ages) -> Vec<(&str, i32)> {
    let mut entries: Vec<_> = ages.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort();
    entries
}

/// State left behind by [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapReport {
    pub final_ages: Ages,
    pub missing_lookup: i32,
    pub equal_maps: bool,
    pub unequal_maps: bool,
}

pub fn run() -> MapReport {
    let empty: Ages = HashMap::new();
    println!("1. Empty map: {:?}", empty);

    let literal: Ages = HashMap::from([
        ("Alice".to_string(), 30),
        ("Bob".to_string(), 25),
        ("Charlie".to_string(), 35),
    ]);
    println!("2. Initialized map: {:?}", sorted(&literal));

    let mut ages: Ages = HashMap::with_capacity(4);
    println!("3. Map created with capacity: {:?}", ages);

    add_person(&mut ages, "Alice", 30);
    add_person(&mut ages, "Bob", 25);
    println!("4. Map after adding elements: {:?}", sorted(&ages));
    println!("5. Alice's age: {}", age_or_zero(&ages, "Alice"));

    let missing_lookup = age_or_zero(&ages, "David");
    println!("6. David's age: {}", missing_lookup);

    match ages.get("David") {
        Some(age) => println!("7. David's age: {}", age),
        None => println!("7. David's age not found"),
    }
    match ages.get("Alice") {
        Some(age) => println!("8. Alice's age: {}", age),
        None => println!("8. Alice's age not found"),
    }

    ages.remove("Bob");
    println!("9. Map after deleting Bob: {:?}", sorted(&ages));
    ages.remove("Bob");
    println!("10. Map after deleting Bob again: {:?}", sorted(&ages));

    println!("11. Iterating over map:");
    for (name, age) in &ages {
        println!("  {} is {} years old", name, age);
    }

    // The map is one value with one owner; a &mut borrow sees the same table.
    {
        let alias = &mut ages;
        add_person(alias, "Charlie", 35);
    }
    println!("12. ages: {:?}", sorted(&ages));

    let map5 = HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
    let map6 = HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
    let map7 = HashMap::from([("a".to_string(), 1), ("b".to_string(), 3)]);
    let equal_maps = maps_equal(&map5, &map6);
    let unequal_maps = maps_equal(&map5, &map7);
    println!("13. Are map5 and map6 equal? {}", equal_maps);
    println!("14. Are map5 and map7 equal? {}", unequal_maps);

    MapReport {
        final_ages: ages,
        missing_lookup,
        equal_maps,
        unequal_maps,
    }
}
