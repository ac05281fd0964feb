// Pattern: Vec and Slice Semantics
// Length vs capacity, appending, borrowing sub-slices, and copying.

use std::fmt::Debug;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceStats {
    pub len: usize,
    pub capacity: usize,
}

impl SliceStats {
    pub fn of<T>(v: &Vec<T>) -> Self {
        Self {
            len: v.len(),
            capacity: v.capacity(),
        }
    }
}

/// Appends every item and reports the new length and capacity.
pub fn append_all<T: Clone>(v: &mut Vec<T>, items: &[T]) -> SliceStats {
    v.extend_from_slice(items);
    SliceStats::of(v)
}

/// Copies as many elements as fit and returns how many were copied.
pub fn copy_prefix<T: Copy>(dst: &mut [T], src: &[T]) -> usize {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    n
}

pub fn window<T>(v: &[T], range: Range<usize>) -> Option<&[T]> {
    v.get(range)
}

fn show<T: Debug>(label: &str, v: &Vec<T>) {
    let stats = SliceStats::of(v);
    println!(
        "{}: {:?} Length: {} Capacity: {}",
        label, v, stats.len, stats.capacity
    );
}

pub fn run() {
    // 1. Creating
    let arr = [10, 20, 30, 40, 50];
    let slice1 = &arr[1..4];
    println!("Slice 1 (from array): {:?} Length: {}", slice1, slice1.len());

    let mut slice2 = vec![String::new(); 3];
    slice2[0] = "apple".to_string();
    slice2[1] = "banana".to_string();
    slice2[2] = "cherry".to_string();
    show("Slice 2 (vec! with length)", &slice2);

    let mut slice3 = Vec::with_capacity(5);
    slice3.push(100);
    slice3.push(200);
    show("Slice 3 (with_capacity)", &slice3);

    let mut slice4 = vec![1.5, 2.25, 1.618];
    show("Slice 4 (literal)", &slice4);

    println!("\n--------------------\n");

    // 2. Access and modify
    println!("Element at index 1 of slice 4: {}", slice4[1]);
    slice4[0] = 3.0;
    println!("Modified slice 4: {:?}", slice4);

    println!("\n--------------------\n");

    // 3. Append
    let mut slice5 = vec![1, 2];
    show("Initial slice 5", &slice5);
    append_all(&mut slice5, &[3]);
    show("After appending 3", &slice5);
    append_all(&mut slice5, &[4, 5, 6]);
    show("After appending 4, 5, 6", &slice5);
    let slice6 = [7, 8];
    append_all(&mut slice5, &slice6);
    show("After appending slice 6", &slice5);

    println!("\n--------------------\n");

    // 4. Sub-slices borrow from the vec; no copy is made
    let sub_slices = [
        ("Sub-slice 1 of slice 5", 2..5),
        ("Sub-slice 2 of slice 5", 0..3),
        ("Sub-slice 3 of slice 5", 4..slice5.len()),
        ("Sub-slice 4 of slice 5", 0..slice5.len()),
    ];
    for (label, range) in sub_slices {
        if let Some(sub) = window(&slice5, range) {
            println!("{}: {:?} Length: {}", label, sub, sub.len());
        }
    }

    println!("\n--------------------\n");

    // 5. Copy
    let source = [100, 200, 300];
    let mut destination = vec![0; source.len()];
    let copied = copy_prefix(&mut destination, &source);
    println!("Source slice: {:?}", source);
    println!("Destination slice: {:?}", destination);
    println!("Number of elements copied: {}", copied);

    let mut smaller = vec![0; 2];
    let copied_smaller = copy_prefix(&mut smaller, &source);
    println!("Smaller destination: {:?}", smaller);
    println!("Number copied to smaller: {}", copied_smaller);
}
