//! Fuzzer for the `HashTable` API.
//!
//! Runs arbitrary operation sequences against both the real table and a
//! simple model built on the standard library, and checks that they agree
//! on sizes, match counts and the multiset of values under each key.

#![no_main]
use arbitrary::Arbitrary;
use bucketmap::HashTableBuilder;
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

/// Keys are drawn from a small range so that duplicates and shared buckets
/// are common.
type Key = i8;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Put(Key, i32),
    Get(Key, u8),
    Erase(Key),
}

#[derive(Debug, Arbitrary)]
struct Input {
    expected_capacity: u8,
    oversize_factor: u8,
    bucket_capacity: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Default)]
struct SimulatedTable(HashMap<i32, Vec<i32>>);

impl SimulatedTable {
    fn size(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

fn sorted(mut values: Vec<i32>) -> Vec<i32> {
    values.sort_unstable();
    values
}

fuzz_target!(|input: Input| {
    let Ok(mut table) = HashTableBuilder::new()
        .oversize_factor(usize::from(input.oversize_factor % 4) + 1)
        .bucket_capacity(usize::from(input.bucket_capacity % 9))
        .build(usize::from(input.expected_capacity))
    else {
        return;
    };
    let mut sim = SimulatedTable::default();

    for op in input.ops {
        match op {
            Op::Put(key, value) => {
                let key = i32::from(key);
                table.put(key, value).expect("small tables always allocate");
                sim.0.entry(key).or_default().push(value);
            }
            Op::Get(key, len) => {
                let key = i32::from(key);
                let expected = sim.0.get(&key).cloned().unwrap_or_default();
                let mut buf = vec![0; usize::from(len)];
                let found = table.get(key, &mut buf);
                assert_eq!(found, expected.len());
                if found <= buf.len() {
                    buf.truncate(found);
                    assert_eq!(sorted(buf), sorted(expected));
                } else {
                    let full: Vec<i32> = table.values(key).collect();
                    assert_eq!(buf[..], full[..buf.len()]);
                }
            }
            Op::Erase(key) => {
                let key = i32::from(key);
                let expected = sim.0.remove(&key).map_or(0, |v| v.len());
                assert_eq!(table.erase(key), expected);
                assert!(!table.contains_key(key));
            }
        }
        assert_eq!(table.size(), sim.size());
    }
});
