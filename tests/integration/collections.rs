//! Integration tests for the synchronous collections
//! Exercises the crates together through the facade

use datakit::basic::{IntArrayList, LongArrayList};
use datakit::lru::{GetFirstLruMap, LruMap};
use datakit::sorted::{OnRepeat, SortedUniqueList};
use datakit::{DataError, int_array_list};

#[test]
fn test_greeting_list_rendering() {
    let mut list = IntArrayList::new();
    list.add(6);
    list.add(6);
    list.add(6);

    assert_eq!(list.to_string(), "[6,6,6]");
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![6, 6, 6]);
}

#[test]
fn test_index_errors_surface_through_facade() {
    let list = int_array_list![1, 2];
    let error = list.get(2).unwrap_err();

    assert_eq!(error, DataError::IndexOutOfBounds { size: 2, index: 2 });
    assert_eq!(error.to_string(), "size = 2 ,the index = 2");
}

#[test]
fn test_array_list_json_round_trip_through_struct() {
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Payload {
        ids: LongArrayList,
    }

    let json = r#"{"ids":[3,1,2]}"#;
    let payload: Payload = serde_json::from_str(json).unwrap();
    assert_eq!(payload.ids.to_vec(), vec![3, 1, 2]);
    assert_eq!(serde_json::to_string(&payload).unwrap(), json);
}

#[test]
fn test_sorted_list_fed_from_array_list() {
    let raw = int_array_list![5, 3, 5, 1, 3];
    let mut sorted = SortedUniqueList::natural();
    sorted.add_all(raw.iter());

    assert_eq!(sorted.to_vec(), vec![1, 3, 5]);
}

#[test]
fn test_sorted_list_discard_mode() {
    let mut sorted = SortedUniqueList::new(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0))
        .on_repeat(OnRepeat::Discard);

    assert!(sorted.add((2, 'b')));
    assert!(sorted.add((1, 'a')));
    assert!(!sorted.add((2, 'b')));
    assert_eq!(sorted.len(), 2);
    assert_eq!(sorted.first(), Some(&(1, 'a')));
}

#[test]
fn test_lru_maps_agree_on_eviction() {
    let mut ordered = LruMap::new(3).unwrap();
    let stamped = GetFirstLruMap::new(3, 0.75).unwrap();

    for key in 0..3 {
        ordered.put(key, key * 10);
        stamped.put(key, key * 10);
    }
    ordered.get(&0);
    stamped.get(&0);
    ordered.put(3, 30);
    stamped.put(3, 30);

    let mut ordered_keys: Vec<i32> = ordered.keys().copied().collect();
    let mut stamped_keys = stamped.keys();
    ordered_keys.sort_unstable();
    stamped_keys.sort_unstable();
    assert_eq!(ordered_keys, vec![0, 2, 3]);
    assert_eq!(stamped_keys, ordered_keys);
}

#[test]
fn test_lru_constructor_errors() {
    assert_eq!(
        LruMap::<u8, u8>::new(1).unwrap_err(),
        DataError::IllegalMaxSize { max_size: 1 }
    );
    assert!(matches!(
        GetFirstLruMap::<u8, u8>::new(8, -1.0),
        Err(DataError::IllegalLoadFactor { .. })
    ));
}
