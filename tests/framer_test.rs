// Framing behavior over arbitrary chunkings of the byte stream.

use digg_stream::framer::{Frame, FramingMode, StreamFramer};

const RECORD: &str = r#"{"type":"submission","item":{"title":"Rust 1.0 {released}","diggs":[1,2,3]},"user":{"name":"kevinrose"}}"#;

fn feed_all(framer: &mut StreamFramer, chunks: &[&[u8]]) -> Vec<(usize, String)> {
    chunks
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| framer.feed(chunk).into_record().map(|r| (i, r)))
        .collect()
}

#[test]
fn test_every_two_way_split_emits_once_on_last_chunk() {
    let bytes = RECORD.as_bytes();
    for split in 1..bytes.len() {
        let mut framer = StreamFramer::default();
        let emitted = feed_all(&mut framer, &[&bytes[..split], &bytes[split..]]);
        assert_eq!(
            emitted,
            vec![(1, RECORD.to_string())],
            "split at byte {}",
            split
        );
        assert!(framer.is_empty());
    }
}

#[test]
fn test_three_way_splits_emit_once() {
    let bytes = RECORD.as_bytes();
    for a in (1..bytes.len() - 1).step_by(5) {
        for b in (a + 1..bytes.len()).step_by(7) {
            let mut framer = StreamFramer::default();
            let emitted = feed_all(&mut framer, &[&bytes[..a], &bytes[a..b], &bytes[b..]]);
            assert_eq!(emitted, vec![(2, RECORD.to_string())], "splits at {} and {}", a, b);
        }
    }
}

#[test]
fn test_incomplete_prefixes_never_emit() {
    let bytes = RECORD.as_bytes();
    let mut framer = StreamFramer::default();
    let chunks: Vec<&[u8]> = bytes[..bytes.len() - 1].chunks(3).collect();
    assert!(feed_all(&mut framer, &chunks).is_empty());
    assert_eq!(framer.buffered_len(), bytes.len() - 1);
}

#[test]
fn test_garbage_never_emits_and_accumulates() {
    let mut framer = StreamFramer::default();
    for _ in 0..100 {
        assert_eq!(framer.feed(b"<html>502 Bad Gateway</html>"), Frame::Incomplete);
    }
    assert_eq!(framer.buffered_len(), 2800);
}

#[test]
fn test_record_after_emission_is_independent_of_history() {
    let mut framer = StreamFramer::default();
    let bytes = RECORD.as_bytes();
    let (head, tail) = bytes.split_at(40);

    assert_eq!(framer.feed(head), Frame::Incomplete);
    assert_eq!(framer.feed(tail), Frame::Complete(RECORD.to_string()));
    assert!(framer.is_empty());

    let next = r#"{"type":"digg"}"#;
    assert_eq!(framer.feed(next.as_bytes()), Frame::Complete(next.to_string()));
}

#[test]
fn test_multiple_records_in_one_chunk_by_mode() {
    let chunk = format!("{}\n{}\n", RECORD, RECORD);

    let mut whole = StreamFramer::new(FramingMode::WholeBuffer);
    assert_eq!(whole.feed(chunk.as_bytes()), Frame::Incomplete);
    assert_eq!(whole.next_buffered(), None);

    let mut balanced = StreamFramer::new(FramingMode::Balanced);
    assert_eq!(balanced.feed(chunk.as_bytes()), Frame::Complete(RECORD.to_string()));
    assert_eq!(balanced.next_buffered(), Some(RECORD.to_string()));
    assert_eq!(balanced.next_buffered(), None);
}

#[test]
fn test_balanced_records_split_across_chunk_boundaries() {
    let stream = format!("{}\r\n{}\r\n{}\r\n", RECORD, r#"{"type":"digg"}"#, RECORD);
    let mut framer = StreamFramer::new(FramingMode::Balanced);
    let mut records = Vec::new();
    for chunk in stream.as_bytes().chunks(11) {
        let mut next = framer.feed(chunk).into_record();
        while let Some(record) = next {
            records.push(record);
            next = framer.next_buffered();
        }
    }
    assert_eq!(
        records,
        vec![
            RECORD.to_string(),
            r#"{"type":"digg"}"#.to_string(),
            RECORD.to_string()
        ]
    );
}
