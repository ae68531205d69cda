use pretty_assertions::assert_eq;

use super::*;
use crate::sink::MemorySink;

#[test]
fn push_bytes_spans_blocks() {
    let arena = Arena::new();
    let mut stream = ByteStream::with_block_size(&arena, 4);
    stream.push_bytes(b"hello world");
    assert_eq!(stream.len(), 11);
    assert_eq!(stream.to_vec(), b"hello world");
    assert_eq!(stream.get(6), Some(b'w'));
    assert_eq!(stream.get(11), None);
}

#[test]
fn default_block_size_is_used() {
    let arena = Arena::new();
    let stream = ByteStream::new(&arena);
    assert_eq!(stream.block_size(), DEFAULT_STREAM_BLOCK_SIZE);
    assert!(stream.is_empty());
}

#[test]
fn interval_bounds_are_checked() {
    let arena = Arena::new();
    let stream = ByteStream::from_bytes(&arena, b"abcdef");
    assert!(stream.interval(2, 4).is_some());
    assert!(stream.interval(2, 5).is_none());
    assert!(stream.interval(usize::MAX, 2).is_none());
    assert_eq!(stream.interval(6, 0).map(|i| i.len()), Some(0));
}

#[test]
fn push_interval_copies_across_streams() {
    let arena = Arena::new();
    let mut source = ByteStream::with_block_size(&arena, 3);
    source.push_bytes(b"0123456789");
    let mut target = ByteStream::with_block_size(&arena, 5);
    target.push_bytes(b"<");
    if let Some(interval) = source.interval(2, 7) {
        target.push_interval(&interval);
    }
    target.push(b'>');
    assert_eq!(target.to_vec(), b"<2345678>");
}

#[test]
fn flush_writes_once_per_block() {
    let arena = Arena::new();
    let mut stream = ByteStream::with_block_size(&arena, 4);
    stream.push_bytes(b"abcdefghij");
    let mut sink = MemorySink::new();
    assert_eq!(stream.flush(StreamHandle::Output, &mut sink), 10);
    assert_eq!(sink.writes(), 3);
    assert_eq!(sink.captured(StreamHandle::Output), b"abcdefghij");
    assert!(sink.captured(StreamHandle::Error).is_empty());
}

#[test]
fn second_flush_only_emits_new_bytes() {
    let arena = Arena::new();
    let mut stream = ByteStream::with_block_size(&arena, 4);
    let mut sink = MemorySink::new();
    stream.push_bytes(b"abcde");
    stream.flush(StreamHandle::Error, &mut sink);
    assert_eq!(stream.pending(), 0);
    assert_eq!(stream.flush(StreamHandle::Error, &mut sink), 0);

    stream.push_bytes(b"fghij");
    assert_eq!(stream.pending(), 5);
    assert_eq!(stream.flush(StreamHandle::Error, &mut sink), 5);
    assert_eq!(sink.captured(StreamHandle::Error), b"abcdefghij");
    // "abcd", "e", then "fgh" and "ij": the first flush ends mid-block.
    assert_eq!(sink.writes(), 4);
}

#[test]
fn empty_flush_makes_no_calls() {
    let arena = Arena::new();
    let mut stream = ByteStream::new(&arena);
    let mut sink = MemorySink::new();
    assert_eq!(stream.flush(StreamHandle::Output, &mut sink), 0);
    assert_eq!(sink.writes(), 0);
}

mod proptest_stream {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn flushing_in_pieces_emits_each_byte_once(
            pieces in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..40), 0..10),
            block_size in 1u32..16,
        ) {
            let arena = Arena::new();
            let mut stream = ByteStream::with_block_size(&arena, block_size);
            let mut sink = MemorySink::new();
            let mut expected = Vec::new();
            for piece in &pieces {
                stream.push_bytes(piece);
                expected.extend_from_slice(piece);
                stream.flush(StreamHandle::Output, &mut sink);
            }
            prop_assert_eq!(sink.captured(StreamHandle::Output), expected.as_slice());
        }
    }
}
