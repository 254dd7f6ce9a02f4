//! Discarding a record while it is being written
//!
//! 在写入过程中丢弃记录

use super::DropCounter;
use crate::{Config, PopError, PushError, with_config};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn droppable(capacity: usize) -> Config {
    Config::packet(capacity).drop_packet(true)
}

#[test]
fn test_dropped_record_is_never_seen() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(8)).unwrap();

    producer.push(1).unwrap();
    producer.push(2).unwrap();
    assert_eq!(producer.drop_packet(), 2);

    producer.push(3).unwrap();
    producer.push_last(4).unwrap();

    assert_eq!(consumer.pop_packet(), Ok(vec![3, 4]));
    assert_eq!(consumer.pop_packet(), Err(PopError::Empty));
}

#[test]
fn test_drop_wins_over_terminator() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(8)).unwrap();

    producer.push(1).unwrap();
    assert_eq!(producer.push_last_and_drop(2), Ok(()));
    assert_eq!(producer.level(), 0);

    consumer.tick();
    assert!(!consumer.valid());

    producer.push_last(5).unwrap();
    assert_eq!(consumer.pop_packet(), Ok(vec![5]));
}

#[test]
fn test_drop_keeps_committed_records() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(8)).unwrap();

    producer.push_last(1).unwrap();
    producer.push(2).unwrap();
    assert_eq!(producer.drop_packet(), 1);
    assert_eq!(producer.level(), 1);

    assert_eq!(consumer.pop_packet(), Ok(vec![1]));
    assert_eq!(consumer.pop_packet(), Err(PopError::Empty));
}

#[test]
fn test_drop_releases_values() {
    let counter = Arc::new(AtomicUsize::new(0));
    let (mut producer, _consumer) = with_config::<DropCounter>(droppable(8)).unwrap();

    producer.push_last(DropCounter::new(&counter)).unwrap();
    for _ in 0..3 {
        producer.push(DropCounter::new(&counter)).unwrap();
    }
    assert_eq!(producer.drop_packet(), 3);
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    assert!(producer.push_last_and_drop(DropCounter::new(&counter)).is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_push_last_and_drop_when_full() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(4)).unwrap();

    for i in 0..4 {
        producer.push(i).unwrap();
    }
    assert!(!producer.ready());

    // No room for the terminator, the record is dropped anyway
    // 没有空间放终止符，记录仍然被丢弃
    assert_eq!(producer.push_last_and_drop(4), Err(PushError::Full(4)));
    assert_eq!(producer.level(), 0);
    assert_eq!(producer.free_space(), 4);

    consumer.tick();
    assert!(!consumer.valid());

    for i in 0..3 {
        producer.push(10 + i).unwrap();
    }
    producer.push_last(13).unwrap();
    assert_eq!(consumer.pop_packet(), Ok(vec![10, 11, 12, 13]));
}

#[test]
fn test_drop_across_wrap_around() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(4)).unwrap();

    for round in 0..10 {
        producer.push(round + 100).unwrap();
        producer.push(round + 200).unwrap();
        assert_eq!(producer.drop_packet(), 2);

        producer.push(round).unwrap();
        producer.push_last(round + 1).unwrap();
        assert_eq!(consumer.pop_packet(), Ok(vec![round, round + 1]));
    }
}

#[test]
fn test_drop_while_consumer_reads_earlier_record() {
    let (mut producer, mut consumer) = with_config::<u32>(droppable(8)).unwrap();

    producer.push(1).unwrap();
    producer.push_last(2).unwrap();
    assert_eq!(consumer.pop().unwrap().value, 1);

    producer.push(3).unwrap();
    producer.push(4).unwrap();
    assert_eq!(producer.drop_packet(), 2);

    let slot = consumer.pop().unwrap();
    assert_eq!(slot.value, 2);
    assert!(slot.last);
    assert_eq!(consumer.pop(), Err(PopError::Empty));

    producer.push_last(5).unwrap();
    assert_eq!(consumer.pop_packet(), Ok(vec![5]));
}

#[test]
fn test_drop_with_output_stage() {
    let config = droppable(4).output_stage(true);
    let (mut producer, mut consumer) = with_config::<u32>(config).unwrap();

    producer.push_last(1).unwrap();
    // Stage the committed record before the next one is written
    // 在写入下一个记录之前先将已提交的记录装入输出级
    consumer.tick();
    assert!(consumer.valid());

    producer.push(2).unwrap();
    producer.push(3).unwrap();
    assert_eq!(producer.drop_packet(), 2);

    producer.push(4).unwrap();
    producer.push_last(5).unwrap();

    assert_eq!(consumer.pop_packet(), Ok(vec![1]));
    assert_eq!(consumer.pop_packet(), Ok(vec![4, 5]));
    assert_eq!(consumer.pop_packet(), Err(PopError::Empty));

    // Only the stage reservation is left
    // 只剩下输出级的预留
    producer.tick();
    assert_eq!(producer.level(), 1);
}
