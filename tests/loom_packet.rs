#![cfg(feature = "loom")]

use loom::thread;
use packetring::Config;

#[test]
fn test_packet_commit_loom() {
    loom::model(|| {
        let (mut p, mut c) = packetring::with_config::<usize>(Config::packet(4)).unwrap();

        let t1 = thread::spawn(move || {
            p.push(1).unwrap();
            p.push(2).unwrap();
            p.push_last(3).unwrap();
        });

        let t2 = thread::spawn(move || {
            // Either nothing or the whole record
            loop {
                match c.pop_packet() {
                    Ok(record) => {
                        assert_eq!(record, vec![1, 2, 3]);
                        break;
                    }
                    Err(_) => thread::yield_now(),
                }
            }
        });

        t1.join().unwrap();
        t2.join().unwrap();
    });
}

#[test]
fn test_packet_drop_loom() {
    loom::model(|| {
        let config = Config::packet(4).drop_packet(true);
        let (mut p, mut c) = packetring::with_config::<usize>(config).unwrap();

        let t1 = thread::spawn(move || {
            p.push(100).unwrap();
            p.drop_packet();
            p.push(1).unwrap();
            p.push_last(2).unwrap();
        });

        let t2 = thread::spawn(move || {
            loop {
                match c.pop_packet() {
                    Ok(record) => {
                        assert_eq!(record, vec![1, 2]);
                        break;
                    }
                    Err(_) => thread::yield_now(),
                }
            }
        });

        t1.join().unwrap();
        t2.join().unwrap();
    });
}

#[test]
fn test_peek_holds_space_loom() {
    loom::model(|| {
        let config = Config::packet(2).peek_mode(true);
        let (mut p, mut c) = packetring::with_config::<usize>(config).unwrap();

        let t1 = thread::spawn(move || {
            p.push(1).unwrap();
            p.push_last(2).unwrap();
            while p.push_last(3).is_err() {
                thread::yield_now();
            }
        });

        let t2 = thread::spawn(move || {
            let mut peeked = Vec::new();
            while peeked.len() < 2 {
                match c.peek_pop() {
                    Ok(slot) => peeked.push(slot.value),
                    Err(_) => thread::yield_now(),
                }
            }
            assert_eq!(peeked, vec![1, 2]);

            assert_eq!(c.pop_packet().unwrap(), vec![1, 2]);
            loop {
                match c.pop_packet() {
                    Ok(record) => {
                        assert_eq!(record, vec![3]);
                        break;
                    }
                    Err(_) => thread::yield_now(),
                }
            }
        });

        t1.join().unwrap();
        t2.join().unwrap();
    });
}
