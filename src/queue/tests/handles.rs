//! Tests for the publisher/consumer handles

#[cfg(test)]
mod tests {
    use crate::queue::api::{channel, channel_with_baseline, QueueError};
    use crate::queue::tests::shuffled_indices;
    use std::thread;

    #[test]
    fn test_publishers_share_one_channel() {
        let (publisher, consumer) = channel::<u64>(16).unwrap();
        let clone = publisher.clone();

        assert!(std::sync::Arc::ptr_eq(publisher.channel(), clone.channel()));
        assert!(std::sync::Arc::ptr_eq(publisher.channel(), consumer.channel()));
    }

    #[test]
    fn test_consumer_iterates_until_closed_and_drained() {
        let (publisher, mut consumer) = channel::<String>(4).unwrap();

        let producers: Vec<_> = shuffled_indices(1, 20)
            .into_iter()
            .map(|index| {
                let publisher = publisher.clone();
                thread::spawn(move || publisher.publish(format!("row-{}", index), index))
            })
            .collect();

        let closer = thread::spawn(move || {
            for producer in producers {
                producer.join().unwrap().unwrap();
            }
            publisher.close();
        });

        let rows: Vec<String> = consumer.by_ref().collect();
        closer.join().unwrap();

        let expected: Vec<String> = (1..=20).map(|i| format!("row-{}", i)).collect();
        assert_eq!(rows, expected);
        assert!(consumer.is_drained());
        assert!(consumer.next().is_none());
    }

    #[test]
    fn test_consumer_keeps_close_cause() {
        let (publisher, mut consumer) = channel_with_baseline::<u8>(2, 41).unwrap();
        publisher.publish(42, 42).unwrap();
        publisher.close_with("upstream failed");

        assert_eq!(consumer.next(), Some(42));
        assert_eq!(consumer.next(), None);

        match consumer.terminal_error() {
            Some(QueueError::Closed { cause: Some(cause) }) => {
                assert_eq!(cause.to_string(), "upstream failed");
            }
            other => panic!("Expected Closed with cause, got {:?}", other),
        }
        assert!(!publisher.is_open());
    }

    #[test]
    fn test_consumer_read_and_readiness() {
        let (publisher, consumer) = channel::<char>(3).unwrap();
        assert!(!consumer.is_ready());

        publisher.publish('b', 2).unwrap();
        publisher.publish('a', 1).unwrap();
        assert!(consumer.is_ready());
        assert_eq!(consumer.read().unwrap(), 'a');
        assert!(consumer.terminal_error().is_none());
    }

    #[test]
    fn test_owned_consumer_reads_then_iterates() {
        let (publisher, mut consumer) = channel::<u32>(4).unwrap();
        for index in [3, 1, 4, 2] {
            publisher.publish(index as u32 * 10, index).unwrap();
        }
        publisher.close();

        assert_eq!(consumer.read().unwrap(), 10);
        assert_eq!(consumer.read().unwrap(), 20);

        let rest: Vec<u32> = consumer.by_ref().collect();
        assert_eq!(rest, vec![30, 40]);
        assert!(consumer.is_drained());
        assert!(consumer.read().unwrap_err().is_closed());
    }
}
