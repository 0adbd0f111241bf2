mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pixel_multiport::config::PixelConfiguration;
    use pixel_multiport::dmx::PixelDmx;
    use pixel_multiport::ingress::{QueueEmptyError, UniverseQueue, UniverseUpdate};
    use pixel_multiport::mapping::{PortMapping, UNIVERSE_SIZE};
    use pixel_multiport::output::MultiportOutput;
    use pixel_multiport::pixel_type::PixelType;
    use pixel_multiport::{PixelTransport, TransportError};

    const CAP: usize = 48;

    #[derive(Clone, Default)]
    struct FakeTransport {
        sent: Rc<RefCell<Vec<Vec<u8>>>>,
        capacity: usize,
    }

    impl PixelTransport for FakeTransport {
        fn capacity(&self) -> usize {
            self.capacity
        }

        fn begin_transfer(&mut self, frame: &[u8]) -> Result<(), TransportError> {
            self.sent.borrow_mut().push(frame.to_vec());
            Ok(())
        }

        fn is_transfer_active(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn test_pop_returns_oldest_first() {
        let queue = UniverseQueue::<4>::new();
        queue.try_push(UniverseUpdate::new(0, &[1, 2, 3])).unwrap();
        queue.try_push(UniverseUpdate::new(1, &[4, 5, 6])).unwrap();

        assert_eq!(queue.try_pop().unwrap().protocol_port, 0);
        assert_eq!(queue.try_pop().unwrap().protocol_port, 1);
        assert_eq!(queue.try_pop(), Err(QueueEmptyError));
    }

    #[test]
    fn test_full_queue_hands_update_back() {
        let queue = UniverseQueue::<2>::new();
        queue.try_push(UniverseUpdate::new(0, &[1])).unwrap();
        queue.try_push(UniverseUpdate::new(1, &[2])).unwrap();

        let rejected = UniverseUpdate::new(2, &[3]);
        let err = queue.try_push(rejected.clone()).unwrap_err();
        assert_eq!(err.0, rejected);
    }

    #[test]
    fn test_payload_truncated_to_universe() {
        let update = UniverseUpdate::new(0, &[0xAA; 600]);
        assert_eq!(update.data.len(), UNIVERSE_SIZE);
        assert_eq!(update.protocol_port, 0);
    }

    #[test]
    fn test_split_handles_share_queue() {
        let queue = UniverseQueue::<4>::new();
        let producer = queue.producer();
        let second = producer;
        let consumer = queue.consumer();

        producer.try_push(UniverseUpdate::new(0, &[1])).unwrap();
        second.try_push(UniverseUpdate::new(1, &[2])).unwrap();

        assert_eq!(consumer.try_pop().unwrap().protocol_port, 0);
        assert_eq!(consumer.try_pop().unwrap().protocol_port, 1);
    }

    #[test]
    fn test_pump_drains_into_bridge() {
        let settings = PixelConfiguration::new(PixelType::Ws2801, 2)
            .validate()
            .unwrap();
        let transport = FakeTransport {
            capacity: CAP,
            ..FakeTransport::default()
        };
        let sent = transport.sent.clone();
        let mapping = PortMapping::new(&settings);
        let output = MultiportOutput::<_, CAP>::new(transport, settings).unwrap();
        let mut dmx = PixelDmx::new(output, mapping);

        let queue = UniverseQueue::<4>::new();
        queue
            .try_push(UniverseUpdate::new(0, &[1, 2, 3, 4, 5, 6]))
            .unwrap();
        queue
            .try_push(UniverseUpdate::new(0, &[9, 9, 9, 9, 9, 9]))
            .unwrap();

        queue.consumer().pump(&mut dmx);

        assert_eq!(sent.borrow().len(), 2);
        let plane: Vec<u8> = dmx.output().committed_frame().plane(0).collect();
        assert_eq!(plane, [9, 9, 9, 9, 9, 9]);
        assert_eq!(queue.try_pop(), Err(QueueEmptyError));
    }
}
