mod tests {
    use pixel_multiport::InterleavedFrame;

    #[test]
    fn test_with_len_respects_capacity() {
        assert!(InterleavedFrame::<16>::with_len(16).is_some());
        assert!(InterleavedFrame::<16>::with_len(17).is_none());

        let frame = InterleavedFrame::<16>::with_len(8).unwrap();
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.as_slice(), &[0; 8]);
    }

    #[test]
    fn test_set_port_bit() {
        let mut frame = InterleavedFrame::<8>::with_len(4).unwrap();

        frame.set_port_bit(0, 0, true);
        frame.set_port_bit(0, 7, true);
        assert_eq!(frame.as_slice()[0], 0b1000_0001);

        frame.set_port_bit(0, 0, false);
        assert_eq!(frame.as_slice()[0], 0b1000_0000);
    }

    #[test]
    fn test_ports_do_not_disturb_each_other() {
        let mut frame = InterleavedFrame::<8>::with_len(8).unwrap();

        frame.write_port_byte(0, 2, 0xFF);
        frame.write_port_byte(0, 5, 0xAA);

        // Port 2 still reads back all ones after port 5 wrote.
        assert_eq!(frame.plane(2).next(), Some(0xFF));
        assert_eq!(frame.plane(5).next(), Some(0xAA));
    }

    #[test]
    fn test_write_port_byte_is_msb_first() {
        let mut frame = InterleavedFrame::<8>::with_len(8).unwrap();
        frame.write_port_byte(0, 0, 0x80);

        // Element 0 carries the MSB.
        assert_eq!(frame.as_slice()[0], 0x01);
        assert_eq!(frame.as_slice()[1], 0x00);
    }

    #[test]
    fn test_plane_inverts_interleave() {
        let mut frame = InterleavedFrame::<32>::with_len(24).unwrap();
        frame.write_port_byte(0, 3, 0x12);
        frame.write_port_byte(8, 3, 0x34);
        frame.write_port_byte(16, 3, 0x56);

        let bytes: Vec<u8> = frame.plane(3).collect();
        assert_eq!(bytes, vec![0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_empty_frame() {
        let frame = InterleavedFrame::<8>::with_len(0).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.plane(0).count(), 0);
    }
}
