mod tests {
    use pixel_multiport::config::{ConfigError, PixelConfiguration, PixelSettings};
    use pixel_multiport::mapping::{DEFAULT_UNIVERSE_STEP, PortMapping, SlotInfo};
    use pixel_multiport::pixel_type::PixelType;

    fn rgb_settings(count: usize) -> PixelSettings {
        PixelConfiguration::new(PixelType::Ws2812b, count)
            .validate()
            .unwrap()
    }

    fn rgbw_settings(count: usize) -> PixelSettings {
        PixelConfiguration::new(PixelType::Sk6812w, count)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_default_layout() {
        let mapping = PortMapping::new(&rgb_settings(170));
        for (index, port) in mapping.ports.iter().enumerate() {
            assert_eq!(
                port.start_universe,
                1 + index as u16 * DEFAULT_UNIVERSE_STEP
            );
            assert_eq!(port.count, 170);
            assert_eq!(port.grouping, 1);
            assert_eq!(port.active, index == 0);
        }
        assert_eq!(mapping.active_count(), 1);
        assert_eq!(mapping.dmx_start_address(), 1);
    }

    #[test]
    fn test_set_active_ports() {
        let mut mapping = PortMapping::new(&rgb_settings(170));
        mapping.set_active_ports(3);
        assert_eq!(mapping.active_count(), 3);
        assert!(mapping.ports[2].active);
        assert!(!mapping.ports[3].active);
    }

    #[test]
    fn test_full_universe_fits_one() {
        let mapping = PortMapping::new(&rgb_settings(170));
        assert_eq!(mapping.pixels_per_universe(), 170);
        assert_eq!(mapping.groups(0), 170);
        assert_eq!(mapping.universes(0), 1);
        assert_eq!(mapping.universes_per_port(), 1);
        assert_eq!(mapping.last_protocol_port(), 0);
    }

    #[test]
    fn test_long_strip_spans_universes() {
        let mut mapping = PortMapping::new(&rgb_settings(256));
        assert_eq!(mapping.universes(0), 2);

        mapping.set_active_ports(4);
        assert_eq!(mapping.universes_per_port(), 2);
        assert_eq!(mapping.last_protocol_port(), 7);
    }

    #[test]
    fn test_rgbw_universe_capacity() {
        let mapping = PortMapping::new(&rgbw_settings(128));
        assert_eq!(mapping.pixels_per_universe(), 128);
        assert_eq!(mapping.universes(0), 1);

        let wide = PortMapping::new(&rgbw_settings(129));
        assert_eq!(wide.universes(0), 2);
    }

    #[test]
    fn test_resolve_protocol_port() {
        let mut mapping = PortMapping::new(&rgb_settings(256));
        mapping.set_active_ports(4);
        assert_eq!(mapping.resolve(0), Some((0, 0)));
        assert_eq!(mapping.resolve(1), Some((0, 1)));
        assert_eq!(mapping.resolve(5), Some((2, 1)));
        assert_eq!(mapping.resolve(16), None);
    }

    #[test]
    fn test_begin_group() {
        let mapping = PortMapping::new(&rgb_settings(256));
        assert_eq!(mapping.begin_group(0), 0);
        assert_eq!(mapping.begin_group(1), 170);
    }

    #[test]
    fn test_grouping_shrinks_groups() {
        let mut mapping = PortMapping::new(&rgb_settings(8));
        mapping.ports[0].grouping = 4;
        assert_eq!(mapping.effective_grouping(0), 4);
        assert_eq!(mapping.groups(0), 2);

        mapping.ports[0].grouping = 8;
        assert_eq!(mapping.groups(0), 1);
    }

    #[test]
    fn test_invalid_grouping_falls_back() {
        let mut mapping = PortMapping::new(&rgb_settings(8));
        mapping.ports[0].grouping = 0;
        assert_eq!(mapping.effective_grouping(0), 1);
        mapping.ports[0].grouping = 9;
        assert_eq!(mapping.effective_grouping(0), 1);
        assert_eq!(mapping.groups(0), 8);
    }

    #[test]
    fn test_footprint_clamped_to_universe() {
        let mapping = PortMapping::new(&rgb_settings(170));
        assert_eq!(mapping.footprint(0), 510);

        let wide = PortMapping::new(&rgb_settings(256));
        assert_eq!(wide.footprint(0), 512);

        let rgbw = PortMapping::new(&rgbw_settings(128));
        assert_eq!(rgbw.footprint(0), 512);
    }

    #[test]
    fn test_slot_info_categories() {
        let mapping = PortMapping::new(&rgb_settings(170));
        assert_eq!(
            mapping.slot_info(0, 0),
            Some(SlotInfo {
                kind: 0x00,
                category: 0x0205
            })
        );
        assert_eq!(mapping.slot_info(0, 1).unwrap().category, 0x0206);
        assert_eq!(mapping.slot_info(0, 2).unwrap().category, 0x0207);
        assert_eq!(mapping.slot_info(0, 3).unwrap().category, 0x0205);
    }

    #[test]
    fn test_slot_info_white_channel() {
        let mapping = PortMapping::new(&rgbw_settings(128));
        assert_eq!(mapping.slot_info(0, 3).unwrap().category, 0x0212);
        assert_eq!(mapping.slot_info(0, 4).unwrap().category, 0x0205);
    }

    #[test]
    fn test_slot_info_bounds() {
        let mapping = PortMapping::new(&rgb_settings(170));
        assert_eq!(mapping.slot_info(0, 510), None);
        assert_eq!(mapping.slot_info(8, 0), None);
    }

    #[test]
    fn test_start_address_range_checked() {
        let mut mapping = PortMapping::new(&rgb_settings(170));
        assert_eq!(mapping.set_dmx_start_address(0), Err(ConfigError::OutOfRange));
        assert_eq!(
            mapping.set_dmx_start_address(513),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(mapping.set_dmx_start_address(1), Ok(()));
    }

    #[test]
    fn test_start_address_must_leave_room() {
        // 160 RGB pixels consume 480 channels, so 33 is the last address
        // that still fits a universe.
        let mut mapping = PortMapping::new(&rgb_settings(160));
        assert_eq!(mapping.set_dmx_start_address(33), Ok(()));
        assert_eq!(mapping.dmx_start_address(), 33);
        assert_eq!(
            mapping.set_dmx_start_address(34),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(mapping.dmx_start_address(), 33);
    }

    #[test]
    fn test_start_address_ignored_on_multi_universe_ports() {
        let mut mapping = PortMapping::new(&rgb_settings(256));
        assert_eq!(mapping.set_dmx_start_address(400), Ok(()));
    }
}
