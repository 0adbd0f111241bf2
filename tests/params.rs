mod tests {
    use pixel_multiport::params::{DEFAULT_BRIGHTNESS, DEFAULT_COUNT, PixelParams};
    use pixel_multiport::patterns::PatternKind;
    use pixel_multiport::pixel_type::{ChannelOrder, PixelType};

    #[test]
    fn test_defaults() {
        let params = PixelParams::default();
        assert_eq!(params.pixel_type, PixelType::Ws2812b);
        assert_eq!(params.count, 170);
        assert_eq!(params.map, None);
        assert_eq!(params.grouping_count, 1);
        assert_eq!(params.global_brightness, 0xFF);
        assert_eq!(params.dmx_start_address, 1);
        assert_eq!(params.start_universe, [1, 5, 9, 13, 17, 21, 25, 29]);
        assert_eq!(params.active_ports, 1);
        assert_eq!(params.test_pattern, PatternKind::None);
        assert!(!params.gamma_correction);
    }

    #[test]
    fn test_sanitize_count() {
        let mut params = PixelParams {
            count: 0,
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.count, DEFAULT_COUNT);

        params.count = 2000;
        params.sanitize();
        assert_eq!(params.count, DEFAULT_COUNT);

        params.count = 680;
        params.sanitize();
        assert_eq!(params.count, 680);
    }

    #[test]
    fn test_sanitize_grouping() {
        let mut params = PixelParams {
            grouping_count: 0,
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.grouping_count, 1);

        params.grouping_count = 200;
        params.sanitize();
        assert_eq!(params.grouping_count, 1);

        params.grouping_count = 2;
        params.sanitize();
        assert_eq!(params.grouping_count, 2);
    }

    #[test]
    fn test_sanitize_brightness() {
        let mut params = PixelParams {
            global_brightness: 0,
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.global_brightness, DEFAULT_BRIGHTNESS);

        params.global_brightness = 0x80;
        params.sanitize();
        assert_eq!(params.global_brightness, 0x80);
    }

    #[test]
    fn test_sanitize_start_address() {
        let mut params = PixelParams {
            dmx_start_address: 0,
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.dmx_start_address, 1);

        params.dmx_start_address = 513;
        params.sanitize();
        assert_eq!(params.dmx_start_address, 1);

        params.dmx_start_address = 512;
        params.sanitize();
        assert_eq!(params.dmx_start_address, 512);
    }

    #[test]
    fn test_sanitize_start_universes() {
        let mut params = PixelParams::default();
        params.start_universe[2] = 0;
        params.start_universe[5] = 77;
        params.sanitize();
        assert_eq!(params.start_universe[2], 9);
        assert_eq!(params.start_universe[5], 77);
    }

    #[test]
    fn test_sanitize_active_ports() {
        let mut params = PixelParams {
            active_ports: 0,
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.active_ports, 1);

        params.active_ports = 9;
        params.sanitize();
        assert_eq!(params.active_ports, 1);

        params.active_ports = 8;
        params.sanitize();
        assert_eq!(params.active_ports, 8);
    }

    #[test]
    fn test_sanitize_gamma_value() {
        let mut params = PixelParams {
            gamma_correction: true,
            gamma_value: Some(9.9),
            ..PixelParams::default()
        };
        params.sanitize();
        assert_eq!(params.gamma_value, None);

        params.gamma_value = Some(2.5);
        params.sanitize();
        assert_eq!(params.gamma_value, Some(2.5));
    }

    #[test]
    fn test_configuration_applies_record() {
        let params = PixelParams {
            pixel_type: PixelType::Ws2811,
            count: 24,
            map: Some(ChannelOrder::Grb),
            low_code_us: Some(0.3),
            high_code_us: Some(0.8),
            global_brightness: 0x80,
            gamma_correction: true,
            gamma_value: Some(3.0),
            ..PixelParams::default()
        };

        let settings = params.configuration().validate().unwrap();
        assert_eq!(settings.pixel_type, PixelType::Ws2811);
        assert_eq!(settings.count, 24);
        assert_eq!(settings.order, ChannelOrder::Grb);
        assert_eq!(settings.low_code, 2);
        assert_eq!(settings.high_code, 5);
        assert_eq!(settings.global_brightness, 0x80);
        assert_eq!(settings.gamma_tenths, Some(30));
    }

    #[test]
    fn test_configuration_keeps_datasheet_on_bad_timing() {
        let params = PixelParams {
            low_code_us: Some(3.0),
            high_code_us: Some(0.05),
            ..PixelParams::default()
        };

        let settings = params.configuration().validate().unwrap();
        assert_eq!(settings.low_code, 2);
        assert_eq!(settings.high_code, 5);
    }

    #[test]
    fn test_configuration_gamma_fallback() {
        let params = PixelParams {
            gamma_correction: true,
            gamma_value: Some(9.9),
            ..PixelParams::default()
        };

        let settings = params.configuration().validate().unwrap();
        assert_eq!(settings.gamma_tenths, Some(22));
    }

    #[test]
    fn test_port_mapping_applies_record() {
        let mut params = PixelParams {
            count: 8,
            grouping_count: 2,
            active_ports: 4,
            dmx_start_address: 5,
            ..PixelParams::default()
        };
        params.start_universe[0] = 10;

        let settings = params.configuration().validate().unwrap();
        let mapping = params.port_mapping(&settings);

        assert_eq!(mapping.active_count(), 4);
        assert_eq!(mapping.ports[0].start_universe, 10);
        assert_eq!(mapping.ports[1].start_universe, 5);
        assert_eq!(mapping.ports[0].grouping, 2);
        assert_eq!(mapping.groups(0), 4);
        assert_eq!(mapping.dmx_start_address(), 5);
    }

    #[test]
    fn test_port_mapping_address_fallback() {
        let params = PixelParams {
            dmx_start_address: 500,
            ..PixelParams::default()
        };

        let settings = params.configuration().validate().unwrap();
        let mapping = params.port_mapping(&settings);
        assert_eq!(mapping.dmx_start_address(), 1);
    }
}
