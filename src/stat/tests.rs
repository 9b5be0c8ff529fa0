use {
    super::*,
    crate::source::{KernelFile, MockFile},
};

mod cpu_time_parse_tests {
    use super::*;

    // examples provided in the `proc_stat(5)` man page.
    const EXAMPLE_1: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195 0 175628 0";
    const EXAMPLE_2: &str = "cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0";

    #[test]
    fn example_1() {
        let time = EXAMPLE_1.parse::<CpuTime>().unwrap();
        assert_eq!(time.user, UserHz::new(10132153));
        assert_eq!(time.nice, UserHz::new(290696));
        assert_eq!(time.system, UserHz::new(3084719));
        assert_eq!(time.idle, UserHz::new(46828483));
    }

    #[test]
    fn per_cpu_line_is_not_the_aggregate() {
        let err = EXAMPLE_2.parse::<CpuTime>().unwrap_err();
        match err {
            StatParseError::UnrecognizedEntry { kind } if kind == "cpu0" => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// the kernel pads the aggregate label with two spaces.
    #[test]
    fn double_space() {
        const ENTRY: &str = "cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0\n";
        let _ = ENTRY.parse::<CpuTime>().unwrap();
    }

    /// older kernels report only the first four columns.
    #[test]
    fn four_columns() {
        let time = "cpu 1 2 3 4".parse::<CpuTime>().unwrap();
        assert_eq!(time.idle, UserHz::new(4));
    }

    #[test]
    fn too_few_columns() {
        let err = "cpu 1 2 3".parse::<CpuTime>().unwrap_err();
        assert_eq!(err, StatParseError::CpuTime { found: 3 });
    }

    #[test]
    fn too_many_columns() {
        const ENTRY: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195 0 175628 0 0";
        let err = ENTRY.parse::<CpuTime>().unwrap_err();
        assert_eq!(err, StatParseError::CpuTime { found: 11 });
    }

    #[test]
    fn bad_time() {
        let err = "cpu 1 2 x 4".parse::<CpuTime>().unwrap_err();
        assert!(matches!(err, StatParseError::UserHzParse(_)));
    }

    #[test]
    fn bad_entry_kind() {
        let err = "intr 1462898".parse::<CpuTime>().unwrap_err();
        assert!(matches!(err, StatParseError::UnrecognizedEntry { .. }));
    }

    #[test]
    fn empty() {
        assert_eq!("".parse::<CpuTime>().unwrap_err(), StatParseError::Empty);
    }

    #[test]
    fn big() {
        let time = "cpu  5000000000 5000000000 5000000000 5000000000"
            .parse::<CpuTime>()
            .unwrap();
        assert_eq!(time.user, UserHz::new(5_000_000_000));
    }
}

mod measurement_tests {
    use super::*;

    fn time(user: u64, nice: u64, system: u64, idle: u64) -> CpuTime {
        CpuTime {
            user: UserHz::new(user),
            nice: UserHz::new(nice),
            system: UserHz::new(system),
            idle: UserHz::new(idle),
        }
    }

    #[test]
    fn busy_over_total() {
        // 30 busy ticks (user + system) out of 100.
        let a = time(100, 50, 100, 800);
        let b = time(120, 90, 110, 870);
        let percent = Measurement::new(a, b).percentage().unwrap();
        assert!((percent - 30.0).abs() < 1e-9, "{percent}");
    }

    #[test]
    fn nice_is_not_counted() {
        let a = time(0, 0, 0, 0);
        let b = time(0, 500, 0, 100);
        assert_eq!(Measurement::new(a, b).percentage(), Some(0.0));
    }

    #[test]
    fn fully_busy() {
        let a = time(10, 0, 10, 10);
        let b = time(60, 0, 60, 10);
        assert_eq!(Measurement::new(a, b).percentage(), Some(100.0));
    }

    #[test]
    fn no_elapsed_time() {
        let a = time(10, 0, 10, 10);
        assert_eq!(Measurement::new(a, a).percentage(), None);
    }

    #[test]
    fn counter_reset_saturates() {
        let a = time(100, 0, 100, 100);
        let b = time(10, 0, 10, 200);
        assert_eq!(Measurement::new(a, b).percentage(), Some(0.0));
    }
}

mod read_tests {
    use {super::*, std::io::Write};

    #[test]
    fn reads_only_the_first_line() {
        let source = MockFile::new(["cpu 1 2 3 4 5 6 7 8 9 10\ncpu0 garbage\nintr 12\n"]);
        let time = read(&source).unwrap();
        assert_eq!(time.system, UserHz::new(3));
    }

    #[test]
    fn missing_source() {
        let source = MockFile::default();
        assert!(matches!(read(&source), Err(StatReadError::Io(_))));
    }

    #[test]
    fn malformed_source() {
        let source = MockFile::new(["page 5741 1808\n"]);
        assert!(matches!(read(&source), Err(StatReadError::Entry(_))));
    }

    #[test]
    fn kernel_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cpu  4705 356 584 3699 23 23 0 0 0 0").unwrap();
        let source = KernelFile::new(file.path());
        assert_eq!(read(&source).unwrap().idle, UserHz::new(3699));
    }
}
