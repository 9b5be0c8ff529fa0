use {
    chrono::Local,
    log::LevelFilter,
    std::io::Write,
};

/// installs the logger, writing to stderr so it never mixes with a stdout sink.
///
/// `RUST_LOG`, when set, takes precedence over the verbosity flags.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{:<5}{style:#} {} {}: {}",
                record.level(),
                Local::now().format("%H:%M:%S%.3f"),
                record.target(),
                record.args(),
            )
        })
        .init();
}
