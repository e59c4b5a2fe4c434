use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Timestamped stderr logging, Info by default, RUST_LOG overrides.
pub fn init() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();
}
