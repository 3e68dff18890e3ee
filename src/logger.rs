use chrono::Local;
use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, Record};
use std::io::Write;

/// Logs go to stderr so stdout stays free for the JSON update stream.
pub fn init_logger(log_level: &str) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));
    builder.format(format_log);
    builder.target(env_logger::Target::Stderr);
    builder.init();
}

fn format_log(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let level = match record.level() {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".cyan(),
        Level::Debug => "DEBUG".purple(),
        Level::Trace => "TRACE".dimmed(),
    };

    writeln!(
        buf,
        "{} {:>5} {} {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        format!("{}:", module_label(record.target())).dimmed(),
        record.args()
    )
}

/// `trip_wizard::wizard::intent` is logged as `wizard::intent`.
fn module_label(target: &str) -> &str {
    target
        .strip_prefix("trip_wizard::")
        .unwrap_or(target)
}

pub fn print_banner(catalog_source: &str) {
    let border = "=".repeat(60);
    eprintln!("{}", border.purple());
    eprintln!("{}", "  Trip wizard".truecolor(63, 156, 255).bold());
    eprintln!("{}", format!("   - Catalog: {}", catalog_source).cyan());
    eprintln!("{}", "   - One JSON intent per line, updates are printed as JSON".cyan());
    eprintln!("{}", border.purple());
}
