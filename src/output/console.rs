//! Console output utilities.

use console::style;

use crate::cli::Answers;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Assignment Collector                              ║
║     Gather student submissions into one folder        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print what the run is about to do.
pub fn print_run_summary(answers: &Answers) {
    let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "(none)".to_string());

    println!();
    println!("{}", style("Collection:").bold());
    println!("  Source:     {}", answers.source.display());
    println!("  Assignment: {}", or_none(&answers.assignment));
    println!("  Output:     {}", answers.output.display());
    println!("  Prefix:     {}", or_none(&answers.prefix));
    println!("  Suffix:     {}", or_none(&answers.suffix));
    println!(
        "  Headers:    {}",
        if answers.stamp_headers { "stamp .docx" } else { "unchanged" }
    );
    println!();
}
