//! Progress display module
//!
//! Styled progress bars and end-of-pass reports for the terminal.

use crate::stats::{AnalysisSnapshot, FilterSummary, SplitSummary};
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║   W O R D L I S T - S I E V E                         v1.0.0 ║
║   Streaming filter, analysis and sharding for wordlists      ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] \
             {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

fn rule() {
    println!("{}", "═".repeat(60).green());
}

fn banner_line(title: &str) {
    println!();
    rule();
    println!("{}", format!("{:^60}", title).green().bold());
    rule();
    println!();
}

/// Print the filter-mode summary
pub fn print_filter_summary(summary: &FilterSummary) {
    banner_line("FILTERING COMPLETE");

    println!("  {} {}", "Total entries:  ".green(), format_number(summary.total));
    println!(
        "  {} {} ({:.2}%)",
        "Kept:           ".green().bold(),
        format_number(summary.filtered).green().bold(),
        summary.filtered_percentage()
    );
    if summary.duplicates > 0 {
        println!("  {} {}", "Duplicates:     ".yellow(), format_number(summary.duplicates));
    }
    if summary.recovered > 0 {
        println!("  {} {}", "Re-decoded:     ".yellow(), format_number(summary.recovered));
    }

    let rejected: Vec<_> = summary.rejections.iter().filter(|(_, n)| *n > 0).collect();
    if !rejected.is_empty() {
        println!();
        println!("  {}", "Rejected by rule:".green());
        for (name, count) in rejected {
            print_bullet(&format!("{:<22} {}", name, format_number(count)));
        }
    }

    println!();
    println!("  {} {}", "Duration:       ".green(), format_duration(summary.elapsed));
    println!("  {} {:.0} entries/sec", "Throughput:     ".green(), summary.entries_per_second());
    println!("  {} {}", "Data read:      ".green(), ByteSize(summary.bytes_read));
    println!("  {} {:?}", "Output:         ".green(), summary.output);
    println!();
    rule();
}

/// Print the analyze-mode report
pub fn print_analysis(snapshot: &AnalysisSnapshot) {
    banner_line("ANALYSIS REPORT");

    println!("  {} {}", "Total entries:  ".green(), format_number(snapshot.total()));
    println!(
        "  {} {} ({:.2}%)",
        "Common entries: ".green(),
        format_number(snapshot.common_count()),
        snapshot.common_percentage()
    );
    println!(
        "  {} {} ({:.2}%)",
        "Weak patterns:  ".green(),
        format_number(snapshot.weak_pattern_count()),
        snapshot.weak_pattern_percentage()
    );
    if snapshot.recovered_count() > 0 {
        println!("  {} {}", "Re-decoded:     ".yellow(), format_number(snapshot.recovered_count()));
    }

    print_header("Length distribution");
    for (length, count) in snapshot.length_distribution() {
        print_bullet(&format!(
            "length {:>3}: {:>12} ({:.2}%)",
            length,
            format_number(*count),
            snapshot.share(*count)
        ));
    }

    print_header("Composition");
    for (bucket, count) in snapshot.composition_distribution().filter(|(_, n)| *n > 0) {
        print_bullet(&format!(
            "{:<16} {:>12} ({:.2}%)",
            bucket.as_str(),
            format_number(count),
            snapshot.share(count)
        ));
    }

    println!();
    rule();
}

/// Print the split-mode summary
pub fn print_split_summary(summary: &SplitSummary) {
    banner_line("SPLIT COMPLETE");

    println!("  {} {}", "Lines written:  ".green(), format_number(summary.total_lines));
    println!("  {} {}", "Data written:   ".green(), ByteSize(summary.bytes_written));
    println!("  {} {}", "Shards:         ".green(), summary.shard_count());
    println!("  {} {}", "Duration:       ".green(), format_duration(summary.elapsed));
    println!();
    for path in &summary.shards {
        print_bullet(&format!("{:?}", path));
    }
    println!();
    rule();
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
