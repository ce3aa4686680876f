use owo_colors::OwoColorize;
use pagegrade_core::ExtractedContent;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "Pagegrade".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Rate the readability, SEO and sentiment of web pages\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print elapsed time, colored by how long the provider took
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let secs = duration.as_secs_f64();
    let label = format!("{}:", label);
    if secs < 5.0 {
        eprintln!("  {} {:>6.2}s ({})", label.dimmed(), secs, "fast".dimmed());
    } else if secs < 15.0 {
        eprintln!("  {} {:>6.2}s ({})", label.dimmed(), secs, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>6.2}s ({})", label.dimmed(), secs, "slow".bright_red());
    }
}

/// Print a summary of the extracted sample
pub fn print_extraction_details(content: &ExtractedContent) {
    if !content.title.is_empty() {
        eprintln!("  {} {}", "Title:".dimmed(), content.title.bright_white());
    }
    if let Some(image) = &content.preview_image_url {
        eprintln!("  {} {}", "Image:".dimmed(), image.bright_white());
    }
    eprintln!("  {} {}", "Words:".dimmed(), content.word_count().to_string().bright_white());
    eprintln!("  {} {}\n", "Chars:".dimmed(), content.body_text.chars().count().to_string().bright_white());
}

/// Format byte size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
