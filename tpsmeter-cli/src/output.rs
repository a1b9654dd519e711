//! Terminal output for the form and the run command.
//!
//! Every printer has a `_to` variant taking a writer so the formatting can be
//! tested without a terminal.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use dialoguer::console::style;
use futures_util::StreamExt;
use tpsmeter_models::session::{PartialResult, SessionEvent, SessionStream, StreamingResult};

const HEADER_WIDTH: usize = 60;

/// Draws a boxed header with the given title.
pub fn print_header(title: &str) {
    let _ = print_header_to(&mut io::stdout(), title);
}

/// Draws a boxed header to a writer (for testing).
pub fn print_header_to<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    let border = "─".repeat(HEADER_WIDTH);
    writeln!(w, "┌{}┐", border)?;
    writeln!(w, "│ {:<width$} │", title, width = HEADER_WIDTH - 2)?;
    writeln!(w, "└{}┘", border)?;
    writeln!(w)?;
    Ok(())
}

/// Prints a section heading.
pub fn print_section(title: &str) {
    println!("\n{}", style(title).bold());
}

/// Prints a success message with a green checkmark.
pub fn print_success_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(
        w,
        "\n{} {}",
        style("✓").green().bold(),
        style(message).green()
    )
}

/// Prints an error message with a red X.
pub fn print_error(message: &str) {
    let _ = print_error_to(&mut io::stderr(), message);
}

/// Prints an error message to a writer (for testing).
pub fn print_error_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("✗").red().bold(), style(message).red())
}

/// Format a throughput value with two decimals.
pub fn format_tps(tps: Option<f64>) -> String {
    match tps {
        Some(tps) => format!("{tps:.2}"),
        None => "n/a".to_string(),
    }
}

/// Format elapsed time as seconds with two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn metrics_table(rows: Vec<(&str, String)>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table
}

/// Metrics for a completed run.
pub fn completed_table(result: &StreamingResult) -> Table {
    metrics_table(vec![
        (
            "Tokens Per Second (TPS)",
            format_tps(result.tokens_per_second),
        ),
        ("Total Tokens", result.token_count.to_string()),
        ("Time Elapsed", format_elapsed(result.elapsed)),
    ])
}

/// Metrics for a cancelled run, labelled as partial.
pub fn partial_table(partial: &PartialResult) -> Table {
    metrics_table(vec![
        (
            "Partial TPS",
            format_tps(partial.partial_tokens_per_second),
        ),
        ("Tokens So Far", partial.token_count.to_string()),
        (
            "Chunks",
            format!(
                "{}/{}",
                partial.completed_iterations, partial.total_iterations
            ),
        ),
        ("Time Elapsed", format_elapsed(partial.elapsed)),
    ])
}

/// Drive a session stream to its end.
///
/// With a writer, chunks are printed as they arrive followed by a metrics
/// table. Without one the stream is drained silently. Returns the terminal
/// event.
pub async fn drive_stream<W: Write>(
    mut stream: SessionStream,
    mut out: Option<&mut W>,
) -> Result<SessionEvent> {
    while let Some(event) = stream.next().await {
        if let Some(w) = out.as_deref_mut() {
            render_event(w, &event)?;
        }
        if event.is_terminal() {
            return Ok(event);
        }
    }
    bail!("session stream ended without a result")
}

/// Render a single event.
pub fn render_event<W: Write>(w: &mut W, event: &SessionEvent) -> io::Result<()> {
    match event {
        SessionEvent::Thinking { text } => {
            writeln!(w, "{}", style("Model Thinking Process").dim().bold())?;
            writeln!(w, "  {}", style(text).dim())?;
            writeln!(w)?;
        }
        SessionEvent::Snapshot(snapshot) => {
            write!(w, "{}", snapshot.chunk)?;
            w.flush()?;
        }
        SessionEvent::Completed(result) => {
            writeln!(w)?;
            print_success_to(w, "Response complete!")?;
            writeln!(w, "{}", completed_table(result))?;
        }
        SessionEvent::Cancelled(partial) => {
            writeln!(w)?;
            writeln!(w)?;
            print_error_to(
                w,
                &format!(
                    "Cancelled after {} of {} chunks",
                    partial.completed_iterations, partial.total_iterations
                ),
            )?;
            writeln!(w, "{}", partial_table(partial))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpsmeter_models::session::{FRAGMENT_A, Snapshot};

    #[test]
    fn print_header_draws_box_with_title() {
        let mut output = Vec::new();
        print_header_to(&mut output, "LLM TPS Counter").unwrap();
        let result = String::from_utf8(output).unwrap();

        assert!(result.contains("┌"), "Missing top-left corner");
        assert!(result.contains("┘"), "Missing bottom-right corner");
        assert!(result.contains("LLM TPS Counter"), "Missing title");

        let border_line = result.lines().next().unwrap();
        assert_eq!(
            border_line.chars().filter(|&c| c == '─').count(),
            HEADER_WIDTH
        );
    }

    #[test]
    fn print_error_shows_red_x() {
        let mut output = Vec::new();
        print_error_to(&mut output, "Please provide Anthropic Api Key").unwrap();
        let result = String::from_utf8(output).unwrap();

        assert!(result.contains('✗'));
        assert!(result.contains("Please provide Anthropic Api Key"));
        assert!(result.ends_with('\n'));
    }

    #[test]
    fn format_tps_two_decimals() {
        assert_eq!(format_tps(Some(27.9876)), "27.99");
        assert_eq!(format_tps(None), "n/a");
    }

    #[test]
    fn format_elapsed_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(5012)), "5.01s");
        assert_eq!(format_elapsed(Duration::ZERO), "0.00s");
    }

    #[test]
    fn completed_table_lists_all_metrics() {
        let table = completed_table(&StreamingResult {
            text: String::new(),
            token_count: 140,
            elapsed: Duration::from_secs(5),
            tokens_per_second: Some(28.0),
        })
        .to_string();

        assert!(table.contains("Tokens Per Second (TPS)"));
        assert!(table.contains("28.00"));
        assert!(table.contains("Total Tokens"));
        assert!(table.contains("140"));
        assert!(table.contains("5.00s"));
    }

    #[test]
    fn partial_table_is_marked_partial() {
        let table = partial_table(&PartialResult {
            text: String::new(),
            token_count: 10,
            completed_iterations: 3,
            total_iterations: 50,
            elapsed: Duration::from_millis(300),
            partial_tokens_per_second: Some(33.3),
        })
        .to_string();

        assert!(table.contains("Partial TPS"));
        assert!(table.contains("3/50"));
    }

    #[test]
    fn snapshot_renders_only_new_chunk() {
        let mut output = Vec::new();
        let event = SessionEvent::Snapshot(Snapshot {
            iteration: 1,
            total: 50,
            chunk: "More content... ",
            text: format!("{FRAGMENT_A}More content... "),
            token_count: 8,
        });
        render_event(&mut output, &event).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "More content... ");
    }
}
