//! Terminal rendering for requests and dispatch results.

use colored::Colorize;
use volley_core::{DispatchMode, DispatchResult, Method, Payload, RequestDescriptor};

/// Print the request line, and its details when verbose, before sending.
pub fn print_request(descriptor: &RequestDescriptor, mode: &DispatchMode, verbose: bool) {
    let method_colored = match descriptor.method {
        Method::Get => "GET".green().bold(),
        Method::Post => "POST".yellow().bold(),
        Method::Put => "PUT".blue().bold(),
        Method::Patch => "PATCH".magenta().bold(),
        Method::Delete => "DELETE".red().bold(),
    };

    println!("{} {}", method_colored, descriptor.full_url().underline());

    if let DispatchMode::Relay { endpoint } = mode {
        println!("  {} {}", "via relay:".dimmed(), endpoint);
    }

    if verbose {
        for (k, v) in &descriptor.headers {
            println!("  {}: {}", k.dimmed(), v);
        }
        if let Some(ref b) = descriptor.body {
            println!("  {}", "Body:".dimmed());
            print_indented(b);
        }
    }
}

/// Print the normalized outcome of one dispatch.
pub fn print_result(result: &DispatchResult) {
    match result {
        DispatchResult::Success {
            status_code,
            status_text,
            payload,
        } => {
            let status_colored = if (200..300).contains(status_code) {
                format!("{}", status_code).green().bold()
            } else if (400..500).contains(status_code) {
                format!("{}", status_code).yellow().bold()
            } else if (500..600).contains(status_code) {
                format!("{}", status_code).red().bold()
            } else {
                format!("{}", status_code).white().bold()
            };

            println!("  {} {} {}", "Status:".dimmed(), status_colored, status_text);

            match payload {
                Payload::Json(value) => {
                    let pretty =
                        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                    println!("  {}", "Response Body:".dimmed());
                    for line in pretty.lines() {
                        println!("    {}", line);
                    }
                }
                Payload::Text(text) if text.is_empty() => {}
                Payload::Text(text) => {
                    println!("  {}", "Response Body (non-JSON):".dimmed());
                    // Limit output for very large responses
                    let max_lines = 50;
                    let lines: Vec<&str> = text.lines().collect();
                    for line in lines.iter().take(max_lines) {
                        println!("    {}", line);
                    }
                    if lines.len() > max_lines {
                        println!(
                            "    {}",
                            format!("... ({} more lines)", lines.len() - max_lines).dimmed()
                        );
                    }
                }
            }
        }
        DispatchResult::Failure { message } => {
            eprintln!("{} Request failed: {}", "✖".red().bold(), message);
        }
    }
}

fn print_indented(text: &str) {
    // Try to pretty-print JSON bodies
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string());
        for line in pretty.lines() {
            println!("    {}", line);
        }
    } else {
        for line in text.lines() {
            println!("    {}", line);
        }
    }
}
