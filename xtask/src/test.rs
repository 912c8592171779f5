use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        suite("Unit tests", &["test", "--lib", "--workspace"], true)?;
    }

    if !unit_only {
        // Scenario, startup and proptest suites under each crate's tests/.
        suite("Integration tests", &["test", "--tests", "--workspace"], true)?;
    }

    suite("Doc tests", &["test", "--doc", "--workspace"], false)?;

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn suite(label: &str, args: &[&str], required: bool) -> Result<()> {
    println!("{}", format!("  Running {}...", label.to_lowercase()).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {}", label.to_lowercase()))?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ {} passed {} in {:.2}s",
                label,
                extract_test_summary(&stdout),
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else if required {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        anyhow::bail!("{label} failed");
    } else {
        eprintln!("{}", format!("  ⚠ {label} failed").yellow().bold());
    }
    println!();
    Ok(())
}

/// Totals across every `test result:` line cargo printed.
fn extract_test_summary(output: &str) -> String {
    let mut passed = 0u64;
    let mut failed = 0u64;
    let mut found = false;
    for line in output.lines() {
        // "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out"
        let Some(summary) = line.split("test result:").nth(1) else {
            continue;
        };
        found = true;
        for part in summary.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u64>() else {
                continue;
            };
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }
    if found {
        format!("({passed} passed; {failed} failed)")
    } else {
        "(summary not available)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::extract_test_summary;

    #[test]
    fn summary_adds_up_every_binary() {
        let out = "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out\n\
                   running 3 tests\n\
                   test result: ok. 3 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out\n";
        assert_eq!(extract_test_summary(out), "(8 passed; 1 failed)");
    }

    #[test]
    fn missing_summary_is_reported() {
        assert_eq!(extract_test_summary("error: could not compile"), "(summary not available)");
    }
}
