use colored::Colorize;
use site_core::{AccessDecision, PresenceState};

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn info(msg: &str) {
    eprintln!("{} {}", "info:".blue().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn direction(allowed: bool) -> colored::ColoredString {
    if allowed {
        "allowed".green()
    } else {
        "denied".red()
    }
}

pub fn presence(state: PresenceState) -> colored::ColoredString {
    match state {
        PresenceState::In => "IN".green().bold(),
        PresenceState::Out => "OUT".yellow().bold(),
        PresenceState::Unknown => "UNKNOWN".dimmed()
    }
}

pub fn decision(decision: &AccessDecision) {
    match decision.error_message() {
        Some(message) => println!("  {} {}", "Invalid:".red().bold(), message),
        None if decision.valid => println!("  {}", "Valid".green().bold()),
        None => println!("  {}", "Invalid".red().bold())
    }
    println!("  {:<10} {}", "Entry:", direction(decision.allowed_in));
    println!("  {:<10} {}", "Exit:", direction(decision.allowed_out));

    for advisory in &decision.advisories {
        println!();
        println!("  {}", advisory.heading.bold());
        println!("  {}", advisory.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_core::{Advisory, DenialReason};

    #[test]
    fn test_decision_does_not_panic() {
        decision(&AccessDecision::client(
            true,
            false,
            vec![Advisory {
                heading: "Escort".to_string(),
                body: "Call security".to_string()
            }]
        ));
        decision(&AccessDecision::denied(DenialReason::ClosedCase));
    }

    #[test]
    fn test_presence_labels() {
        assert!(presence(PresenceState::In).to_string().contains("IN"));
        assert!(presence(PresenceState::Unknown).to_string().contains("UNKNOWN"));
    }

    #[test]
    fn test_messages_do_not_panic() {
        header("Header");
        info("info");
        error("error");
        success("success");
    }
}
