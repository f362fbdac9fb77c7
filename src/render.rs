//! Plain-text rendering of the settings screen.

use crate::config::OperatorConfig;
use crate::settings::{Plan, Settings};
use std::fmt::Write;

const HELP_ADDRESS: &str = "dominik@peerdraft.app";

/// Renders the settings screen for a terminal.
pub fn render_settings(settings: &Settings, operator: &OperatorConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# What's your name?");
    if settings.name.is_empty() {
        let _ = writeln!(out, "Name: (not set)");
    } else {
        let _ = writeln!(out, "Name: {}", settings.name);
    }
    let _ = writeln!(out, "This name will be shown to your collaborators.");
    let _ = writeln!(out);

    let _ = writeln!(out, "# Your subscription");
    match &settings.plan {
        Plan::Hobby { .. } => {
            let _ = writeln!(
                out,
                "You are on the free Hobby plan. You can collaborate with your peers for up to \
                 2.5 hours a month. For unlimited collaboration time, sign-up for the \
                 Professional plan at 30 USD/year."
            );
            let _ = writeln!(out, "{}", usage_line(settings.duration));
            let _ = writeln!(out, "Buy professional plan: {}", operator.checkout_link(&settings.oid));
            let _ = writeln!(
                out,
                "Already subscribed? Run `peerdraft connect <EMAIL>` with the address of your subscription."
            );
        }
        Plan::Professional { email } => {
            let _ = writeln!(
                out,
                "You are on the professional plan for unlimited collaboration. Happy peerdrafting."
            );
            if let Some(email) = email.as_deref().filter(|email| !email.is_empty()) {
                let _ = writeln!(out, "Connected with: {}", email);
            }
            let _ = writeln!(out, "{}", usage_line(settings.duration));
        }
    }
    let _ = writeln!(
        out,
        "Just subscribed or connected your license? Run `peerdraft refresh`."
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "# Help");
    let _ = writeln!(out, "If you need any help, get in touch: {}", HELP_ADDRESS);

    out
}

fn usage_line(duration: f64) -> String {
    format!("You have used Peerdraft for {} minutes so far.", duration)
}
