use super::Screen;
use crate::{flows::security::SecurityOverview, identity::ProviderKind};

#[must_use]
pub fn screen(overview: &SecurityOverview) -> Screen {
    let mut screen = Screen::new("overview", "Two-factor authentication");

    if overview.is_stale() {
        screen.error(Some("This overview may be out of date."));
    }

    screen.text(if overview.required() {
        "Two-factor authentication is required for this account."
    } else {
        "Two-factor authentication is optional for this account."
    });
    screen.blank();

    for row in overview.rows() {
        let status = match &row.active {
            Some(active) => {
                let mut parts = vec!["active".to_string()];
                if row.provider_type.kind == ProviderKind::Phone {
                    parts.extend(active.phone.clone());
                }
                if let Some(created) = &active.created_at {
                    parts.push(format!("since {created}"));
                }
                parts.push(format!("[{}]", active.uuid));
                parts.join(" ")
            }
            None => "not set up".to_string(),
        };
        screen.text(format!("{:<20} {status}", row.provider_type.title));
    }

    let areas = overview.restricted_areas();
    if !areas.is_empty() {
        screen.blank();
        screen.text("Protected by a second factor:");
        for area in areas {
            screen.text(format!("  - {}", area.label()));
        }
    }

    screen.blank();
    screen.text(format!(
        "Remember this IP address: {}{}",
        if overview.remember_ip() { "on" } else { "off" },
        if overview.can_update_remember_ip() {
            ""
        } else {
            " (locked for this client)"
        }
    ));

    screen
}
