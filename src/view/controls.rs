use super::{plain, Line, Screen};
use crate::{
    controls::{PincodeControl, SelectControl},
    flows::ResendControl,
};
use std::fmt;

/// Pincode cells grouped per block, e.g. `1 2 3   _ _ _`.
pub(crate) fn pincode(code: &PincodeControl) -> Line {
    let blocks: Vec<String> = code
        .blocks()
        .iter()
        .map(|block| {
            block
                .iter()
                .map(|cell| cell.map_or_else(|| "_".to_string(), |c| c.to_string()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    vec![plain(format!("Code: {}", blocks.join("   ")))]
}

/// Visible rows with one-based numbers, the selection marked with `*`.
pub(crate) fn select<T: fmt::Display>(screen: &mut Screen, select: &SelectControl<T>) {
    if select.is_searchable() && !select.query().is_empty() {
        screen.text(format!(
            "Search \"{}\": {} match(es)",
            select.query(),
            select.match_count()
        ));
    }

    let selected = select.selected_index();
    for (row, (index, option)) in select.visible_options().into_iter().enumerate() {
        let marker = if selected == Some(index) { '*' } else { ' ' };
        let mut line = vec![plain(format!("{marker} {:>2}. ", row + 1))];
        line.extend(select.highlight(&select.label(option)));
        screen.line(line);
    }

    if select.has_more() {
        let hidden = select.match_count() - select.visible_options().len();
        screen.text(format!("  ... {hidden} more (/more)"));
    }
}

pub(crate) fn resend(screen: &mut Screen, resend: ResendControl) {
    if resend.is_sending() {
        screen.text("Sending a new code...");
    } else if resend.countdown().is_running() {
        screen.text(format!(
            "You can request a new code in {}s.",
            resend.countdown().time()
        ));
    } else {
        screen.action("[/resend] send a new code");
    }
}
