use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Asks a yes/no question (default: no). `assume_yes` answers it without prompting.
pub fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        log::info!("{} (assumed yes)", prompt);
        return Ok(true);
    }
    Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(false)
        .interact()
}
