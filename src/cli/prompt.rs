//! Terminal prompts.

use crate::core::auth::CredentialPrompter;
use crate::core::pipeline::RunMode;
use crate::core::session::Chooser;
use crate::{Error, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

/// Prompts on the controlling terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn select(&self, prompt: &str, options: &[String]) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact_opt()?
            .ok_or(Error::Cancelled)
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialPrompter for TerminalPrompter {
    fn username(&mut self) -> Result<String> {
        let username: String = Input::with_theme(&self.theme)
            .with_prompt("Plex.tv username")
            .interact_text()?;
        Ok(username)
    }

    fn password(&mut self, username: &str) -> Result<String> {
        let password = Password::with_theme(&self.theme)
            .with_prompt(format!("Plex.tv password for {}", username))
            .allow_empty_password(true)
            .interact()?;
        Ok(password)
    }

    fn two_factor_code(&mut self) -> Result<String> {
        let code: String = Input::with_theme(&self.theme)
            .with_prompt("2FA verification code")
            .interact_text()?;
        Ok(code)
    }
}

impl Chooser for TerminalPrompter {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.select(prompt, options)
    }

    fn choose_run_mode(&mut self) -> Result<RunMode> {
        let modes = vec![
            "Dry run (preview only, no changes)".to_string(),
            "Real run (actually update titles)".to_string(),
        ];
        if self.select("Run mode", &modes)? == 0 {
            return Ok(RunMode::DryRun);
        }

        let confirm: String = Input::with_theme(&self.theme)
            .with_prompt("Are you sure you want to update titles? (yes/no)")
            .interact_text()?;
        if confirm.trim().eq_ignore_ascii_case("yes") {
            Ok(RunMode::Apply)
        } else {
            println!("Real run not confirmed, continuing as a dry run.");
            Ok(RunMode::DryRun)
        }
    }
}
