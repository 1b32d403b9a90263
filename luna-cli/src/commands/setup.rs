//! Setup command - first-time profile or cycle info update

use anyhow::{bail, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use luna_core::domain::profile::{CYCLE_LENGTH_DEFAULT, CYCLE_LENGTH_PRESETS};
use luna_core::services::{EntryPoint, LogEvent, SessionGate};
use luna_core::{ProfileInput, Screen, SetupMode};

use super::{command_failed, get_context, get_logger, log_event, today};
use crate::output;

pub async fn run(last_period: Option<NaiveDate>, cycle_length: Option<u32>) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    log_event(&logger, LogEvent::new("command_executed").with_command("setup"));

    let ctx = get_context()?;
    let mut gate = ctx.session_gate();

    match gate.screen() {
        Screen::Welcome => {
            print_welcome();
            gate.acknowledge_welcome();
        }
        Screen::MainApp => {
            gate.request_cycle_update();
        }
        Screen::ProfileSetup(_) => {}
    }
    let Screen::ProfileSetup(mode) = gate.screen() else {
        bail!("Profile setup is not available right now.");
    };

    let today = today();
    let input = match (last_period, cycle_length) {
        (Some(last_period), Some(length)) => ProfileInput::new(last_period, length),
        _ => {
            let suggested = ProfileInput::suggested(today);
            match prompt_profile(
                mode,
                ProfileInput::new(
                    last_period.unwrap_or(suggested.last_period),
                    cycle_length.unwrap_or(suggested.avg_cycle_length),
                ),
            )? {
                Some(input) => input,
                None => {
                    gate.cancel_update();
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    save(&mut gate, input, today)
        .await
        .map_err(|e| command_failed(&logger, "setup", e))?;
    log_event(
        &logger,
        LogEvent::new("profile_saved").with_screen(Screen::ProfileSetup(mode).name()),
    );
    Ok(())
}

/// Save through the gate and report the outcome
pub async fn save(
    gate: &mut SessionGate,
    input: ProfileInput,
    today: NaiveDate,
) -> luna_core::domain::result::Result<Screen> {
    let screen = output::with_spinner("Saving...", false, gate.save_profile(input, today)).await?;
    match screen {
        Screen::MainApp => output::success("Profile saved. You're all set."),
        Screen::Welcome => output::warning("Your session ended while saving."),
        Screen::ProfileSetup(_) => {}
    }
    Ok(screen)
}

pub fn print_welcome() {
    println!("{}", "Welcome to Luna".magenta().bold());
    println!("Track your cycle, log symptoms and see what's coming.");
    println!("Your predictions improve as you log more periods.");
    println!();
}

/// Ask for the last period start and cycle length
///
/// Returns `None` if the user backs out of an update.
pub fn prompt_profile(mode: SetupMode, defaults: ProfileInput) -> Result<Option<ProfileInput>> {
    let title = match mode {
        SetupMode::Onboarding => "Set up your profile",
        SetupMode::UpdateCycleInfo => "Update cycle info",
    };
    println!("{}", title.bold());

    let last_period: NaiveDate = Input::new()
        .with_prompt("First day of your last period (YYYY-MM-DD)")
        .default(defaults.last_period)
        .interact_text()?;

    let mut choices: Vec<String> = CYCLE_LENGTH_PRESETS
        .iter()
        .map(|days| format!("{} days", days))
        .collect();
    choices.push("Other...".to_string());

    let preset_index = CYCLE_LENGTH_PRESETS
        .iter()
        .position(|days| *days == defaults.avg_cycle_length)
        .unwrap_or(choices.len() - 1);

    let picked = Select::new()
        .with_prompt("Average cycle length")
        .items(&choices)
        .default(preset_index)
        .interact()?;

    let avg_cycle_length = match CYCLE_LENGTH_PRESETS.get(picked) {
        Some(days) => *days,
        None => Input::new()
            .with_prompt("Cycle length in days")
            .default(if defaults.avg_cycle_length == 0 {
                CYCLE_LENGTH_DEFAULT
            } else {
                defaults.avg_cycle_length
            })
            .interact_text()?,
    };

    if mode == SetupMode::UpdateCycleInfo
        && !Confirm::new()
            .with_prompt("Save these changes?")
            .default(true)
            .interact()?
    {
        return Ok(None);
    }

    Ok(Some(ProfileInput::new(last_period, avg_cycle_length)))
}
