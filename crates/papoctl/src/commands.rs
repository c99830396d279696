//! Command implementations for papoctl

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use papo_shared::achievements::{format_achievement_unlock, level_reached};
use papo_shared::intent::Action;
use papo_shared::{apply_xp, extract, resolve, ProgressSnapshot, XpOutcome};
use serde_json::{json, Value};

pub fn name(transcript: &str, as_json: bool) -> Result<()> {
    let name = extract(transcript);
    if as_json {
        println!("{}", json!({ "transcript": transcript, "name": name }));
    } else {
        println!("{} {}", "Nome:".bold(), name.green());
    }
    Ok(())
}

pub fn intent(text: &str, as_json: bool) -> Result<()> {
    let intent = resolve(text);
    let response = intent.response();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{} {}", "Intent:".bold(), format!("{:?}", intent).cyan());
    println!("{} {}", "Reply: ".bold(), response.reply);
    if let Some(action) = &response.action {
        println!("{} {}", "Action:".bold(), describe_action(action));
    }
    Ok(())
}

pub fn xp(current: ProgressSnapshot, amount: i64, as_json: bool) -> Result<()> {
    let outcome = apply_xp(current, amount).context("cannot apply XP")?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_xp(&current, amount, &outcome));
    }
    Ok(())
}

pub async fn status(url: &str, as_json: bool) -> Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let health: Value = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("papod not reachable at {}", url))?
        .error_for_status()?
        .json()
        .await
        .context("invalid health response")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    println!(
        "{} papod v{}  up {}s  {} users",
        "[ok]".green(),
        health["version"].as_str().unwrap_or("?"),
        health["uptime_seconds"].as_u64().unwrap_or(0),
        health["users"].as_u64().unwrap_or(0)
    );
    Ok(())
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::Navigate { target } => format!("navigate -> {}", target),
        Action::Dialog { content } => format!("dialog {}", content),
    }
}

fn format_snapshot(s: &ProgressSnapshot) -> String {
    format!(
        "Level {}  {}/{} XP ({}%)",
        s.level,
        s.xp,
        s.next_level_xp,
        s.progress_percent()
    )
}

fn render_xp(current: &ProgressSnapshot, amount: i64, outcome: &XpOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("Before: {}\n", format_snapshot(current)));
    out.push_str(&format!("+{} XP\n", amount));
    out.push_str(&format!("After:  {}\n", format_snapshot(&outcome.snapshot)));

    let now = Utc::now();
    for event in &outcome.level_ups {
        out.push_str(&format!("  {}\n", format_achievement_unlock(&level_reached(event.new_level, now))));
    }
    out
}
