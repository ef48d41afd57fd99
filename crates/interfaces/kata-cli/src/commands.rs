use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use indicatif::{ProgressBar, ProgressStyle};
use kata_config::Config;
use kata_pipeline::{
    default_engine, HttpExerciseClient, LatestSubmission, LocalExerciseDir, RemoteExerciseClient,
    SaveSummary, SkipOutcome, SubmissionBuilder, SubmitOutcome,
};
use kata_scanner::Scanner;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn spinner(msg: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(msg);
    Ok(pb)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn remote(config: &Config) -> Result<HttpExerciseClient> {
    let client = kata_infra::default_http_client().context("Failed to build HTTP client")?;
    Ok(HttpExerciseClient::new(client, config))
}

/// Download a whole track, or just `exercises`, into the workspace.
pub async fn cmd_fetch(
    config: &Config,
    track: String,
    exercises: Vec<String>,
) -> Result<Vec<SaveSummary>> {
    println!(":: Fetching {}", track);
    println!("   Local: {}", config.dir);

    let client = kata_infra::default_http_client().context("Failed to build HTTP client")?;
    let engine = default_engine(client, config);

    let pb = spinner(if exercises.is_empty() {
        format!("Fetching all exercises for {track}")
    } else {
        format!("Fetching {}", exercises.join(", "))
    })?;
    let result = if exercises.is_empty() {
        engine.fetch_and_save(&track).await
    } else {
        engine.fetch_several_and_save(&track, &exercises).await
    };
    pb.finish_and_clear();
    let summaries = result?;

    println!("\n:: Saved {} exercise(s)", summaries.len());
    for s in &summaries {
        println!("   {}", s.problem);
        if !s.new.is_empty() {
            println!("     new:       {}", s.new.join(", "));
        }
        if !s.unchanged.is_empty() {
            println!("     unchanged: {}", s.unchanged.join(", "));
        }
    }

    Ok(summaries)
}

pub async fn cmd_submit(config: &Config, file: Utf8PathBuf) -> Result<SubmitOutcome> {
    let config = crate::with_absolute_root(config)?;
    let file = crate::absolute(&file)?;

    let submitter = SubmissionBuilder::new(Arc::new(remote(&config)?), &config);
    let outcome = submitter.build_and_submit(&file).await?;
    print_json(&outcome)?;
    Ok(outcome)
}

pub async fn cmd_skip(config: &Config, track: String, exercise: String) -> Result<SkipOutcome> {
    let outcome = remote(config)?.skip(&track, &exercise).await?;
    print_json(&outcome)?;
    Ok(outcome)
}

pub async fn cmd_status(config: &Config, track: String) -> Result<serde_json::Value> {
    let status = remote(config)?.status(&track).await?;
    print_json(&status)?;
    Ok(status)
}

pub async fn cmd_latest(
    config: &Config,
    track: String,
    exercise: String,
) -> Result<LatestSubmission> {
    let latest = remote(config)?.latest_submission(&track, &exercise).await?;
    print_json(&latest)?;
    Ok(latest)
}

/// List checked-out exercises of `track` among `slugs`. No network access.
pub fn cmd_local(config: &Config, track: String, slugs: Vec<String>) -> Result<Vec<LocalExerciseDir>> {
    let valid: HashSet<String> = slugs.into_iter().collect();
    let local = Scanner::local_exercises(&config.dir, &track, &valid)?;
    print_json(&local)?;
    Ok(local)
}
