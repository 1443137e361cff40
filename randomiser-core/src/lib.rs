use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod data;
pub mod rng;
pub mod skills;
pub mod spoiler;

pub use data::{Finisher, GameData, LanguageData, MoveKind, NameTable, Skill, Status};
pub use skills::{RandomizationContext, SkillSettings};
pub use spoiler::{LogLevel, SpoilerLog};

/// Full configuration for one randomisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomiserSettings {
    pub seed: u64,
    pub skills: SkillSettings,
    /// Include per-record detail lines in the written spoiler log.
    pub verbose_log: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum RandomiserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RandomiserError>;

fn join_candidate(base: &Path, candidate: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in candidate.split(['/', '\\']) {
        if !part.is_empty() {
            path.push(part);
        }
    }
    path
}

fn find_first_existing(base: &Path, candidates: &[&str]) -> Option<PathBuf> {
    for candidate in candidates {
        let path = join_candidate(base, candidate);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load the game data and language tables from the input directory, apply
/// the enabled randomisation passes, and write the mutated data plus the
/// spoiler log into a per-seed output folder.
pub fn run(settings: RandomiserSettings) -> Result<()> {
    if !settings.input_path.exists() {
        return Err(RandomiserError::Config(format!(
            "Input path does not exist: {}",
            settings.input_path.display()
        )));
    }

    let keep_src = find_first_existing(
        &settings.input_path,
        &["keep_data.json", "data/keep_data.json"],
    )
    .ok_or_else(|| {
        RandomiserError::Config("Could not find keep_data.json under input path".to_string())
    })?;

    let lang_src = find_first_existing(
        &settings.input_path,
        &["language.json", "data/language.json"],
    )
    .ok_or_else(|| {
        RandomiserError::Config("Could not find language.json under input path".to_string())
    })?;

    let game_data: GameData = serde_json::from_str(&fs::read_to_string(&keep_src)?)?;
    let language: LanguageData = serde_json::from_str(&fs::read_to_string(&lang_src)?)?;

    // All outputs for a given run go into a per-seed subfolder so that
    // multiple runs do not collide.
    let out_root = settings
        .output_path
        .join(format!("Randomiser_{}", settings.seed));
    fs::create_dir_all(&out_root)?;

    let mut ctx = RandomizationContext::new(settings.seed, game_data, language);
    ctx.log.line(
        LogLevel::Always,
        format!("Skill randomiser seed: {}", settings.seed),
    );
    ctx.log.line(LogLevel::Always, "");

    settings.skills.randomize(&mut ctx);

    let keep_dest = out_root.join("keep_data.json");
    fs::write(&keep_dest, serde_json::to_string_pretty(&ctx.data)?)?;

    let lang_dest = out_root.join("language.json");
    fs::copy(&lang_src, &lang_dest)?;

    let log_path = out_root.join("spoiler_log.txt");
    fs::write(log_path, ctx.log.render(settings.verbose_log))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_candidate_splits_separators() {
        let path = join_candidate(Path::new("base"), "data/keep_data.json");
        assert_eq!(path, Path::new("base").join("data").join("keep_data.json"));
    }

    #[test]
    fn missing_input_path_is_a_config_error() {
        let settings = RandomiserSettings {
            seed: 1,
            skills: SkillSettings::default(),
            verbose_log: false,
            input_path: PathBuf::from("/nonexistent/randomiser-input"),
            output_path: PathBuf::from("/nonexistent/randomiser-output"),
        };
        match run(settings) {
            Err(RandomiserError::Config(msg)) => {
                assert!(msg.contains("Input path does not exist"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
