use clap::Parser;
use rand::Rng;
use std::path::{Path, PathBuf};

use randomiser_core::{run, RandomiserSettings, SkillSettings};

#[derive(Debug, Parser)]
#[command(name = "skill-randomiser", version, about = "Skill and finisher randomiser tool")]
struct Args {
    /// Directory containing keep_data.json and language.json.
    #[arg(long)]
    input: PathBuf,

    /// Directory to write the per-seed output folder into.
    #[arg(long)]
    output: PathBuf,

    /// Run seed; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Preset file holding a saved settings map; individual switches below
    /// are OR-ed on top of it.
    #[arg(long, value_name = "JSON")]
    preset: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    randomize_mp_cost: bool,

    #[arg(long, default_value_t = false)]
    randomize_cooldown: bool,

    #[arg(long, default_value_t = false)]
    randomize_learn_rate: bool,

    #[arg(long, default_value_t = false)]
    randomize_damage: bool,

    #[arg(long, default_value_t = false)]
    randomize_status: bool,

    #[arg(long, default_value_t = false)]
    randomize_status_chance: bool,

    /// Randomise finisher moves. Uses the damage and status switches for
    /// its power and status halves.
    #[arg(long, default_value_t = false)]
    randomize_finisher: bool,

    /// Include per-record detail lines in spoiler_log.txt.
    #[arg(long, default_value_t = false)]
    verbose_log: bool,
}

fn load_preset(path: &Path) -> SkillSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read preset {:?}: {}", path, e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(map)) => SkillSettings::from_map(&map),
        Ok(_) => {
            eprintln!("Preset {:?} is not a JSON object", path);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to parse preset {:?}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut skills = args
        .preset
        .as_deref()
        .map(load_preset)
        .unwrap_or_default();

    skills.randomize_mp_cost |= args.randomize_mp_cost;
    skills.randomize_cooldown |= args.randomize_cooldown;
    skills.randomize_learn_rate |= args.randomize_learn_rate;
    skills.randomize_damage |= args.randomize_damage;
    skills.randomize_status |= args.randomize_status;
    skills.randomize_status_chance |= args.randomize_status_chance;
    skills.randomize_finisher |= args.randomize_finisher;

    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());

    let settings = RandomiserSettings {
        seed,
        skills,
        verbose_log: args.verbose_log,
        input_path: args.input,
        output_path: args.output,
    };

    println!("Running skill randomiser with seed {}", seed);

    if let Err(err) = run(settings) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
