use rand::{rngs::StdRng, Rng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::{GameData, LanguageData, MoveKind, Status};
use crate::rng::stream_rng;
use crate::spoiler::{float_line, int_line, string_line, LogLevel, SpoilerLog};

/// Everything one randomisation run reads and mutates: the run seed, the
/// game data being rewritten in place, the name tables for spoiler-log
/// display, and the log itself.
pub struct RandomizationContext {
    pub seed: u64,
    pub data: GameData,
    pub names: LanguageData,
    pub log: SpoilerLog,
}

impl RandomizationContext {
    pub fn new(seed: u64, data: GameData, names: LanguageData) -> Self {
        Self {
            seed,
            data,
            names,
            log: SpoilerLog::default(),
        }
    }

    /// Generator for one transformation's stream, derived from the run seed
    /// and the stream label.
    pub fn rng(&self, label: &str) -> StdRng {
        stream_rng(self.seed, label)
    }
}

/// Per-feature enable flags for the skill/finisher randomisation passes.
///
/// The finisher pass deliberately reuses `randomize_damage` and
/// `randomize_status` for its power and status halves instead of carrying
/// flags of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSettings {
    #[serde(rename = "randomizeMPCosts")]
    pub randomize_mp_cost: bool,
    #[serde(rename = "randomizeCooldown")]
    pub randomize_cooldown: bool,
    #[serde(rename = "randomizeLearnRate")]
    pub randomize_learn_rate: bool,
    #[serde(rename = "randomizeDamage")]
    pub randomize_damage: bool,
    #[serde(rename = "randomizeStatus")]
    pub randomize_status: bool,
    #[serde(rename = "randomizeStatusChance")]
    pub randomize_status_chance: bool,
    #[serde(rename = "randomizeFinisher")]
    pub randomize_finisher: bool,
}

fn map_flag(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl SkillSettings {
    /// Load from a generic string-keyed settings map. Accepts booleans and
    /// stringified booleans; missing or malformed values fall back to false.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            randomize_mp_cost: map_flag(map, "randomizeMPCosts"),
            randomize_cooldown: map_flag(map, "randomizeCooldown"),
            randomize_learn_rate: map_flag(map, "randomizeLearnRate"),
            randomize_damage: map_flag(map, "randomizeDamage"),
            randomize_status: map_flag(map, "randomizeStatus"),
            randomize_status_chance: map_flag(map, "randomizeStatusChance"),
            randomize_finisher: map_flag(map, "randomizeFinisher"),
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("randomizeMPCosts".into(), Value::Bool(self.randomize_mp_cost));
        map.insert("randomizeCooldown".into(), Value::Bool(self.randomize_cooldown));
        map.insert("randomizeLearnRate".into(), Value::Bool(self.randomize_learn_rate));
        map.insert("randomizeDamage".into(), Value::Bool(self.randomize_damage));
        map.insert("randomizeStatus".into(), Value::Bool(self.randomize_status));
        map.insert(
            "randomizeStatusChance".into(),
            Value::Bool(self.randomize_status_chance),
        );
        map.insert("randomizeFinisher".into(), Value::Bool(self.randomize_finisher));
        map
    }

    /// Run every enabled pass, in fixed order, against the context. Each
    /// pass draws from its own label-derived stream, so the enabled subset
    /// never changes what another pass generates.
    pub fn randomize(&self, ctx: &mut RandomizationContext) {
        if self.randomize_mp_cost {
            randomize_mp_cost(ctx);
        }
        if self.randomize_cooldown {
            randomize_cooldown(ctx);
        }
        if self.randomize_learn_rate {
            randomize_learn_rate(ctx);
        }
        if self.randomize_damage {
            randomize_damage(ctx);
        }
        if self.randomize_status {
            randomize_status(ctx);
        }
        if self.randomize_status_chance {
            randomize_status_chance(ctx);
        }
        if self.randomize_finisher {
            randomize_finisher(self, ctx);
        }
    }
}

fn randomize_mp_cost(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("MPCost");

    ctx.log.line(LogLevel::Always, "Randomizing MP Cost...");

    // Parameters are compile-time constants, so construction cannot fail.
    let gaussian = Normal::new(250.0_f64, 150.0_f64).expect("finite distribution parameters");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        let mut val = gaussian.sample(&mut rng) as i32;
        // Out-of-band draws are always replaced; in-band draws below the
        // mean additionally risk replacement with probability
        // (500 - val) / 3000. The short-circuit matters: the tie-break
        // draw is only consumed when the value is already in band.
        if val < 5 || val > 995 || rng.gen::<f64>() < f64::from(500 - val) / 3000.0 {
            val = rng.gen_range(5..995);
        }

        ctx.log.line(
            LogLevel::Verbose,
            int_line(
                &ctx.names.skill_names.get(i + 1),
                "MP Cost",
                u32::from(skill.mp_cost),
                val as u32,
            ),
        );
        skill.mp_cost = val as u16;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_cooldown(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("Cooldown");

    ctx.log.line(LogLevel::Always, "Randomizing Cooldowns...");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        if skill.kind != MoveKind::Attack || skill.tier == 0 {
            continue;
        }

        let new_cooldown: u16 = 500 + rng.gen_range(0..6500);
        ctx.log.line(
            LogLevel::Verbose,
            int_line(
                &ctx.names.skill_names.get(i + 1),
                "Cooldown",
                u32::from(skill.cooldown),
                u32::from(new_cooldown),
            ),
        );
        skill.cooldown = new_cooldown;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_learn_rate(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("LearnChance");

    ctx.log.line(LogLevel::Always, "Randomizing Learn Rates...");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        if skill.tier == 0 {
            continue;
        }

        let new_learn_rate = 0.1 + 0.9 * rng.gen::<f32>();
        ctx.log.line(
            LogLevel::Verbose,
            float_line(
                &ctx.names.skill_names.get(i + 1),
                "Learn Rate",
                skill.learn_rate,
                new_learn_rate,
            ),
        );
        skill.learn_rate = new_learn_rate;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_damage(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("Power");

    ctx.log.line(LogLevel::Always, "Randomizing Power...");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        if skill.kind != MoveKind::Attack {
            continue;
        }

        // A flat base plus a skewed low-magnitude bonus composed from three
        // draws. Draw order is part of the stream contract.
        let base: u32 = rng.gen_range(0..200);
        let hi: u32 = rng.gen_range(0..1024);
        let bound: u32 = 1 + rng.gen_range(0..749);
        let scale: u32 = if bound > 1 { rng.gen_range(1..bound) } else { 1 };
        let new_damage = 50 + base + (hi * scale) / 1024;

        ctx.log.line(
            LogLevel::Verbose,
            int_line(
                &ctx.names.skill_names.get(i + 1),
                "Power",
                u32::from(skill.damage),
                new_damage,
            ),
        );
        skill.damage = new_damage as u16;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_status(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("Status");

    ctx.log.line(LogLevel::Always, "Randomizing Status Effects...");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        if skill.kind != MoveKind::Attack || skill.tier == 0 {
            continue;
        }

        let new_status = if rng.gen::<bool>() {
            Status::None
        } else {
            Status::EFFECTS[rng.gen_range(0..Status::EFFECTS.len())]
        };
        ctx.log.line(
            LogLevel::Verbose,
            string_line(
                &ctx.names.skill_names.get(i + 1),
                "Status",
                skill.status,
                new_status,
            ),
        );
        skill.status = new_status;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_status_chance(ctx: &mut RandomizationContext) {
    let mut rng = ctx.rng("StatusChance");

    ctx.log.line(LogLevel::Always, "Randomizing Status Chances...");

    for (i, skill) in ctx.data.skills.iter_mut().enumerate() {
        if skill.status == Status::None || skill.kind != MoveKind::Attack || skill.tier == 0 {
            continue;
        }

        let new_chance: u8 = 1 + rng.gen_range(0..99);
        ctx.log.line(
            LogLevel::Verbose,
            int_line(
                &ctx.names.skill_names.get(i + 1),
                "StatusChance",
                u32::from(skill.status_chance),
                u32::from(new_chance),
            ),
        );
        skill.status_chance = new_chance;
    }

    ctx.log.line(LogLevel::Always, "");
}

fn randomize_finisher(settings: &SkillSettings, ctx: &mut RandomizationContext) {
    // Two independent streams so the power and status halves can be toggled
    // without perturbing each other.
    let mut rand_damage = ctx.rng("FinisherDamage");
    let mut rand_status = ctx.rng("FinisherStatus");

    ctx.log.line(LogLevel::Always, "Randomizing Finisher...");

    for (i, finisher) in ctx.data.finishers.iter_mut().enumerate() {
        if settings.randomize_damage {
            let power: u16 = 250 + rand_damage.gen_range(0..750);
            ctx.log.line(
                LogLevel::Verbose,
                int_line(
                    &ctx.names.finisher_names.get(i + 1),
                    "Power",
                    u32::from(finisher.power),
                    u32::from(power),
                ),
            );
            finisher.power = power;
        }

        if settings.randomize_status {
            // Inverted threshold vs the skill status pass: finishers keep a
            // status 75% of the time.
            let status = if rand_status.gen::<f64>() > 0.75 {
                Status::None
            } else {
                Status::EFFECTS[rand_status.gen_range(0..Status::EFFECTS.len())]
            };
            ctx.log.line(
                LogLevel::Verbose,
                string_line(
                    &ctx.names.finisher_names.get(i + 1),
                    "Status",
                    finisher.status,
                    status,
                ),
            );
            finisher.status = status;
            finisher.status_chance = if status == Status::None { 0 } else { 100 };
        }
    }

    ctx.log.line(LogLevel::Always, "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Finisher, NameTable, Skill};

    fn skill(tier: u8, kind: MoveKind) -> Skill {
        Skill {
            tier,
            kind,
            learn_rate: 0.5,
            cooldown: 1000,
            damage: 10,
            status: Status::Poison,
            status_chance: 30,
            mp_cost: 100,
        }
    }

    fn sample_data() -> GameData {
        GameData {
            skills: vec![
                skill(1, MoveKind::Attack),
                skill(0, MoveKind::Attack),
                skill(2, MoveKind::Support),
                skill(3, MoveKind::Attack),
                Skill {
                    status: Status::None,
                    status_chance: 0,
                    ..skill(1, MoveKind::Attack)
                },
            ],
            finishers: vec![
                Finisher {
                    power: 300,
                    status: Status::None,
                    status_chance: 0,
                },
                Finisher {
                    power: 500,
                    status: Status::Sleep,
                    status_chance: 40,
                },
            ],
        }
    }

    fn sample_names() -> LanguageData {
        LanguageData {
            skill_names: NameTable(vec![
                "Fire Tower".to_string(),
                "Spit Fire".to_string(),
                "War Cry".to_string(),
                "Thunder Justice".to_string(),
                "Sonic Jab".to_string(),
            ]),
            finisher_names: NameTable(vec![
                "Infinity Burn".to_string(),
                "Celestial Arrow".to_string(),
            ]),
        }
    }

    fn run_with(seed: u64, settings: &SkillSettings) -> RandomizationContext {
        let mut ctx = RandomizationContext::new(seed, sample_data(), sample_names());
        settings.randomize(&mut ctx);
        ctx
    }

    fn all_on() -> SkillSettings {
        SkillSettings {
            randomize_mp_cost: true,
            randomize_cooldown: true,
            randomize_learn_rate: true,
            randomize_damage: true,
            randomize_status: true,
            randomize_status_chance: true,
            randomize_finisher: true,
        }
    }

    #[test]
    fn cooldown_in_range_and_gated() {
        let settings = SkillSettings {
            randomize_cooldown: true,
            ..Default::default()
        };
        for seed in 0..50 {
            let ctx = run_with(seed, &settings);
            let original = sample_data();
            for (new, old) in ctx.data.skills.iter().zip(&original.skills) {
                if old.kind == MoveKind::Attack && old.tier != 0 {
                    assert!((500..=6999).contains(&new.cooldown));
                } else {
                    assert_eq!(new.cooldown, old.cooldown);
                }
            }
        }
    }

    #[test]
    fn learn_rate_in_range_and_tier_zero_untouched() {
        let settings = SkillSettings {
            randomize_learn_rate: true,
            ..Default::default()
        };
        for seed in 0..50 {
            let ctx = run_with(seed, &settings);
            let original = sample_data();
            for (new, old) in ctx.data.skills.iter().zip(&original.skills) {
                if old.tier != 0 {
                    assert!((0.1..1.0).contains(&new.learn_rate));
                } else {
                    assert_eq!(new.learn_rate, old.learn_rate);
                }
            }
        }
    }

    #[test]
    fn damage_has_floor_and_skips_non_attack() {
        let settings = SkillSettings {
            randomize_damage: true,
            ..Default::default()
        };
        for seed in 0..50 {
            let ctx = run_with(seed, &settings);
            let original = sample_data();
            for (new, old) in ctx.data.skills.iter().zip(&original.skills) {
                if old.kind == MoveKind::Attack {
                    assert!(new.damage >= 50);
                    assert!(new.damage < 1000);
                } else {
                    assert_eq!(new.damage, old.damage);
                }
            }
        }
    }

    #[test]
    fn status_chance_in_range_and_gated() {
        let settings = SkillSettings {
            randomize_status_chance: true,
            ..Default::default()
        };
        for seed in 0..50 {
            let ctx = run_with(seed, &settings);
            let original = sample_data();
            for (new, old) in ctx.data.skills.iter().zip(&original.skills) {
                let eligible =
                    old.status != Status::None && old.kind == MoveKind::Attack && old.tier != 0;
                if eligible {
                    assert!((1..=99).contains(&new.status_chance));
                } else {
                    assert_eq!(new.status_chance, old.status_chance);
                }
            }
        }
    }

    #[test]
    fn mp_cost_stays_in_band() {
        let settings = SkillSettings {
            randomize_mp_cost: true,
            ..Default::default()
        };
        // The Gaussian draw is kept only inside [5, 995]; re-rolls land in
        // [5, 994]. Either way the result is within [5, 995].
        for seed in 0..200 {
            let ctx = run_with(seed, &settings);
            for new in &ctx.data.skills {
                assert!((5..=995).contains(&new.mp_cost));
            }
        }
    }

    #[test]
    fn status_pass_only_touches_eligible_skills() {
        let settings = SkillSettings {
            randomize_status: true,
            ..Default::default()
        };
        for seed in 0..50 {
            let ctx = run_with(seed, &settings);
            let original = sample_data();
            for (new, old) in ctx.data.skills.iter().zip(&original.skills) {
                if old.kind != MoveKind::Attack || old.tier == 0 {
                    assert_eq!(new.status, old.status);
                }
            }
        }
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let settings = all_on();
        let a = run_with(42, &settings);
        let b = run_with(42, &settings);
        assert_eq!(a.data, b.data);
        assert_eq!(a.log.render(true), b.log.render(true));
    }

    #[test]
    fn unrelated_flags_do_not_perturb_a_pass() {
        let only_cooldown = SkillSettings {
            randomize_cooldown: true,
            ..Default::default()
        };
        let cooldown_and_more = SkillSettings {
            randomize_cooldown: true,
            randomize_mp_cost: true,
            randomize_learn_rate: true,
            randomize_status: true,
            ..Default::default()
        };
        let a = run_with(42, &only_cooldown);
        let b = run_with(42, &cooldown_and_more);
        let cooldowns_a: Vec<u16> = a.data.skills.iter().map(|s| s.cooldown).collect();
        let cooldowns_b: Vec<u16> = b.data.skills.iter().map(|s| s.cooldown).collect();
        assert_eq!(cooldowns_a, cooldowns_b);
    }

    #[test]
    fn finisher_status_forces_matching_chance() {
        let settings = SkillSettings {
            randomize_finisher: true,
            randomize_status: true,
            randomize_damage: true,
            ..Default::default()
        };
        let mut saw_none = false;
        let mut saw_effect = false;
        for seed in 0..200 {
            let ctx = run_with(seed, &settings);
            for finisher in &ctx.data.finishers {
                if finisher.status == Status::None {
                    assert_eq!(finisher.status_chance, 0);
                    saw_none = true;
                } else {
                    assert_eq!(finisher.status_chance, 100);
                    saw_effect = true;
                }
                assert!((250..=999).contains(&finisher.power));
            }
        }
        assert!(saw_none && saw_effect);
    }

    #[test]
    fn finisher_pass_reuses_damage_and_status_flags() {
        // Finisher flag alone: neither half is enabled, records stay as-is.
        let settings = SkillSettings {
            randomize_finisher: true,
            ..Default::default()
        };
        let ctx = run_with(42, &settings);
        assert_eq!(ctx.data.finishers, sample_data().finishers);

        // Damage flag without the finisher flag leaves finishers alone too.
        let settings = SkillSettings {
            randomize_damage: true,
            ..Default::default()
        };
        let ctx = run_with(42, &settings);
        assert_eq!(ctx.data.finishers, sample_data().finishers);
    }

    #[test]
    fn pass_order_is_fixed() {
        let ctx = run_with(42, &all_on());
        let headers: Vec<&str> = ctx
            .log
            .lines()
            .iter()
            .filter(|(level, text)| *level == LogLevel::Always && !text.is_empty())
            .map(|(_, text)| text.as_str())
            .collect();
        assert_eq!(
            headers,
            vec![
                "Randomizing MP Cost...",
                "Randomizing Cooldowns...",
                "Randomizing Learn Rates...",
                "Randomizing Power...",
                "Randomizing Status Effects...",
                "Randomizing Status Chances...",
                "Randomizing Finisher...",
            ]
        );
    }

    #[test]
    fn settings_map_round_trip_and_fallbacks() {
        let mut map = Map::new();
        map.insert("randomizeMPCosts".into(), Value::Bool(true));
        map.insert("randomizeCooldown".into(), Value::String("true".into()));
        map.insert("randomizeLearnRate".into(), Value::String("TRUE".into()));
        map.insert("randomizeDamage".into(), Value::String("nonsense".into()));
        map.insert("randomizeStatus".into(), Value::from(1));
        // randomizeStatusChance and randomizeFinisher deliberately missing.

        let settings = SkillSettings::from_map(&map);
        assert!(settings.randomize_mp_cost);
        assert!(settings.randomize_cooldown);
        assert!(settings.randomize_learn_rate);
        assert!(!settings.randomize_damage);
        assert!(!settings.randomize_status);
        assert!(!settings.randomize_status_chance);
        assert!(!settings.randomize_finisher);

        let round_tripped = SkillSettings::from_map(&settings.to_map());
        assert_eq!(round_tripped, settings);
    }
}
