use eframe::egui;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use randomiser_core::{run as run_randomiser, RandomiserSettings, SkillSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GuiConfig {
    input_path: String,
    output_path: String,
}

fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir().or_else(dirs::data_dir)?;
    base.push("SkillRandomiser");
    base.push("gui_config.json");
    Some(base)
}

fn load_config() -> GuiConfig {
    if let Some(path) = config_path() {
        if let Ok(data) = fs::read_to_string(&path) {
            if let Ok(cfg) = serde_json::from_str::<GuiConfig>(&data) {
                return cfg;
            }
        }
    }
    GuiConfig::default()
}

fn save_config(cfg: &GuiConfig) {
    if let Some(path) = config_path() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(data) = serde_json::to_string_pretty(cfg) {
            let _ = fs::write(path, data);
        }
    }
}

struct RandomiserApp {
    input_path: String,
    output_path: String,
    seed_text: String,

    skills: SkillSettings,
    verbose_log: bool,

    is_running: bool,
    log: String,
    result_rx: Option<mpsc::Receiver<String>>,
}

impl Default for RandomiserApp {
    fn default() -> Self {
        let seed = rand::thread_rng().gen::<u64>();
        let cfg = load_config();

        Self {
            input_path: cfg.input_path,
            output_path: cfg.output_path,
            seed_text: seed.to_string(),

            skills: SkillSettings::default(),
            verbose_log: false,

            is_running: false,
            log: String::new(),
            result_rx: None,
        }
    }
}

fn folder_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.text_edit_singleline(value);
        if ui.button("Browse...").clicked() {
            let mut dialog = rfd::FileDialog::new();
            if !value.trim().is_empty() && Path::new(value.trim()).exists() {
                dialog = dialog.set_directory(value.trim());
            }
            if let Some(path) = dialog.pick_folder() {
                *value = path.display().to_string();
            }
        }
    });
}

impl eframe::App for RandomiserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(rx) = self.result_rx.as_ref() {
            while let Ok(msg) = rx.try_recv() {
                if !self.log.is_empty() {
                    self.log.push('\n');
                }
                self.log.push_str(&msg);
                self.is_running = false;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            folder_row(ui, "Input path:", &mut self.input_path);
            folder_row(ui, "Output path:", &mut self.output_path);

            ui.horizontal(|ui| {
                ui.label("Seed:");
                ui.text_edit_singleline(&mut self.seed_text);

                if ui.button("Random seed").clicked() {
                    let seed = rand::thread_rng().gen::<u64>();
                    self.seed_text = seed.to_string();
                }
            });

            ui.separator();

            ui.label("Skill randomisation:");
            ui.checkbox(&mut self.skills.randomize_mp_cost, "MP Cost");
            ui.checkbox(&mut self.skills.randomize_cooldown, "Cooldown");
            ui.checkbox(&mut self.skills.randomize_learn_rate, "Learn Rate");
            ui.checkbox(&mut self.skills.randomize_damage, "Power");
            ui.checkbox(&mut self.skills.randomize_status, "Status");
            ui.checkbox(&mut self.skills.randomize_status_chance, "Status Chance");
            ui.checkbox(&mut self.skills.randomize_finisher, "Finisher")
                .on_hover_text("Reuses the Power and Status toggles for finisher power and status effect.");

            ui.separator();

            ui.checkbox(&mut self.verbose_log, "Verbose spoiler log");

            let run_button_enabled = !self.is_running;
            if ui
                .add_enabled(run_button_enabled, egui::Button::new("Run randomiser"))
                .clicked()
            {
                let seed = self
                    .seed_text
                    .trim()
                    .parse::<u64>()
                    .unwrap_or_else(|_| rand::thread_rng().gen::<u64>());

                // Persist GUI config right before launching.
                save_config(&GuiConfig {
                    input_path: self.input_path.clone(),
                    output_path: self.output_path.clone(),
                });

                let settings = RandomiserSettings {
                    seed,
                    skills: self.skills.clone(),
                    verbose_log: self.verbose_log,
                    input_path: PathBuf::from(self.input_path.trim()),
                    output_path: PathBuf::from(self.output_path.trim()),
                };

                let (tx, rx) = mpsc::channel();
                self.result_rx = Some(rx);
                self.is_running = true;

                if !self.log.is_empty() {
                    self.log.push('\n');
                }
                self.log
                    .push_str(&format!("Starting randomiser with seed {}...", seed));

                thread::spawn(move || {
                    let message = match run_randomiser(settings) {
                        Ok(()) => "Randomiser finished successfully.".to_string(),
                        Err(e) => format!("Randomiser error: {}", e),
                    };

                    let _ = tx.send(message);
                });
            }

            ui.separator();
            ui.label("Log:");
            egui::ScrollArea::vertical()
                .id_source("log_scroll")
                .show(ui, |ui| {
                    ui.monospace(&self.log);
                });
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Skill Randomiser",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(RandomiserApp::default())
        }),
    )
}
