//! Staged startup report logged once the gateway session is ready.

use rand::Rng;
use tokio::time::Duration;
use tracing::info;

pub const DIAGNOSTICS: [&str; 5] = [
    "Establishing core protocols",
    "Authenticating token integrity",
    "Decrypting environment configurations",
    "Validating gateway intents",
    "Performing code integrity scan",
];

pub const SUBSYSTEMS: [&str; 7] = [
    "Spawning command handlers",
    "Loading music modules",
    "Setting up event listeners",
    "Allocating memory buffers",
    "Priming WebSocket connections",
    "Calibrating presence status",
    "Final handshake with Discord",
];

const MODULE_STEPS: u32 = 20;
const MODULE_TOTAL_MB: u32 = 2048;
const BAR_WIDTH: usize = 40;
const RULE: &str = "=====================================================";
const THIN_RULE: &str = "-----------------------------------------------------";

/// One line of the module loading phase.
pub fn progress_line(step: u32, steps: u32, speed_mb: u32) -> String {
    let percent = step * 100 / steps;
    let loaded = percent * MODULE_TOTAL_MB / 100;
    let filled = percent as usize * BAR_WIDTH / 100;
    format!(
        "🚀 [{}{}] {}% | {}MB/{}MB | {}MB/s",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent,
        loaded,
        MODULE_TOTAL_MB,
        speed_mb
    )
}

/// Simulated transfer speed, 130 to 199 MB/s.
pub fn module_speed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(130..200)
}

pub struct LaunchSequence {
    bot_name: String,
    step: Duration,
}

impl LaunchSequence {
    /// `step_ms` is the pause between lines; zero logs everything at once.
    pub fn new(bot_name: impl Into<String>, step_ms: u64) -> Self {
        Self {
            bot_name: bot_name.into(),
            step: Duration::from_millis(step_ms),
        }
    }

    pub async fn run(&self) {
        info!("🔄 Initiating Mega Launch Sequence for {}...", self.bot_name);
        info!("{}", RULE);

        for step in DIAGNOSTICS {
            self.pause().await;
            info!("🔧 {}... ✅", step);
        }

        info!("📦 Loading system modules...");
        info!("{}", THIN_RULE);
        for i in 1..=MODULE_STEPS {
            let speed = module_speed(&mut rand::thread_rng());
            info!("{}", progress_line(i, MODULE_STEPS, speed));
            self.pause().await;
        }

        info!("⚙️ Initializing subsystems...");
        info!("{}", THIN_RULE);
        for task in SUBSYSTEMS {
            self.pause().await;
            info!("🔄 {}... ✅", task);
        }

        info!(
            "✅ MEGA LAUNCH COMPLETE - {} is now operational!",
            self.bot_name
        );
        info!("{}", RULE);
    }

    async fn pause(&self) {
        if !self.step.is_zero() {
            tokio::time::sleep(self.step).await;
        }
    }
}
