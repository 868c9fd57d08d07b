//! trainlock binary.
//!
//! Wires the lock core to a console surface and a stdin password reader.
//! A compositor-backed front end would implement [`trainlock::LockSurface`]
//! and feed key events into the loop channel instead.

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use trainlock::{
    ConsoleSurface, LockConfig, LockController, LockEvent, RunLoop, default_provider,
};

const DEFAULT_PASSWORD: &str = "train123";

#[derive(Parser, Debug)]
#[command(name = "trainlock", version, about = "Session input lock for unattended training runs")]
struct Args {
    /// Unlock password.
    #[arg(default_value = DEFAULT_PASSWORD)]
    password: String,

    /// Background image path, handed to the rendering layer.
    #[arg(long)]
    bg: Option<PathBuf>,
}

fn default_background() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join("Downloads/rl_lock_wallpaper.png")
}

fn print_banner(password: &str, capture_available: bool) {
    println!("==================================================");
    println!("  trainlock — input lock ACTIVATED");
    println!("--------------------------------------------------");
    println!("  Password  : {}", "*".repeat(password.len()));
    println!("  Unlock    : type password + Enter");
    println!("            : OR press Ctrl+Alt+U");
    println!("  Emergency : send SIGTERM to PID below");
    println!("  PID       : {}", std::process::id());
    println!(
        "  capture   : {}",
        if capture_available {
            "kernel pointer grab"
        } else {
            "unavailable (no pointer block)"
        }
    );
    println!("==================================================");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let bg = args.bg.unwrap_or_else(default_background);
    log::debug!("background image: {}", bg.display());

    let controller = match LockController::new(
        LockConfig::default(),
        args.password.clone(),
        default_provider(),
        Box::new(ConsoleSurface::default()),
    ) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("cannot create lock surface: {e}");
            std::process::exit(1);
        }
    };

    print_banner(&args.password, controller.is_capture_capable());

    let looper = RunLoop::new(controller);
    if let Err(e) = looper.install_signal_handler() {
        log::warn!("signal unlock path unavailable: {e}");
    }

    // Stdin stands in for the password field: each line is one submission.
    // The reader only enqueues; the loop thread owns all state.
    let tx = looper.sender();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(LockEvent::PasswordSubmitted(line)).is_err() {
                break;
            }
        }
    });

    let controller = looper.run();
    debug_assert_eq!(controller.grabbed_count(), 0);

    println!();
    println!("Input lock released. You may use the PC now.");
}
