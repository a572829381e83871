//! Platform Quest entry point
//!
//! Native builds run a short headless session as a smoke check; the browser
//! build is driven by the page through `platform_quest::web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
use platform_quest::consts::FRAME_MS;
#[cfg(not(target_arch = "wasm32"))]
use platform_quest::{GameShell, LevelPack, Settings, ShellPhase};

/// Frames of scripted play before giving up on the level
#[cfg(not(target_arch = "wasm32"))]
const SESSION_FRAMES: u32 = 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Platform Quest (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let pack = LevelPack::bundled()?;
    for (index, level) in pack.iter().enumerate() {
        let world = level.parse()?;
        log::info!(
            "{:>2}. {:<16} {} coins, {} enemies{}",
            index + 1,
            level.name,
            world.coins.len(),
            world.enemy_count(),
            if world.boss().is_some() { ", boss" } else { "" }
        );
    }

    let mut shell = GameShell::new(pack, settings);
    shell.start_game()?;
    play_scripted(&mut shell);

    println!(
        "{}: phase {:?}, score {}, lives {}",
        shell.level_name(),
        shell.phase(),
        shell.score(),
        shell.lives()
    );
    Ok(())
}

/// Run right, hopping every second or so, until the level ends one way or another
#[cfg(not(target_arch = "wasm32"))]
fn play_scripted(shell: &mut GameShell) {
    shell.key_down("ArrowRight");

    for frame in 0..SESSION_FRAMES {
        let jump = frame % 60 < 10;
        if jump {
            shell.key_down(" ");
        } else {
            shell.key_up(" ");
        }

        let report = shell.frame(frame as f64 * FRAME_MS);
        for event in &report.events {
            log::info!("frame {frame}: {event:?}");
        }

        if matches!(
            shell.phase(),
            ShellPhase::LevelComplete | ShellPhase::GameOver
        ) {
            break;
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page constructs WebGame from the library bindings
}
