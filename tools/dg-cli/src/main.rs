use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;

use dg_engine::context::{DisplaySink, Message, MessageLog, MessageSink, NullDisplay};
use dg_engine::levelgen::{generate_level, LevelGenParams};
use dg_engine::recording::{Playback, RecordedEvent, Recorder};
use dg_engine::{action, scheduler};
use dg_types::creature::{Creature, CreatureState, Stats};
use dg_types::flags::{CreatureFlags, MonsterBehaviorFlags};
use dg_types::grid::Pos;
use dg_types::level::{Level, RunState};

const ENGINE_VERSION: &str = "dg-1.0.0";
const ENVIRONMENT_PERIOD: u32 = 100;

/// Minimal dungeon-crawl CLI: interactive play, recorded playback, or
/// headless non-interactive playback (spec §6 "CLI surface").
#[derive(Debug, Parser)]
#[command(name = "dg-cli", version, about)]
struct Cli {
    /// Seed the run's RNG. Ignored when replaying a recording (the seed
    /// is read back from the recording header instead).
    #[arg(long)]
    seed: Option<u64>,

    /// Replay a prior recording from this path instead of starting a
    /// fresh run.
    #[arg(long)]
    playback: Option<String>,

    /// Drive the playback to completion without prompting, printing a
    /// summary at the end. Requires `--playback`.
    #[arg(long)]
    non_interactive_playback: bool,

    /// Skip the startup banner and go straight into play.
    #[arg(long)]
    no_menu: bool,
}

/// Exit status values from spec §6's CLI surface.
#[repr(u8)]
enum ExitStatus {
    Success = 0,
    FailureRecordingWrongVersion = 1,
    FailureSaveCorrupt = 2,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.no_menu {
        println!("\n  =============================");
        println!("    D U N G E O N   C R A W L");
        println!("  =============================\n");
    }

    let status = match &cli.playback {
        Some(path) => run_playback(path, cli.non_interactive_playback),
        None => run_interactive(cli.seed.unwrap_or(42)),
    };
    ExitCode::from(status as u8)
}

fn make_level(seed: u64, depth: u32) -> (Level, Pos) {
    let mut level = generate_level(seed, depth, &LevelGenParams::default());
    let spawn = (0..dg_types::grid::DROWS as i32)
        .flat_map(|y| (0..dg_types::grid::DCOLS as i32).map(move |x| Pos::new(x, y)))
        .find(|&p| level.cell(p).dungeon.is_some())
        .unwrap_or(Pos::new(40, 14));
    let player_id = level.creatures.insert(Creature {
        is_player: true,
        monster_type: None,
        pos: spawn,
        stats: Stats { hp: 40, max_hp: 40, accuracy: 75, defense: 0, regen_rate: 1 },
        state: CreatureState::Wandering,
        flags: CreatureFlags::empty(),
        behavior: MonsterBehaviorFlags::empty(),
        statuses: Vec::new(),
        leader: None,
        vorpal_enemy: None,
        next_turn: 0,
        ticks_per_turn: 100,
    });
    level.player_id = Some(player_id);
    (level, spawn)
}

fn run_interactive(seed: u64) -> ExitStatus {
    let mut run = RunState::new(seed);
    let (mut level, _) = make_level(seed, 1);
    let mut env_ticks = ENVIRONMENT_PERIOD as i32;
    let mut log = MessageLog::default();

    let recording_path = std::env::temp_dir().join(format!("dg-run-{seed}.rec"));
    let mut recorder = match Recorder::begin(&recording_path, seed, ENGINE_VERSION) {
        Ok(r) => Some(r),
        Err(e) => {
            log::warn!("could not start recording: {e}");
            None
        }
    };

    println!("  seed {seed}, recording to {}", recording_path.display());
    println!("  move: h/j/k/l/y/u/b/n, quit: q\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if run.game_over {
            println!("\n  === GAME OVER (turn {}) ===", run.turn_number);
            break;
        }
        print!("> ");
        io::stdout().flush().ok();
        let Some(Ok(line)) = lines.next() else { break };
        let Some(ch) = line.trim().chars().next() else { continue };
        if ch == 'q' {
            println!("  goodbye");
            break;
        }
        let Some(direction) = direction_for_key(ch) else {
            println!("  unrecognized key '{ch}'");
            continue;
        };
        if let Some(r) = recorder.as_mut() {
            r.record_keystroke(ch as u16);
        }
        match action::player_moves(&mut level, direction, false) {
            Ok(outcome) => {
                if outcome.attacked.is_some() {
                    log.push(Message { text: "you strike".into(), important: false });
                }
                let report = scheduler::player_turn_ended(&mut run, &mut level, 0, &mut env_ticks, ENVIRONMENT_PERIOD);
                for id in &report.deaths {
                    log.push(Message { text: format!("creature {id:?} dies"), important: true });
                }
                for entry in log.entries.drain(..) {
                    println!("  {}", entry.text);
                }
            }
            Err(e) => println!("  can't do that: {e}"),
        }
        if let Some(r) = recorder.as_mut() {
            r.record_turn_ended();
            let _ = r.consider_flushing();
        }
    }
    ExitStatus::Success
}

fn run_playback(path: &str, non_interactive: bool) -> ExitStatus {
    let mut playback = match Playback::open(path) {
        Ok(p) => p,
        Err(dg_engine::error::RecordingError::TruncatedHeader { .. })
        | Err(dg_engine::error::RecordingError::UnsupportedVersion(_)) => {
            eprintln!("recording header is unreadable or from an incompatible version");
            return ExitStatus::FailureRecordingWrongVersion;
        }
        Err(e) => {
            eprintln!("failed to open recording: {e}");
            return ExitStatus::FailureSaveCorrupt;
        }
    };

    let (major_minor, _) = ENGINE_VERSION.rsplit_once('.').unwrap_or((ENGINE_VERSION, ""));
    if !playback.header.version.starts_with(major_minor) && !non_interactive {
        eprintln!("recording version {} does not match {ENGINE_VERSION}", playback.header.version);
        return ExitStatus::FailureRecordingWrongVersion;
    }

    let mut run = RunState::new(playback.header.seed);
    let (mut level, _) = make_level(playback.header.seed, 1);
    let mut env_ticks = ENVIRONMENT_PERIOD as i32;
    let mut display = NullDisplay;
    let mut log = MessageLog::default();

    let mut turns_played = 0u32;
    while let Some(event) = playback.next_event() {
        let RecordedEvent::Keystroke(key) = event else { continue };
        let Ok(ch) = u8::try_from(key).map(|b| b as char) else { continue };
        let Some(direction) = direction_for_key(ch) else { continue };
        if action::player_moves(&mut level, direction, false).is_ok() {
            scheduler::player_turn_ended(&mut run, &mut level, 0, &mut env_ticks, ENVIRONMENT_PERIOD);
            turns_played += 1;
        }
        display.redraw(&level);
        if run.game_over {
            break;
        }
    }

    for entry in log.entries.drain(..) {
        println!("  {}", entry.text);
    }
    println!("  playback finished after {turns_played} turns (seed {})", run.seed);
    ExitStatus::Success
}

/// vi-style movement keys onto [`dg_types::grid::NB_DIRS`] indices.
fn direction_for_key(ch: char) -> Option<usize> {
    match ch {
        'k' => Some(0), // N
        'j' => Some(1), // S
        'h' => Some(2), // W
        'l' => Some(3), // E
        'y' => Some(4), // NW
        'b' => Some(5), // SW
        'u' => Some(6), // NE
        'n' => Some(7), // SE
        _ => None,
    }
}
