//! Terminal front end for Codebreak.
//!
//! Reads one command per line from stdin while a background thread keeps the
//! session ticking. Online matches run hot-seat: both peers live in this
//! process and talk through an in-process relay.

use std::{
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
    process::ExitCode,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand, ValueEnum};
use codebreak_app::{
    Session, SessionError, SessionEvent,
    persistence::{FileStorage, SessionStore},
    relay::LocalRelay,
    settings::Settings,
};
use codebreak_core::SequenceLength;
use codebreak_game::{
    GuessOutcome, MatchConfig, MatchRecord, MatchState, OnlineRole, Phase, PlayerId, TimeLimit,
};
use codebreak_generator::SecretSeed;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Two-player digit code-breaking game.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the saved match and match history.
    #[arg(long, env = "CODEBREAK_DATA_DIR", default_value = ".codebreak")]
    data_dir: PathBuf,
    /// Delay before the computer moves, in milliseconds.
    #[arg(long, default_value_t = 1200)]
    think_delay_ms: u64,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a new match.
    Play(PlayArgs),
    /// Continue the saved match.
    Resume,
    /// List finished matches.
    History,
}

#[derive(Debug, Default, clap::Args)]
struct PlayArgs {
    /// Who plays.
    #[arg(long, value_enum, default_value_t = Mode::Single)]
    mode: Mode,
    /// Number of digits in each secret.
    #[arg(long, default_value = "3", value_parser = parse_length)]
    length: Option<SequenceLength>,
    /// Seconds per turn.
    #[arg(long, default_value = "60", value_parser = parse_time_limit)]
    time_limit: Option<TimeLimit>,
    /// Hex seed for reproducible secrets and computer moves.
    #[arg(long)]
    seed: Option<SecretSeed>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Against the computer.
    #[default]
    Single,
    /// Two players sharing this terminal.
    Local,
    /// Two peers linked through a relay, played hot-seat.
    Online,
}

fn parse_length(s: &str) -> Result<SequenceLength, String> {
    let digits: u8 = s.parse().map_err(|err| format!("{err}"))?;
    SequenceLength::try_from(digits).map_err(|err| err.to_string())
}

fn parse_time_limit(s: &str) -> Result<TimeLimit, String> {
    let seconds: u32 = s.parse().map_err(|err| format!("{err}"))?;
    TimeLimit::try_from(seconds).map_err(|err| err.to_string())
}

type TerminalSession = Session<FileStorage, LocalRelay>;

struct Seat {
    label: &'static str,
    session: TerminalSession,
}

impl Seat {
    fn new(label: &'static str, settings: &Settings, relay: &LocalRelay) -> Self {
        let mut settings = settings.clone();
        if !label.is_empty() {
            settings.storage.data_dir = settings.storage.data_dir.join(label);
        }
        let store = SessionStore::new(FileStorage::new(settings.storage.data_dir.clone()));
        Self {
            label,
            session: Session::new(store, Some(relay.clone()), settings),
        }
    }

    fn prefix(&self) -> String {
        if self.label.is_empty() {
            String::new()
        } else {
            format!("[{}] ", self.label)
        }
    }
}

/// What the player at the keyboard is asked to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Prompt {
    seat: usize,
    player: PlayerId,
    phase: Phase,
}

struct Table {
    seats: Vec<Seat>,
    last_prompt: Option<String>,
}

enum Flow {
    Continue,
    Quit,
}

impl Table {
    fn new(settings: &Settings, online: bool) -> Self {
        let relay = LocalRelay::new();
        let seats = if online {
            vec![
                Seat::new("host", settings, &relay),
                Seat::new("guest", settings, &relay),
            ]
        } else {
            vec![Seat::new("", settings, &relay)]
        };
        Self {
            seats,
            last_prompt: None,
        }
    }

    fn start(&mut self, args: &PlayArgs, now: Instant) -> Result<(), SessionError> {
        let length = args.length.unwrap_or(SequenceLength::Three);
        let config = match args.mode {
            Mode::Single => MatchConfig::single_player(length),
            Mode::Local => MatchConfig::two_player_local(length),
            Mode::Online => MatchConfig::online(length, OnlineRole::Host),
        }
        .with_time_limit(args.time_limit.unwrap_or_default());
        let seed = args.seed.unwrap_or_else(SecretSeed::random);

        let id = self.seats[0]
            .session
            .start_match_with(config, None, seed, now)?
            .id();
        if let Some(guest) = self.seats.get_mut(1) {
            let config = MatchConfig {
                role: OnlineRole::Guest,
                ..config
            };
            guest.session.join_match(config, id, now)?;
        }
        println!("match {id} started");
        Ok(())
    }

    fn resume(&mut self, now: Instant) -> Result<bool, SessionError> {
        for seat in &mut self.seats {
            let Some(state) = seat.session.saved_match() else {
                return Ok(false);
            };
            seat.session.resume(state, now)?;
        }
        Ok(true)
    }

    fn state(&self) -> Option<&MatchState> {
        self.seats.first().and_then(|seat| seat.session.state())
    }

    fn prompt(&self) -> Option<Prompt> {
        self.seats.iter().enumerate().find_map(|(seat, entry)| {
            let state = entry.session.state()?;
            let config = state.config();
            let player = match state.phase() {
                Phase::SettingSecret(_) if config.mode.is_online() => config.role.player(),
                Phase::SettingSecret(player) | Phase::Turn(player) => player,
                Phase::Handoff { next } => next.player(),
                Phase::WaitingForOpponent | Phase::GameOver => return None,
            };
            let waiting_on_secret =
                state.phase().is_setting_secret() && state.secret(player).is_some();
            (entry.session.is_local_player(player) && !waiting_on_secret).then_some(Prompt {
                seat,
                player,
                phase: state.phase(),
            })
        })
    }

    fn prompt_text(&self) -> String {
        let Some(state) = self.state() else {
            return "no match in progress".to_owned();
        };
        let Some(prompt) = self.prompt() else {
            return match state.winner() {
                Some(winner) => format!(
                    "{winner} wins after {} rounds! type 'again' for a rematch or 'quit'",
                    state.rounds()
                ),
                None if state.config().mode.is_single_player() => {
                    "the computer is thinking...".to_owned()
                }
                None => "waiting for the opponent...".to_owned(),
            };
        };
        let seat = &self.seats[prompt.seat];
        let prefix = seat.prefix();
        let player = prompt.player;
        match prompt.phase {
            Phase::Handoff { .. } => format!("pass the terminal to {player} and press Enter"),
            Phase::SettingSecret(_) => format!(
                "{prefix}{player}, choose a secret of {} distinct digits:",
                state.config().length
            ),
            _ => {
                let remaining = seat
                    .session
                    .state()
                    .map_or(0, MatchState::time_remaining);
                if state.total_guesses() == 0 {
                    format!("{prefix}{player}, your guess:")
                } else {
                    format!("{prefix}{player}, your guess ({remaining}s left):")
                }
            }
        }
    }

    fn show_prompt(&mut self) {
        let mut text = self.prompt_text();
        let reconnecting = self.seats.iter().any(|seat| {
            seat.session
                .sync_status()
                .is_some_and(|status| status.is_reconnecting())
        });
        if reconnecting {
            text.push_str(" (relay unreachable, reconnecting...)");
        }
        if self.last_prompt.as_ref() != Some(&text) {
            println!("{text}");
            self.last_prompt = Some(text);
        }
    }

    fn handle_line(&mut self, line: &str, now: Instant) -> Flow {
        match line {
            "quit" | "exit" => return Flow::Quit,
            "history" => print_history(&self.seats[0].session.history()),
            "again" if self.state().is_some_and(MatchState::is_over) => {
                for seat in &mut self.seats {
                    if let Err(err) = seat.session.restart(now) {
                        eprintln!("{}{err}", seat.prefix());
                    }
                }
                if let Some(state) = self.state() {
                    println!("match {} started", state.id());
                }
            }
            input => {
                if let Some(prompt) = self.prompt()
                    && let Err(err) = self.act(prompt, input)
                {
                    eprintln!("{err}");
                }
            }
        }
        self.last_prompt = None;
        Flow::Continue
    }

    fn act(&mut self, prompt: Prompt, input: &str) -> Result<(), SessionError> {
        let seat = &mut self.seats[prompt.seat];
        match prompt.phase {
            Phase::Handoff { .. } => seat.session.complete_handoff(),
            Phase::SettingSecret(_) => seat.session.submit_secret(prompt.player, input),
            _ => {
                let outcome = seat.session.submit_guess(prompt.player, input)?;
                report_guess(&seat.prefix(), prompt.player, input, &outcome);
                Ok(())
            }
        }
    }

    fn advance(&mut self, now: Instant) {
        for seat in &mut self.seats {
            let events = match seat.session.advance(now) {
                Ok(events) => events,
                Err(err) => {
                    log::error!("{}{err}", seat.prefix());
                    continue;
                }
            };
            for event in events {
                match event {
                    SessionEvent::CpuGuessed { guess, feedback } => {
                        println!("computer guessed {guess}: {feedback}");
                    }
                    SessionEvent::TimedOut {
                        player,
                        guess,
                        feedback,
                    } => {
                        println!("{player} ran out of time, played {guess}: {feedback}");
                        self.last_prompt = None;
                    }
                    SessionEvent::OpponentJoined
                    | SessionEvent::OpponentSecretSet
                    | SessionEvent::OpponentGuessed { .. }
                    | SessionEvent::MatchOver { .. } => {}
                }
            }
        }
    }

    fn exit(&mut self) {
        for seat in &mut self.seats {
            seat.session.exit();
        }
    }
}

fn report_guess(prefix: &str, player: PlayerId, input: &str, outcome: &GuessOutcome) {
    println!("{prefix}{player} guessed {input}: {}", outcome.feedback());
}

fn print_history(records: &[MatchRecord]) {
    for record in records {
        println!(
            "match {}: {} won in {} rounds ({} digits, {})",
            record.match_id, record.winner, record.rounds, record.config.length, record.config.mode
        );
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn play(table: &mut Table) {
    let input = spawn_stdin_reader();
    loop {
        table.show_prompt();
        let _ = io::stdout().flush();
        let flow = match input.recv_timeout(POLL_INTERVAL) {
            Ok(line) => table.handle_line(line.trim(), Instant::now()),
            Err(RecvTimeoutError::Timeout) => Flow::Continue,
            Err(RecvTimeoutError::Disconnected) => Flow::Quit,
        };
        if matches!(flow, Flow::Quit) {
            break;
        }
        table.advance(Instant::now());
    }
    table.exit();
}

fn run(args: Args) -> Result<(), SessionError> {
    let mut settings = Settings::default();
    settings.cpu.think_delay = Duration::from_millis(args.think_delay_ms);
    settings.storage.data_dir = args.data_dir;
    log::debug!("using data directory {}", settings.storage.data_dir.display());

    let now = Instant::now();
    match args.command {
        Some(Command::History) => {
            let records: Vec<_> = [false, true]
                .into_iter()
                .flat_map(|online| Table::new(&settings, online).seats[0].session.history())
                .collect();
            if records.is_empty() {
                println!("no finished matches yet");
            }
            print_history(&records);
        }
        Some(Command::Resume) => {
            let mut table = Table::new(&settings, false);
            if !table.resume(now)? {
                table = Table::new(&settings, true);
                if !table.resume(now)? {
                    println!("no saved match to resume");
                    return Ok(());
                }
            }
            play(&mut table);
        }
        Some(Command::Play(play_args)) => {
            let mut table = Table::new(&settings, play_args.mode == Mode::Online);
            table.start(&play_args, now)?;
            play(&mut table);
        }
        None => {
            let mut table = Table::new(&settings, false);
            table.start(&PlayArgs::default(), now)?;
            play(&mut table);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
