use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};
use tminus::{
    alarm::{AlarmSink, Silent, TerminalBell},
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    countdown::Variant,
    logging::init_tracing,
    runtime::{CrosstermEventSource, FixedTicker, Runner, Ticker, TimerEvent, TimerEventSource},
    time_format::parse_time,
    ui,
};
use tracing::info;

const TICK_RATE_MS: u64 = 100;

/// color-coded countdown timer with an optional alarm
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal countdown timer with a color-coded urgency display."
)]
pub struct Cli {
    /// countdown length as HH:MM:SS
    #[clap(short = 'd', long, value_parser = parse_time)]
    duration: Option<i64>,

    /// widget variant; basic has no alarm or mute
    #[clap(long, value_enum)]
    variant: Option<Variant>,

    /// start with the alarm muted
    #[clap(short = 'm', long)]
    mute: bool,

    /// never ring the terminal bell
    #[clap(long)]
    no_bell: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// input poll interval in milliseconds
    #[clap(long, default_value_t = TICK_RATE_MS, hide = true)]
    tick_ms: u64,
}

impl Cli {
    /// Overlay command line flags on the stored defaults
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if self.mute {
            config.muted = true;
        }
        if self.no_bell {
            config.bell = false;
        }
        config
    }
}

fn build_app(config: &Config) -> App<Box<dyn AlarmSink>> {
    let alarm: Box<dyn AlarmSink> = if config.rings_bell() {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Silent)
    };
    App::new(Controller::new(config.countdown(), alarm))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved defaults");
    }

    let mut app = build_app(&config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(cli.tick_ms.max(1))),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, A: AlarmSink, E: TimerEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step();
        let now = Instant::now();

        let mut dirty = match event {
            TimerEvent::Tick => false,
            TimerEvent::Resize => true,
            TimerEvent::Scroll(direction) => {
                app.on_scroll(direction, now);
                true
            }
            TimerEvent::Key(key) => {
                if app.on_key(key, now) == Flow::Quit {
                    break;
                }
                true
            }
        };

        // steady input must not starve the countdown
        if app.on_tick(now) > 0 {
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    info!("exiting");
    Ok(())
}
