//! Pizza Dash headless runner
//!
//! Plays autopilot shifts at a fixed frame step and prints each result.
//! The browser build drives the library directly and has no entry point here.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;

    use pizza_dash::platform::{self, Authenticated};
    use pizza_dash::results::{Leaderboard, RecordStatus, record_best_effort};
    use pizza_dash::sim::{GameEvent, GamePhase, GameState, Outcome, TickInput, begin, tick};
    use pizza_dash::tuning::ExchangePolicy;
    use pizza_dash::{Ruleset, Settings};

    #[derive(Debug, Parser)]
    #[command(name = "pizza-dash", version)]
    #[command(about = "Run headless Pizza Dash shifts on autopilot")]
    struct Args {
        /// Run seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Balance preset: classic or extended
        #[arg(long, default_value = "classic", value_parser = parse_ruleset)]
        ruleset: Ruleset,

        /// Exchange booth behavior: every-frame or once-per-visit
        #[arg(long, default_value = "every-frame", value_parser = parse_policy)]
        exchange: ExchangePolicy,

        /// Simulation frame rate
        #[arg(long, default_value_t = 60)]
        frames_per_second: u32,

        /// Number of shifts to play
        #[arg(long, default_value_t = 1)]
        shifts: u32,
    }

    fn parse_ruleset(s: &str) -> Result<Ruleset, String> {
        Ruleset::parse(s).ok_or_else(|| format!("unknown ruleset '{s}' (classic, extended)"))
    }

    fn parse_policy(s: &str) -> Result<ExchangePolicy, String> {
        ExchangePolicy::parse(s)
            .ok_or_else(|| format!("unknown exchange policy '{s}' (every-frame, once-per-visit)"))
    }

    pub fn run() -> std::process::ExitCode {
        platform::init_logging();
        let args = Args::parse();

        let mut settings = Settings::load();
        settings.ruleset = args.ruleset;
        settings.exchange_policy = args.exchange;
        settings.autopilot = true;
        settings.seed_override = args.seed;

        let tuning = settings.tuning();
        if let Err(e) = tuning.validate() {
            log::error!("Invalid tuning: {}", e);
            return std::process::ExitCode::FAILURE;
        }

        let frame_ms = u64::from((1000 / args.frames_per_second.max(1)).max(1));
        let input = TickInput {
            avatar: None,
            autopilot: settings.autopilot,
        };
        let mut board = Leaderboard::load();
        let base_seed = settings.seed_or(rand::random());

        log::info!(
            "Pizza Dash (native) - {} rules, {}ms frames",
            settings.ruleset.as_str(),
            frame_ms
        );

        for shift in 0..args.shifts {
            let seed = base_seed.wrapping_add(u64::from(shift));
            let mut state = GameState::new(seed, tuning.clone());
            begin(&mut state, &Authenticated);

            while !state.is_over() {
                tick(&mut state, &input, frame_ms);
                for event in state.drain_events() {
                    if let GameEvent::Unlocked { unlock } = event {
                        println!(
                            "  [{:>3}s] unlocked {}",
                            state.time_remaining_secs,
                            unlock.label()
                        );
                    }
                }
            }

            let report = state.report();
            let outcome = match state.phase {
                GamePhase::Ended(Outcome::Win) => "TIME'S UP",
                _ => "LINE OVERFLOW",
            };
            let rank = board.potential_rank(report.score);
            let saved = record_best_effort(&mut board, &report);
            println!(
                "Shift {} (seed {}): {} - vault ${}, {} deliveries, oven level {}",
                shift + 1,
                seed,
                outcome,
                report.score,
                report.deliveries,
                state.production.level
            );
            match (rank, saved) {
                (Some(rank), RecordStatus::Saved) => println!("  leaderboard rank #{rank}"),
                (_, RecordStatus::Failed) => println!("  result not saved"),
                _ => {}
            }
        }

        std::process::ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point lives in the host page, this is just to satisfy the compiler
}
