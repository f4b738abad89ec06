mod render;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

use pinpoint_engine::config::SessionConfig;
use pinpoint_engine::models::{team_color, Point};
use pinpoint_engine::session::{Input, Phase, Session};
use tracing_subscriber::EnvFilter;

fn load_session_config(path: &Path) -> Result<SessionConfig, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let config = SessionConfig::from_json(&data)
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;
    tracing::info!(rounds = config.rounds.len(), "Loaded round configuration");
    Ok(config)
}

fn parse_point(line: &str) -> Option<Point> {
    let (x, y) = line.trim().split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    Some(Point::new(x, y))
}

fn parse_team_count(line: &str) -> Option<u8> {
    line.trim().parse().ok().filter(|n| (1..=10u8).contains(n))
}

/// Team count from the TEAMS env var, or an interactive prompt.
fn team_count(input: &mut impl BufRead) -> io::Result<u8> {
    if let Ok(value) = env::var("TEAMS") {
        if let Some(n) = parse_team_count(&value) {
            return Ok(n);
        }
        tracing::warn!(value = %value, "TEAMS is not a number between 1 and 10, asking instead");
    }
    loop {
        print!("number of teams (1-10): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        match parse_team_count(&line) {
            Some(n) => return Ok(n),
            None => println!("enter a whole number between 1 and 10"),
        }
    }
}

/// Feed one input to the engine; engine errors are user-facing and the game
/// keeps going.
fn dispatch(session: &mut Session, input: Input) {
    match session.handle(input) {
        Ok(outputs) => render::render_all(&outputs),
        Err(e) => println!("{e}"),
    }
}

/// Drive the session until it completes or stdin closes. The host plays the
/// renderer's part too: the map "loads" instantly from the configured
/// dimensions and MapReady fires before any guessing starts.
fn run(session: &mut Session, input: &mut impl BufRead) -> io::Result<()> {
    loop {
        match session.phase() {
            Phase::Loading => {
                let map = session.current_round().map.clone();
                tracing::info!(map = %map.file_name, round = session.round_index(), "loading map");
                dispatch(
                    session,
                    Input::MapReady {
                        natural_width: map.natural_width,
                        natural_height: map.natural_height,
                    },
                );
            }
            Phase::AwaitingGuesses => {
                let team = session.current_team();
                print!("team {} ({}), guess x,y or 'reveal!': ", team, team_color(team));
                io::stdout().flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Ok(());
                }
                let trimmed = line.trim();
                if trimmed == "reveal!" {
                    tracing::warn!(team, "operator forced an early reveal");
                    dispatch(session, Input::RequestReveal { force: true });
                } else if let Some(point) = parse_point(trimmed) {
                    dispatch(session, Input::ConfirmGuess { point });
                } else {
                    println!("enter two numbers like: 420, 350");
                }
            }
            Phase::AllGuessesIn => dispatch(session, Input::RequestReveal { force: false }),
            Phase::Revealed => {
                print!("press Enter for the next round... ");
                io::stdout().flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Ok(());
                }
                dispatch(session, Input::NextRound);
            }
            Phase::SessionComplete => return Ok(()),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let rounds_path =
        env::var("ROUNDS_PATH").unwrap_or_else(|_| "assets/rounds.json".to_string());
    let mut config = match load_session_config(Path::new(&rounds_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    config.team_count = match team_count(&mut input) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!(session = %session.id(), teams = session.team_count(), "session started");

    if let Err(e) = run(&mut session, &mut input) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUNDS_JSON: &str = r#"{
        "viewport": { "width": 900.0, "height": 740.0 },
        "rounds": [{
            "map": {
                "displayName": "Sweden",
                "fileName": "sweden.png",
                "naturalWidth": 1260.0,
                "naturalHeight": 1540.0
            },
            "target": { "mode": "pixel", "x": 512.0, "y": 444.0 }
        }]
    }"#;

    #[test]
    fn test_parse_point_accepts_spaces() {
        assert_eq!(parse_point("420, 350"), Some(Point::new(420.0, 350.0)));
        assert_eq!(parse_point(" 1.5,2.5 "), Some(Point::new(1.5, 2.5)));
    }

    #[test]
    fn test_parse_point_rejects_garbage() {
        assert_eq!(parse_point("420"), None);
        assert_eq!(parse_point("a,b"), None);
        assert_eq!(parse_point(""), None);
    }

    #[test]
    fn test_parse_team_count_range() {
        assert_eq!(parse_team_count("1"), Some(1));
        assert_eq!(parse_team_count(" 10 "), Some(10));
        assert_eq!(parse_team_count("0"), None);
        assert_eq!(parse_team_count("11"), None);
        assert_eq!(parse_team_count("three"), None);
    }

    #[test]
    fn test_load_session_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROUNDS_JSON.as_bytes()).unwrap();
        let config = load_session_config(file.path()).unwrap();
        assert_eq!(config.rounds.len(), 1);
        assert_eq!(config.rounds[0].map.file_name, "sweden.png");
    }

    #[test]
    fn test_load_session_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_session_config(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_team_count_reads_until_valid() {
        let mut input = io::Cursor::new(b"zero\n12\n4\n".to_vec());
        // TEAMS may leak in from the environment; only exercise the prompt
        // path when it is unset.
        if env::var("TEAMS").is_err() {
            assert_eq!(team_count(&mut input).unwrap(), 4);
        }
    }
}
