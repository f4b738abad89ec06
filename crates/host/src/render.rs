//! Text rendering of engine events. The engine never prints; everything the
//! players see goes through here.

use pinpoint_engine::models::{team_color, Standing};
use pinpoint_engine::session::Output;

pub fn render_all(outputs: &[Output]) {
    for output in outputs {
        render(output);
    }
}

pub fn render(output: &Output) {
    match output {
        Output::RoundOpened {
            round,
            map,
            prompt,
            current_team,
        } => {
            println!();
            println!("=== round {}: {} ===", round + 1, map.display_name);
            if let Some(prompt) = prompt {
                println!("{prompt}");
            }
            println!("team {current_team} goes first");
        }
        Output::GuessConfirmed {
            team,
            point,
            next_team,
        } => {
            println!(
                "team {team} locked in ({:.0}, {:.0}); team {next_team} is up",
                point.x, point.y
            );
        }
        Output::AllGuessesIn { .. } => println!("all guesses are in"),
        Output::RoundRevealed {
            target,
            forced,
            standings,
            scoreboard,
            ..
        } => {
            if *forced {
                println!("-- round closed early by the operator --");
            }
            println!("the target was at ({:.0}, {:.0})", target.x, target.y);
            for standing in standings {
                println!("  {}", standing_line(standing));
            }
            println!("running totals (lowest wins):");
            for row in scoreboard {
                println!("  team {}: {} pts", row.team, row.points);
            }
        }
        Output::RoundLoading { round, map } => {
            println!("next up, round {}: {}", round + 1, map.file_name);
        }
        Output::SessionComplete { final_standings } => {
            println!();
            println!("=== final standings ===");
            for (i, row) in final_standings.iter().enumerate() {
                println!(
                    "  {}. team {} ({}) with {} pts",
                    i + 1,
                    row.team,
                    team_color(row.team),
                    row.points
                );
            }
            if let Some(winner) = final_standings.first() {
                println!("team {} takes it!", winner.team);
            }
        }
    }
}

fn standing_line(standing: &Standing) -> String {
    let distance = if standing.distance.is_finite() {
        format!("{:.1} px", standing.distance)
    } else {
        "no guess".to_string()
    };
    let geo = standing
        .geo_km
        .map(|km| format!(" (~{km:.0} km)"))
        .unwrap_or_default();
    format!(
        "#{} team {}: {}{}, {} pt(s)",
        standing.rank, standing.team, distance, geo, standing.points
    )
}
