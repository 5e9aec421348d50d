//! Headless battle runner implementation.
//!
//! Reads [`Command`]s one JSON line at a time, applies them to a single
//! [`Battle`], and writes [`Response`]s back as JSON lines.

use std::io::{self, BufRead, Write};

use battle_core::components::{Team, UnitId};
use battle_core::grid::Cell;
use battle_core::math::Vec2;
use battle_core::simulation::{Battle, Phase};
use battle_core::unit_kind::UnitKind;
use tracing::{debug, info, warn};

use crate::protocol::{Command, Response};
use crate::scenario::{Scenario, ScenarioError};

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Output state after every `tick` command (vs only on query).
    pub auto_state_output: bool,
}

/// Headless runner for externally controlled battles.
pub struct HeadlessRunner {
    battle: Battle,
    config: HeadlessConfig,
}

impl HeadlessRunner {
    /// Wrap an existing battle.
    pub fn new(battle: Battle, config: HeadlessConfig) -> Self {
        Self { battle, config }
    }

    /// Build the scenario's battle and wrap it.
    pub fn from_scenario(scenario: &Scenario, config: HeadlessConfig) -> Result<Self, ScenarioError> {
        Ok(Self::new(scenario.build_battle(None)?, config))
    }

    /// The battle being driven.
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Parse and handle one input line.
    ///
    /// Blank lines produce nothing; malformed lines produce an error response.
    pub fn handle_line(&mut self, line: &str) -> Vec<Response> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        match Command::from_json(line) {
            Ok(cmd) => self.handle(cmd),
            Err(e) => {
                warn!(error = %e, "Unparseable command");
                vec![Response::error(format!("Parse error: {e}"), None)]
            }
        }
    }

    /// Apply one command and collect the responses.
    pub fn handle(&mut self, cmd: Command) -> Vec<Response> {
        let cmd_name = cmd.name();
        debug!(cmd = cmd_name, "Handling command");

        match cmd {
            Command::Select { kind } => match UnitKind::lookup(&kind) {
                Some(unit_kind) if self.battle.select_unit_type(unit_kind) => vec![Response::ack(cmd_name)],
                Some(_) => vec![Response::error(format!("Unit type '{kind}' is locked"), Some(cmd_name))],
                None => vec![Response::error(format!("Unknown unit type '{kind}'"), Some(cmd_name))],
            },

            Command::Place { x, y, kind, team } => {
                let placed = match (kind, team) {
                    (None, None) => self.battle.place_selected(x, y),
                    (kind, team) => {
                        let Some(kind) = kind.as_deref().map(UnitKind::from_name).or(self.battle.selected()) else {
                            return vec![Response::error("No unit type selected", Some(cmd_name))];
                        };
                        let Some(team) = team.or_else(|| self.territory_at(x, y)) else {
                            return vec![Response::error("Point is outside the battlefield", Some(cmd_name))];
                        };
                        self.battle.place_unit(kind, team, x, y)
                    }
                };
                self.placed_response(placed, cmd_name)
            }

            Command::PlaceCell { kind, team, col, row } => {
                let placed = self.battle.place_in_cell(
                    UnitKind::from_name(&kind),
                    team,
                    Cell::new(col, row),
                );
                self.placed_response(placed, cmd_name)
            }

            Command::Remove { col, row } => match self.battle.remove_unit_at(col, row) {
                Some(_) => vec![Response::ack(cmd_name)],
                None => vec![Response::error(
                    format!("No removable unit at ({col}, {row})"),
                    Some(cmd_name),
                )],
            },

            Command::Start => self.transition(Battle::start, cmd_name),
            Command::Pause => self.transition(Battle::pause, cmd_name),
            Command::Resume => self.transition(Battle::resume, cmd_name),

            Command::Reset => {
                self.battle.reset();
                vec![Response::ack(cmd_name)]
            }

            Command::Speed { multiplier } => {
                let applied = self.battle.set_time_scale(multiplier);
                if (applied - multiplier).abs() > f32::EPSILON {
                    warn!(requested = multiplier, applied, "Invalid time scale replaced");
                }
                vec![Response::ack(cmd_name)]
            }

            Command::Tick { count } => self.run_ticks(count),

            Command::Query => vec![self.state()],

            Command::Quit => vec![Response::Bye],
        }
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// Writes the ready line first.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        output.write_all(Response::ready(self.battle.current_tick()).to_json_line().as_bytes())?;
        output.flush()?;

        for line in input.lines() {
            let responses = self.handle_line(&line?);
            let quit = responses.iter().any(|r| matches!(r, Response::Bye));
            for response in &responses {
                output.write_all(response.to_json_line().as_bytes())?;
            }
            output.flush()?;
            if quit {
                info!("Quit requested");
                return Ok(());
            }
        }
        info!("Input closed");
        Ok(())
    }

    /// Run the command loop on stdin/stdout.
    pub fn run_stdio(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    fn transition(&mut self, action: fn(&mut Battle) -> bool, cmd_name: &str) -> Vec<Response> {
        if action(&mut self.battle) {
            vec![Response::ack(cmd_name)]
        } else {
            vec![Response::error(
                format!("Cannot {cmd_name} while {}", phase_name(self.battle.phase())),
                Some(cmd_name),
            )]
        }
    }

    fn run_ticks(&mut self, count: u32) -> Vec<Response> {
        if !self.battle.is_running() {
            return vec![Response::error(
                format!("Battle is not running ({})", phase_name(self.battle.phase())),
                Some("tick"),
            )];
        }

        let (mut damage, mut heals, mut deaths, mut spawned) = (0, 0, 0, 0);
        let mut outcome = None;
        for _ in 0..count {
            let events = self.battle.tick();
            damage += events.damage.len();
            heals += events.heals.len();
            deaths += events.deaths.len();
            spawned += events.spawned.len();
            if events.outcome.is_some() {
                outcome = events.outcome;
                break;
            }
        }

        let tick = self.battle.current_tick();
        let mut responses = vec![Response::Ticked {
            tick,
            damage,
            heals,
            deaths,
            spawned,
            projectiles: self.battle.roster().projectiles().len(),
        }];
        if let Some(outcome) = outcome {
            responses.push(Response::BattleOver { outcome, ticks: tick });
        }
        if self.config.auto_state_output {
            responses.push(self.state());
        }
        responses
    }

    fn state(&self) -> Response {
        Response::State {
            snapshot: self.battle.snapshot(),
            hash: self.battle.state_hash(),
        }
    }

    fn territory_at(&self, x: f32, y: f32) -> Option<Team> {
        let grid = self.battle.grid();
        grid.cell_at(Vec2::new(x, y)).map(|cell| grid.territory(cell))
    }

    fn placed_response(&self, placed: Option<UnitId>, cmd_name: &str) -> Vec<Response> {
        match placed.and_then(|id| self.battle.roster().get(id)) {
            Some(unit) => vec![Response::Placed {
                unit_id: unit.id.0,
                kind: unit.kind.as_str().to_string(),
                team: unit.team,
                x: unit.position.x,
                y: unit.position.y,
            }],
            None => vec![Response::error("Placement rejected", Some(cmd_name))],
        }
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Setup => "in setup",
        Phase::Running => "running",
        Phase::Paused => "paused",
        Phase::Finished(_) => "finished",
    }
}
