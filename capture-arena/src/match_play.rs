//! Match play - repeated games between two teams
//!
//! Level 2 - Phase-level implementation

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use capture_core::{Action, AgentConfig, Decision, Observation, SearchAgent, Team};
use rayon::prelude::*;
use serde::Serialize;

use crate::distancer::Distancer;
use crate::layout::{team_of, Layout};
use crate::state::{GameState, DEFAULT_MOVES};

/// One side of a match
#[derive(Clone, Debug)]
pub struct TeamSetup {
    pub name: String,
    /// Configs handed out to the team's agents in index order, cycling
    pub agents: Vec<AgentConfig>,
}

/// How a match is played
#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    pub games: usize,
    pub max_moves: u32,
    /// Base seed; game `i` uses `seed + i`
    pub seed: u64,
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_moves: DEFAULT_MOVES,
            seed: 42,
            parallel: true,
        }
    }
}

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    pub red: String,
    pub blue: String,
    /// `None` on a level score
    pub winner: Option<Team>,
    /// Final score from red's side
    pub red_score: f64,
    pub moves: u32,
    /// Stuck escapes taken by all agents
    pub escapes: u32,
    /// Decisions that failed and were replaced by `Stop`
    pub faults: u32,
    pub red_food_left: usize,
    pub blue_food_left: usize,
}

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Wins for the first team
    pub first_wins: u32,
    /// Wins for the second team
    pub second_wins: u32,
    pub draws: u32,
    pub avg_moves: f32,
    pub games_played: u32,
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self {
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            avg_moves: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    /// Combine two results
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        let total_games = self.games_played + other.games_played;
        let avg_moves = if total_games > 0 {
            (self.avg_moves * self.games_played as f32 + other.avg_moves * other.games_played as f32)
                / total_games as f32
        } else {
            0.0
        };

        let mut game_outcomes = self.game_outcomes.clone();
        game_outcomes.extend(other.game_outcomes.iter().cloned());

        MatchResult {
            first_wins: self.first_wins + other.first_wins,
            second_wins: self.second_wins + other.second_wins,
            draws: self.draws + other.draws,
            avg_moves,
            games_played: total_games,
            game_outcomes,
        }
    }

    pub fn first_win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.first_wins as f32 / self.games_played as f32
        }
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }
}

/// Play a match between two teams (Level 2 phase)
///
/// Sides alternate each game: the first team plays red in even games.
pub fn play_match(layout: Layout, first: &TeamSetup, second: &TeamSetup, config: MatchConfig) -> Result<MatchResult> {
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }
    ensure!(!first.agents.is_empty(), "team {} has no agent configs", first.name);
    ensure!(!second.agents.is_empty(), "team {} has no agent configs", second.name);

    let distancer = Arc::new(Distancer::new(&layout));
    let layout = Arc::new(layout);
    let arena = Arena {
        layout: &layout,
        distancer: &distancer,
        max_moves: config.max_moves,
    };

    let play = |game: usize| {
        let seed = config.seed.wrapping_add(game as u64);
        let first_is_red = game % 2 == 0;
        let (red, blue) = if first_is_red { (first, second) } else { (second, first) };
        arena
            .play_game(red, blue, seed)
            .with_context(|| format!("game {} failed", game))
            .map(|outcome| (outcome, first_is_red))
    };

    let outcomes: Vec<(GameOutcome, bool)> = if config.parallel {
        (0..config.games).into_par_iter().map(play).collect::<Result<_>>()?
    } else {
        (0..config.games).map(play).collect::<Result<_>>()?
    };

    let result = aggregate_results(outcomes);
    tracing::info!(
        first = %first.name,
        second = %second.name,
        first_wins = result.first_wins,
        second_wins = result.second_wins,
        draws = result.draws,
        "match finished"
    );
    Ok(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Shared, read-only match context
struct Arena<'a> {
    layout: &'a Arc<Layout>,
    distancer: &'a Arc<Distancer>,
    max_moves: u32,
}

impl Arena<'_> {
    /// Play a single game
    ///
    /// Agent seeds derive from the game seed, so a game replays exactly from
    /// its seed whatever the agent configs say.
    fn play_game(&self, red: &TeamSetup, blue: &TeamSetup, seed: u64) -> Result<GameOutcome> {
        let mut state = GameState::with_distancer(
            Arc::clone(self.layout),
            Arc::clone(self.distancer),
            self.max_moves,
        );
        let mut agents = create_agents(&state, red, blue, seed)?;

        let mut moves = 0u32;
        let mut escapes = 0u32;
        let mut faults = 0u32;
        while !state.is_over() {
            let index = moves as usize % agents.len();
            let view = state.observe(team_of(index));
            let action = match agents[index].choose_action(&view) {
                Ok(decision) => {
                    if matches!(decision, Decision::Escaped { .. }) {
                        escapes += 1;
                    }
                    decision.action().unwrap_or(Action::Stop)
                }
                Err(err) => {
                    faults += 1;
                    tracing::warn!(agent = index, %err, "decision failed, substituting stop");
                    Action::Stop
                }
            };
            state = state.successor(index, action);
            moves += 1;
        }

        let outcome = GameOutcome {
            red: red.name.clone(),
            blue: blue.name.clone(),
            winner: state.leader(),
            red_score: state.red_score(),
            moves,
            escapes,
            faults,
            red_food_left: state.food(Team::Red).len(),
            blue_food_left: state.food(Team::Blue).len(),
        };
        tracing::debug!(
            red = %outcome.red,
            blue = %outcome.blue,
            score = outcome.red_score,
            moves,
            seed,
            "game finished"
        );
        Ok(outcome)
    }
}

/// Build and initialize one agent per spawn
fn create_agents(
    state: &GameState,
    red: &TeamSetup,
    blue: &TeamSetup,
    seed: u64,
) -> Result<Vec<SearchAgent<GameState>>> {
    (0..state.agent_count())
        .map(|index| {
            let team = match team_of(index) {
                Team::Red => red,
                Team::Blue => blue,
            };
            let config = team.agents[(index / 2) % team.agents.len()]
                .clone()
                .with_seed(seed.wrapping_mul(31).wrapping_add(index as u64));
            let mut agent = SearchAgent::new(index, config)
                .with_context(|| format!("invalid config for agent {} of {}", index, team.name))?;
            agent.initialize(&state.observe(team_of(index)));
            Ok(agent)
        })
        .collect()
}

/// Aggregate game outcomes into a match result
fn aggregate_results(outcomes: Vec<(GameOutcome, bool)>) -> MatchResult {
    let mut result = MatchResult::empty();
    let mut total_moves = 0u64;

    for (outcome, first_is_red) in outcomes {
        total_moves += outcome.moves as u64;
        match (outcome.winner, first_is_red) {
            (None, _) => result.draws += 1,
            (Some(Team::Red), true) | (Some(Team::Blue), false) => result.first_wins += 1,
            _ => result.second_wins += 1,
        }
        result.game_outcomes.push(outcome);
    }

    result.games_played = result.game_outcomes.len() as u32;
    if result.games_played > 0 {
        result.avg_moves = total_moves as f32 / result.games_played as f32;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_core::{Role, RotationPolicy};

    fn team(name: &str, depth: u32) -> TeamSetup {
        TeamSetup {
            name: name.to_string(),
            agents: vec![
                AgentConfig::for_role(Role::Offense).with_depth(depth),
                AgentConfig::for_role(Role::Defense).with_depth(depth),
            ],
        }
    }

    fn quick(games: usize, parallel: bool) -> MatchConfig {
        MatchConfig {
            games,
            max_moves: 120,
            seed: 7,
            parallel,
        }
    }

    fn outcome(winner: Option<Team>) -> GameOutcome {
        GameOutcome {
            red: "a".to_string(),
            blue: "b".to_string(),
            winner,
            red_score: 0.0,
            moves: 10,
            escapes: 0,
            faults: 0,
            red_food_left: 5,
            blue_food_left: 5,
        }
    }

    #[test]
    fn test_aggregate_attributes_sides() {
        let result = aggregate_results(vec![
            (outcome(Some(Team::Red)), true),
            (outcome(Some(Team::Red)), false),
            (outcome(Some(Team::Blue)), false),
            (outcome(None), true),
        ]);
        assert_eq!(result.first_wins, 2);
        assert_eq!(result.second_wins, 1);
        assert_eq!(result.draws, 1);
        assert_eq!(result.games_played, 4);
        assert_eq!(result.avg_moves, 10.0);
        assert_eq!(result.score_for_first(), 2.5);
    }

    #[test]
    fn test_match_result_combine() {
        let a = aggregate_results(vec![(outcome(Some(Team::Red)), true)]);
        let b = aggregate_results(vec![(outcome(None), true), (outcome(None), false)]);
        let combined = a.combine(&b);
        assert_eq!(combined.games_played, 3);
        assert_eq!(combined.first_wins, 1);
        assert_eq!(combined.draws, 2);
        assert_eq!(combined.game_outcomes.len(), 3);
        assert_eq!(MatchResult::empty().first_win_rate(), 0.0);
    }

    #[test]
    fn test_game_runs_to_budget() {
        let layout = Layout::builtin("small").unwrap();
        let result = play_match(layout, &team("a", 1), &team("b", 1), quick(1, false)).unwrap();
        assert_eq!(result.games_played, 1);

        let game = &result.game_outcomes[0];
        assert!(game.moves <= 120);
        assert_eq!(game.faults, 0);
        assert_eq!(game.red, "a");
        assert!(game.red_food_left <= 8 && game.blue_food_left <= 8);
    }

    #[test]
    fn test_games_replay_from_seed() {
        let layout = Layout::builtin("small").unwrap();
        let first = team("a", 2);
        let second = team("b", 1);
        let sequential = play_match(layout.clone(), &first, &second, quick(2, false)).unwrap();
        let parallel = play_match(layout, &first, &second, quick(2, true)).unwrap();

        for (s, p) in sequential.game_outcomes.iter().zip(&parallel.game_outcomes) {
            assert_eq!(s.red_score, p.red_score);
            assert_eq!(s.moves, p.moves);
            assert_eq!(s.red, p.red);
        }
        assert_eq!(sequential.game_outcomes[1].red, "b");
    }

    #[test]
    fn test_faults_substitute_stop() {
        let layout = Layout::builtin("small").unwrap();
        let broken = TeamSetup {
            name: "broken".to_string(),
            agents: vec![AgentConfig::for_role(Role::Offense)
                .with_depth(1)
                .with_rotation(RotationPolicy::Full)
                .with_weights(capture_core::WeightTable::from_pairs(&[("successorScore", 1.0)]))],
        };
        let config = MatchConfig {
            max_moves: 20,
            ..quick(1, false)
        };
        let result = play_match(layout, &broken, &team("b", 1), config).unwrap();
        let game = &result.game_outcomes[0];
        // Two red agents, five decisions each
        assert_eq!(game.faults, 10);
    }

    #[test]
    fn test_empty_team_rejected() {
        let layout = Layout::builtin("small").unwrap();
        let empty = TeamSetup {
            name: "empty".to_string(),
            agents: Vec::new(),
        };
        assert!(play_match(layout, &empty, &team("b", 1), quick(1, false)).is_err());
    }
}
