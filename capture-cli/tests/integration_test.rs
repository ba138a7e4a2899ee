//! Integration tests for the capture agents
//!
//! Tests the full stack: layouts, the arena game state, search agents and
//! match play.

use capture_arena::{play_match, team_of, GameState, Layout, MatchConfig, TeamSetup};
use capture_core::{
    Action, AgentConfig, Cell, Decision, Observation, Role, RotationPolicy, SearchAgent, Team,
    ACTIONS,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn small_state(moves: u32) -> GameState {
    GameState::new(Layout::builtin("small").unwrap(), moves)
}

fn team(name: &str, first: AgentConfig, second: AgentConfig) -> TeamSetup {
    TeamSetup {
        name: name.to_string(),
        agents: vec![first, second],
    }
}

fn searchers() -> TeamSetup {
    team(
        "searchers",
        AgentConfig::for_role(Role::Offense).with_depth(2),
        AgentConfig::for_role(Role::Defense)
            .with_depth(1)
            .with_rotation(RotationPolicy::NearestInvader),
    )
}

fn baseline() -> TeamSetup {
    team(
        "baseline",
        AgentConfig::for_role(Role::Baseline).with_depth(1),
        AgentConfig::for_role(Role::Baseline).with_depth(1),
    )
}

fn quick(games: usize, max_moves: u32, seed: u64) -> MatchConfig {
    MatchConfig {
        games,
        max_moves,
        seed,
        parallel: false,
    }
}

// ============================================================================
// ARENA
// ============================================================================

#[test]
fn test_opponents_hidden_at_spawn() {
    let state = small_state(100);
    let red_view = state.observe(Team::Red);

    for agent in red_view.agents_on(Team::Blue) {
        assert!(red_view.position(agent).is_none());
        assert!(red_view.legal_actions(agent).is_empty());
    }
    for agent in red_view.agents_on(Team::Red) {
        assert!(red_view.position(agent).is_some());
        let legal = red_view.legal_actions(agent);
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|action| ACTIONS.contains(action)));
    }
}

#[test]
fn test_hidden_opponents_keep_their_spawns() {
    let view = small_state(100).observe(Team::Red);
    let mut agent = SearchAgent::new(0, AgentConfig::for_role(Role::Defense).with_seed(2)).unwrap();
    agent.initialize(&view);

    let memory = agent.memory().unwrap();
    for opponent in view.agents_on(Team::Blue) {
        assert!(view.position(opponent).is_none());
        assert_eq!(memory.opponent_spawn(opponent), Some(view.spawn(opponent).into()));
    }
}

#[test]
fn test_spawns_alternate_teams() {
    let state = small_state(100);
    assert_eq!(state.agent_count(), 4);
    for agent in 0..4 {
        assert_eq!(state.team_of(agent), team_of(agent));
    }
    assert_eq!(state.agents_on(Team::Red), vec![0, 2]);
    assert_eq!(state.agents_on(Team::Blue), vec![1, 3]);
}

#[test]
fn test_maze_distance_respects_walls() {
    let state = small_state(100);
    let a = Cell::new(2, 1);
    let b = Cell::new(2, 3);
    // (2, 2) is a wall, so the path detours
    assert!(state.maze_distance(a, b) > a.manhattan(b) as f64);
    assert_eq!(state.maze_distance(a, a), 0.0);
}

// ============================================================================
// AGENTS ON THE ARENA
// ============================================================================

#[test]
fn test_agent_picks_legal_action_from_spawn() {
    let state = small_state(100);
    let view = state.observe(Team::Red);

    let mut agent = SearchAgent::new(0, AgentConfig::for_role(Role::Offense).with_seed(1)).unwrap();
    agent.initialize(&view);
    let decision = agent.choose_action(&view).unwrap();

    let action = decision.action().unwrap();
    assert!(view.legal_actions(0).contains(&action));
    assert!(agent.last_stats().nodes > 0);
}

#[test]
fn test_reflex_agent_does_not_stop() {
    let state = small_state(100);
    let view = state.observe(Team::Red);

    let config = AgentConfig::for_role(Role::Offense).with_depth(0).with_seed(5);
    let mut agent = SearchAgent::new(0, config).unwrap();
    agent.initialize(&view);

    match agent.choose_action(&view).unwrap() {
        Decision::Searched { action, .. } => assert_ne!(action, Action::Stop),
        other => panic!("expected a searched decision, got {:?}", other),
    }
}

#[test]
fn test_agents_drive_a_game_forward() {
    let mut state = small_state(24);
    let setups = [AgentConfig::for_role(Role::Offense), AgentConfig::for_role(Role::Defense)];
    let mut agents: Vec<SearchAgent<GameState>> = (0..state.agent_count())
        .map(|index| {
            let config = setups[(index / 2) % 2].clone().with_depth(1).with_seed(index as u64);
            let mut agent = SearchAgent::new(index, config).unwrap();
            agent.initialize(&state.observe(team_of(index)));
            agent
        })
        .collect();

    let mut moves = 0;
    while !state.is_over() {
        let index = moves % agents.len();
        let view = state.observe(team_of(index));
        let action = agents[index].choose_action(&view).unwrap().action().unwrap_or(Action::Stop);
        state = state.successor(index, action);
        moves += 1;
    }

    assert!(moves <= 24);
    assert!(agents.iter().all(|agent| agent.memory().is_some()));
}

// ============================================================================
// MATCH PLAY
// ============================================================================

#[test]
fn test_full_match_on_small_layout() {
    let layout = Layout::builtin("small").unwrap();
    let result = play_match(layout, &searchers(), &baseline(), quick(2, 40, 11)).unwrap();

    assert_eq!(result.games_played, 2);
    assert_eq!(result.first_wins + result.second_wins + result.draws, 2);
    assert_eq!(result.game_outcomes.len(), 2);
    for outcome in &result.game_outcomes {
        assert!(outcome.moves <= 40);
        assert_eq!(outcome.faults, 0);
    }

    // Sides alternate between games
    assert_eq!(result.game_outcomes[0].red, "searchers");
    assert_eq!(result.game_outcomes[1].red, "baseline");
}

#[test]
fn test_match_is_reproducible() {
    let run = || {
        let layout = Layout::builtin("small").unwrap();
        play_match(layout, &searchers(), &baseline(), quick(2, 30, 99)).unwrap()
    };
    let a = run();
    let b = run();

    for (x, y) in a.game_outcomes.iter().zip(&b.game_outcomes) {
        assert_eq!(x.red_score, y.red_score);
        assert_eq!(x.moves, y.moves);
        assert_eq!(x.red_food_left, y.red_food_left);
        assert_eq!(x.blue_food_left, y.blue_food_left);
    }
}

#[test]
fn test_team_from_json_config() {
    let offense = AgentConfig::from_json(r#"{ "role": "offense", "depth": 1, "rotation": "nearest" }"#)
        .unwrap();
    let defense = AgentConfig::from_json(r#"{ "role": "defense", "depth": 0 }"#).unwrap();
    let custom = team("custom", offense, defense);

    let layout = Layout::builtin("small").unwrap();
    let result = play_match(layout, &custom, &baseline(), quick(1, 16, 3)).unwrap();
    assert_eq!(result.games_played, 1);
    assert_eq!(result.game_outcomes[0].faults, 0);
}

#[test]
fn test_custom_layout_file() {
    let path = std::env::temp_dir().join("capture_integration_layout.lay");
    std::fs::write(&path, "%%%%%%%%\n%1.o..2%\n%3....4%\n%%%%%%%%\n").unwrap();

    let layout = Layout::resolve(path.to_str().unwrap()).unwrap();
    assert_eq!(layout.width, 8);
    assert_eq!(layout.agent_count(), 4);

    let result = play_match(layout, &baseline(), &baseline(), quick(1, 8, 0)).unwrap();
    assert_eq!(result.games_played, 1);

    let _ = std::fs::remove_file(path);
}
