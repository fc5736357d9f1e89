//! Players.
//!
//! An [`Agent`] receives a board snapshot, the previous move and the number
//! of stones placed, and answers with a move. Search-based agents also
//! return the visit distribution behind their choice, which self-play
//! records as the policy target.

use std::collections::VecDeque;

use crate::core::{Board, Color, Error, GameRng, Result};
use crate::mcts::{MctsConfig, MctsSearch};
use crate::nn::Predictor;

/// A move chosen by an agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentMove {
    /// Linear index of the move.
    pub action: usize,

    /// Distribution over all actions the move was drawn from, if the agent
    /// has one.
    pub distribution: Option<Vec<f64>>,
}

impl AgentMove {
    /// A move without a distribution.
    pub fn bare(action: usize) -> Self {
        Self {
            action,
            distribution: None,
        }
    }
}

/// Something that can play a side of a game.
pub trait Agent {
    /// Color this agent plays.
    fn color(&self) -> Color;

    /// Switch sides. Self-play calls this before every move.
    fn set_color(&mut self, color: Color);

    /// Choose a move for `board`, where `last_move` is the move that
    /// produced it and `stone_num` the number of stones on it.
    fn play(&mut self, board: &Board, last_move: Option<usize>, stone_num: usize) -> Result<AgentMove>;

    /// Forget everything about the current game.
    fn reset(&mut self) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn color(&self) -> Color {
        (**self).color()
    }

    fn set_color(&mut self, color: Color) {
        (**self).set_color(color);
    }

    fn play(&mut self, board: &Board, last_move: Option<usize>, stone_num: usize) -> Result<AgentMove> {
        (**self).play(board, last_move, stone_num)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Agent backed by a tree search.
///
/// In self-play mode one agent plays both colors and its tree follows every
/// move through `last_move`. Otherwise the tree also advances past the
/// agent's own move, so two agents can face each other.
pub struct MctsAgent<P: Predictor> {
    search: MctsSearch<P>,
}

impl<P: Predictor> MctsAgent<P> {
    /// Create an agent playing `color`.
    pub fn new(predictor: P, config: MctsConfig, color: Color) -> Result<Self> {
        Ok(Self {
            search: MctsSearch::new(predictor, config, color)?,
        })
    }

    /// Switch self-play mode.
    pub fn set_self_play(&mut self, is_self_play: bool) {
        self.search.set_self_play(is_self_play);
    }

    /// Underlying search.
    pub fn search(&self) -> &MctsSearch<P> {
        &self.search
    }

    /// Underlying search, mutably.
    pub fn search_mut(&mut self) -> &mut MctsSearch<P> {
        &mut self.search
    }
}

impl<P: Predictor> Agent for MctsAgent<P> {
    fn color(&self) -> Color {
        self.search.color()
    }

    fn set_color(&mut self, color: Color) {
        self.search.set_color(color);
    }

    fn play(&mut self, board: &Board, last_move: Option<usize>, stone_num: usize) -> Result<AgentMove> {
        let result = self.search.act_on_index(board, last_move, stone_num)?;
        Ok(AgentMove {
            action: result.action,
            distribution: Some(result.distribution),
        })
    }

    fn reset(&mut self) {
        self.search.reset();
    }
}

/// Plays uniformly among the empty cells.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    color: Color,
    rng: GameRng,
}

impl RandomAgent {
    /// Create a random agent with a seeded generator.
    pub fn new(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: GameRng::new(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn play(&mut self, board: &Board, _last_move: Option<usize>, _stone_num: usize) -> Result<AgentMove> {
        let empty: Vec<usize> = (0..board.area()).filter(|&i| board.is_empty_at(i)).collect();
        self.rng
            .choose(&empty)
            .map(|&action| AgentMove::bare(action))
            .ok_or(Error::NoLegalActions)
    }
}

/// Replays a fixed list of moves, one per turn.
///
/// Stands in for a human player in headless games and tests.
#[derive(Clone, Debug)]
pub struct ScriptedAgent {
    color: Color,
    script: Vec<usize>,
    remaining: VecDeque<usize>,
}

impl ScriptedAgent {
    /// Create an agent that plays `moves` in order.
    pub fn new(color: Color, moves: impl IntoIterator<Item = usize>) -> Self {
        let script: Vec<usize> = moves.into_iter().collect();
        Self {
            color,
            remaining: script.iter().copied().collect(),
            script,
        }
    }

    /// Moves not played yet.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

impl Agent for ScriptedAgent {
    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn play(&mut self, _board: &Board, _last_move: Option<usize>, _stone_num: usize) -> Result<AgentMove> {
        self.remaining
            .pop_front()
            .map(AgentMove::bare)
            .ok_or(Error::NoLegalActions)
    }

    /// Rewind the script.
    fn reset(&mut self) {
        self.remaining = self.script.iter().copied().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::UniformPredictor;

    #[test]
    fn test_random_agent_plays_empty_cells() {
        let mut board = Board::new(3);
        for i in 0..8 {
            board.place(i, if i % 2 == 0 { Color::Black } else { Color::White });
        }
        let mut agent = RandomAgent::new(Color::White, 3);

        let mv = agent.play(&board, Some(7), 8).unwrap();
        assert_eq!(mv, AgentMove::bare(8));

        board.place(8, Color::Black);
        assert_eq!(agent.play(&board, Some(8), 9), Err(Error::NoLegalActions));
    }

    #[test]
    fn test_random_agent_is_deterministic() {
        let board = Board::new(15);
        let mut a = RandomAgent::new(Color::Black, 99);
        let mut b = RandomAgent::new(Color::Black, 99);

        for _ in 0..5 {
            assert_eq!(a.play(&board, None, 0).unwrap(), b.play(&board, None, 0).unwrap());
        }
    }

    #[test]
    fn test_scripted_agent() {
        let board = Board::new(9);
        let mut agent = ScriptedAgent::new(Color::Black, [40, 41]);

        assert_eq!(agent.play(&board, None, 0).unwrap().action, 40);
        assert_eq!(agent.play(&board, None, 2).unwrap().action, 41);
        assert_eq!(agent.remaining(), 0);
        assert_eq!(agent.play(&board, None, 4), Err(Error::NoLegalActions));

        agent.reset();
        assert_eq!(agent.remaining(), 2);
    }

    #[test]
    fn test_mcts_agent_returns_distribution() {
        let config = MctsConfig::default()
            .with_board_size(7)
            .with_simulations(20)
            .with_self_play(false);
        let mut agent = MctsAgent::new(UniformPredictor, config, Color::Black).unwrap();

        let mv = agent.play(&Board::new(7), None, 0).unwrap();
        let pi = mv.distribution.unwrap();

        assert_eq!(pi.len(), 49);
        assert!(pi[mv.action] > 0.0);
        assert_eq!(agent.color(), Color::Black);

        agent.set_color(Color::White);
        assert_eq!(agent.color(), Color::White);
    }

    #[test]
    fn test_boxed_agent() {
        let mut agent: Box<dyn Agent> = Box::new(ScriptedAgent::new(Color::White, [5]));
        assert_eq!(agent.color(), Color::White);
        assert_eq!(agent.play(&Board::new(3), None, 0).unwrap().action, 5);
    }
}
