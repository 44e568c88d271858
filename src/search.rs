use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use log::{debug, info, trace};
use rustc_hash::FxHashMap;

use crate::board::{BoardState, Move, StateKey};
use crate::config::{SearchConfig, GOAL_CELL};
use crate::error::SearchError;
use crate::piece::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Initialized,
    Running,
    Found,
    Exhausted,
}

/// Counters available once a search has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards taken off the frontier and expanded.
    pub positions_tested: usize,
    /// Distinct boards recorded in the visited map, start included.
    pub states_discovered: usize,
    /// Boards on the solution path, start and goal included.
    pub solution_length: Option<usize>,
}

/// Boards from start to goal, and the moves between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub states: Vec<BoardState>,
    pub moves: Vec<Move>,
}

impl Solution {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn start(&self) -> Option<&BoardState> {
        self.states.first()
    }

    pub fn goal(&self) -> Option<&BoardState> {
        self.states.last()
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    state: BoardState,
    parent: Option<StateKey>,
    via: Option<Move>,
    depth: usize,
}

/// Breadth-first search from one start board towards any board accepted by
/// `goal`.
pub struct Search<G> {
    goal: G,
    config: SearchConfig,
    status: SearchStatus,
    frontier: VecDeque<(BoardState, usize)>,
    visited: FxHashMap<StateKey, Node>,
    positions_tested: usize,
    deepest: usize,
    found: Option<StateKey>,
}

impl<G> Search<G>
where
    G: Fn(&BoardState) -> bool,
{
    pub fn new(start: BoardState, goal: G) -> Self {
        Self::with_config(start, goal, SearchConfig::default())
    }

    pub fn with_config(start: BoardState, goal: G, config: SearchConfig) -> Self {
        let mut visited = FxHashMap::default();
        visited.insert(
            start.key(),
            Node {
                state: start,
                parent: None,
                via: None,
                depth: 0,
            },
        );
        let mut frontier = VecDeque::new();
        frontier.push_back((start, 0));

        Self {
            goal,
            config,
            status: SearchStatus::Initialized,
            frontier,
            visited,
            positions_tested: 0,
            deepest: 0,
            found: None,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            positions_tested: self.positions_tested,
            states_discovered: self.visited.len(),
            solution_length: self.found.map(|key| self.path_len(key)),
        }
    }

    /// Number of moves from the start to `state`, if it has been discovered.
    pub fn depth_of(&self, state: &BoardState) -> Option<usize> {
        self.visited.get(&state.key()).map(|n| n.depth)
    }

    /// Every board discovered so far, in no particular order.
    pub fn discovered(&self) -> impl Iterator<Item = &BoardState> + '_ {
        self.visited.values().map(|n| &n.state)
    }

    /// Expands the oldest frontier board. Stops at the first new successor
    /// that satisfies the goal.
    pub fn step(&mut self) -> SearchStatus {
        match self.status {
            SearchStatus::Found | SearchStatus::Exhausted => return self.status,
            SearchStatus::Initialized => {
                debug!(
                    "starting search from {:#x} (depth limit {:?})",
                    self.frontier.front().map_or(0, |(s, _)| s.key().0),
                    self.config.max_depth
                );
                self.status = SearchStatus::Running;
            }
            SearchStatus::Running => {}
        }

        let Some((current, depth)) = self.frontier.pop_front() else {
            info!(
                "search exhausted after {} positions ({} discovered)",
                self.positions_tested,
                self.visited.len()
            );
            self.status = SearchStatus::Exhausted;
            return self.status;
        };
        self.positions_tested += 1;

        if depth > self.deepest {
            self.deepest = depth;
            trace!(
                "depth {}: {} tested, {} discovered",
                depth,
                self.positions_tested,
                self.visited.len()
            );
        }

        if self.config.max_depth.is_some_and(|max| depth >= max) {
            return self.status;
        }

        let parent = current.key();
        for (mv, next) in current.successors() {
            let key = next.key();
            let Entry::Vacant(slot) = self.visited.entry(key) else {
                continue;
            };
            slot.insert(Node {
                state: next,
                parent: Some(parent),
                via: Some(mv),
                depth: depth + 1,
            });
            self.frontier.push_back((next, depth + 1));

            if (self.goal)(&next) {
                info!(
                    "goal reached at depth {} after {} positions",
                    depth + 1,
                    self.positions_tested
                );
                self.found = Some(key);
                self.status = SearchStatus::Found;
                break;
            }
        }
        self.status
    }

    /// Runs until a goal board is found or the frontier runs dry.
    pub fn run(&mut self) -> Result<Solution, SearchError> {
        loop {
            match self.step() {
                SearchStatus::Found => break,
                SearchStatus::Exhausted => {
                    return Err(SearchError::NoSolution {
                        positions_tested: self.positions_tested,
                    })
                }
                SearchStatus::Initialized | SearchStatus::Running => {}
            }
        }
        match self.found {
            Some(goal) => Ok(self.reconstruct(goal)),
            None => Err(SearchError::NoSolution {
                positions_tested: self.positions_tested,
            }),
        }
    }

    /// Follows parent links from `goal` back to the start.
    fn reconstruct(&self, goal: StateKey) -> Solution {
        let mut states = Vec::new();
        let mut moves = Vec::new();
        let mut cursor = Some(goal);
        while let Some(node) = cursor.and_then(|key| self.visited.get(&key)) {
            states.push(node.state);
            moves.extend(node.via);
            cursor = node.parent;
        }
        states.reverse();
        moves.reverse();
        Solution { states, moves }
    }

    fn path_len(&self, goal: StateKey) -> usize {
        self.visited.get(&goal).map_or(0, |n| n.depth + 1)
    }
}

/// Goal predicate: the big piece's anchor sits on `cell`.
pub fn big_at(cell: Cell) -> impl Fn(&BoardState) -> bool {
    move |state: &BoardState| state.big_anchor() == Some(cell)
}

/// The puzzle's own goal: big piece at the bottom centre.
pub fn big_at_exit(state: &BoardState) -> bool {
    Cell::new(GOAL_CELL).is_some_and(|goal| state.big_anchor() == Some(goal))
}

pub fn solve<G>(start: BoardState, goal: G) -> Result<Solution, SearchError>
where
    G: Fn(&BoardState) -> bool,
{
    Search::new(start, goal).run()
}

/// Parses `layout` and solves it; a malformed layout fails before searching.
pub fn solve_layout<G>(
    layout: &str,
    goal: G,
    config: SearchConfig,
) -> Result<(Solution, SearchStats), SearchError>
where
    G: Fn(&BoardState) -> bool,
{
    let start: BoardState = layout.parse()?;
    let mut search = Search::with_config(start, goal, config);
    let solution = search.run()?;
    Ok((solution, search.stats()))
}
