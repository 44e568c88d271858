use block_slider::{
    big_at_exit, solve, BoardState, Direction, Move, Piece, Search, SearchConfig, SearchError,
    Shape,
};

fn mv(shape: Shape, anchor: u8, direction: Direction) -> Move {
    Move {
        piece: Piece::new(shape, anchor).unwrap(),
        direction,
    }
}

#[test]
fn standard_puzzle_takes_114_moves_after_23540_positions() {
    let start = BoardState::standard().unwrap();
    let mut search = Search::new(start, big_at_exit);
    let solution = search.run().unwrap();
    let stats = search.stats();

    assert_eq!(stats.positions_tested, 23_540);
    assert_eq!(stats.solution_length, Some(115));
    assert_eq!(stats.states_discovered, 23_709);
    assert_eq!(solution.states.len(), 115);
    assert_eq!(solution.move_count(), 114);
    assert_eq!(search.depth_of(solution.goal().unwrap()), Some(114));
}

#[test]
fn solution_path_is_a_chain_of_legal_moves() {
    let start = BoardState::standard().unwrap();
    let solution = solve(start, big_at_exit).unwrap();

    assert_eq!(solution.start(), Some(&start));
    assert!(big_at_exit(solution.goal().unwrap()));
    assert!(solution.states[..solution.states.len() - 1]
        .iter()
        .all(|s| !big_at_exit(s)));
    for (i, step) in solution.moves.iter().enumerate() {
        assert_eq!(
            solution.states[i].transition(*step),
            Some(solution.states[i + 1]),
            "move {} does not connect the path",
            i
        );
    }
}

#[test]
fn tie_break_is_pinned() {
    let solution = solve(BoardState::standard().unwrap(), big_at_exit).unwrap();
    assert_eq!(
        solution.moves[..5],
        [
            mv(Shape::VerticalPair, 4, Direction::Up),
            mv(Shape::VerticalPair, 7, Direction::Up),
            mv(Shape::HorizontalPair, 9, Direction::Left),
            mv(Shape::Single, 14, Direction::Up),
            mv(Shape::Single, 10, Direction::Right),
        ]
    );
    assert_eq!(
        solution.moves.last(),
        Some(&mv(Shape::Big, 12, Direction::Right))
    );
    let goal: String = solution.goal().unwrap().render().iter().collect();
    assert_eq!(goal, "VVVVVVVVSSHH.BBS.BBS");
}

#[test]
fn nothing_shorter_exists() {
    let start = BoardState::standard().unwrap();
    let mut search = Search::with_config(start, big_at_exit, SearchConfig::with_max_depth(113));
    assert_eq!(
        search.run(),
        Err(SearchError::NoSolution {
            positions_tested: 23_700
        })
    );
    assert!(search.discovered().all(|s| !big_at_exit(s)));
}

#[test]
fn solving_twice_gives_the_same_path() {
    let start = BoardState::standard().unwrap();
    let first = solve(start, big_at_exit).unwrap();
    let second = solve(start, big_at_exit).unwrap();
    assert_eq!(first, second);
}
