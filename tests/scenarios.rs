// End-to-end checks through the public library API.

use onettui::cell::{Cell, Coord, ObstacleKind};
use onettui::game::{GameConfig, Phase, Session};
use onettui::grid::GridStore;
use onettui::hint;
use onettui::matcher::{ClickOutcome, MatchEngine};
use onettui::path::{can_connect, can_connect_board};
use onettui::scoring::ComboScorer;
use onettui::timer::LevelTimer;
use std::time::{Duration, Instant};

const E: Cell = Cell::Empty;
const R: Cell = Cell::Obstacle(ObstacleKind::Rock);

fn icon(id: u8) -> Cell {
    Cell::Icon(id)
}

/// Path solver on hand-built boards.
mod linking {
    use super::*;

    #[test]
    fn test_straight_row_is_two_points() {
        let grid = GridStore::from_rows(vec![vec![icon(5), E, E, icon(5)]]);
        let path = can_connect_board(&grid, Coord::new(0, 0), Coord::new(0, 3)).unwrap();
        assert_eq!(path.points(), &[Coord::new(1, 1), Coord::new(1, 4)]);
        assert_eq!(path.bends(), 0);
    }

    #[test]
    fn test_diagonal_prefers_first_row_corner() {
        let grid = GridStore::from_rows(vec![
            vec![icon(5), E, E],
            vec![E, E, E],
            vec![E, E, icon(5)],
        ]);
        let path = can_connect_board(&grid, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        assert_eq!(
            path.points(),
            &[Coord::new(1, 1), Coord::new(1, 3), Coord::new(3, 3)]
        );
    }

    #[test]
    fn test_walled_in_diagonal_has_no_link() {
        let grid = GridStore::from_rows(vec![vec![icon(5), R], vec![R, icon(5)]]);
        let before = grid.clone();
        assert!(can_connect_board(&grid, Coord::new(0, 0), Coord::new(1, 1)).is_none());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_links_are_symmetric_and_valid() {
        let grid = GridStore::from_rows(vec![
            vec![icon(1), R, icon(2), E],
            vec![E, icon(2), R, icon(1)],
            vec![icon(3), E, icon(3), R],
        ]);
        let coords: Vec<Coord> = grid.cells().map(|(c, _)| c.padded()).collect();
        for &a in &coords {
            for &b in &coords {
                let ab = can_connect(&grid, a, b);
                let ba = can_connect(&grid, b, a);
                assert_eq!(ab.is_some(), ba.is_some(), "{a} vs {b}");
                let Some(path) = ab else { continue };
                assert_eq!(path.start(), a);
                assert_eq!(path.end(), b);
                assert!(path.bends() <= 2);
                let cells = path.cells();
                for &p in &cells[1..cells.len() - 1] {
                    assert_eq!(grid.padded_get(p), Some(Cell::Empty));
                }
            }
        }
    }
}

/// Clicking, gravity and board bookkeeping.
mod board {
    use super::*;

    #[test]
    fn test_obstacles_fall_with_the_column() {
        let mut grid = GridStore::from_rows(vec![vec![icon(3)], vec![R], vec![E]]);
        grid.apply_gravity();
        assert_eq!(grid.board(), &[vec![E], vec![icon(3)], vec![R]]);
        let settled = grid.clone();
        grid.apply_gravity();
        assert_eq!(grid, settled);
    }

    #[test]
    fn test_match_removes_two_icons_and_keeps_obstacles() {
        let mut grid = GridStore::from_rows(vec![
            vec![icon(4), E, R],
            vec![icon(1), E, icon(4)],
            vec![icon(1), R, E],
        ]);
        let (icons, obstacles) = (grid.icon_count(), grid.obstacle_count());
        let mut engine = MatchEngine::new();
        let now = Instant::now();
        assert!(matches!(
            engine.click(&mut grid, Coord::new(0, 0), now),
            ClickOutcome::Selected(_)
        ));
        let outcome = engine.click(&mut grid, Coord::new(1, 2), now);
        assert!(matches!(outcome, ClickOutcome::Matched(_)), "{outcome:?}");
        assert_eq!(grid.icon_count(), icons - 2);
        assert_eq!(grid.obstacle_count(), obstacles);
        assert!(grid.is_consistent());
        assert!(!grid.is_cleared());
    }

    #[test]
    fn test_cleared_only_without_icons() {
        let obstacles_only = GridStore::from_rows(vec![vec![R, E], vec![E, R]]);
        assert!(obstacles_only.is_cleared());
        assert!(!hint::is_deadlocked(&obstacles_only));
        let one_pair = GridStore::from_rows(vec![vec![icon(0), icon(0)]]);
        assert!(!one_pair.is_cleared());
    }
}

/// Combo scoring and the level clock.
mod timing {
    use super::*;

    #[test]
    fn test_five_quick_matches_score_ten_to_fifty() {
        let mut scorer = ComboScorer::new();
        let t0 = Instant::now();
        let awards: Vec<_> = (0..5)
            .map(|i| scorer.on_match(t0 + Duration::from_millis(500 * i)))
            .collect();
        let points: Vec<u32> = awards.iter().map(|a| a.points).collect();
        assert_eq!(points, [10, 20, 30, 40, 50]);
        let bonuses: Vec<usize> = awards
            .iter()
            .enumerate()
            .filter(|(_, a)| a.bonus_secs.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(bonuses, [3]);
        assert_eq!(scorer.score(), 150);
    }

    #[test]
    fn test_combo_window_edges() {
        let t0 = Instant::now();
        let mut scorer = ComboScorer::new();
        scorer.on_match(t0);
        assert_eq!(scorer.on_match(t0 + Duration::from_millis(1900)).combo, 2);
        assert_eq!(scorer.on_match(t0 + Duration::from_millis(4000)).combo, 1);
    }

    #[test]
    fn test_added_time_never_exceeds_duration() {
        let t0 = Instant::now();
        let mut timer = LevelTimer::new(t0);
        timer.start(60, 1, t0);
        for s in [0, 1, 10, 30, 59] {
            timer.add(5, t0 + Duration::from_secs(s));
            assert!(timer.snapshot().remaining <= 60);
        }
    }
}

/// Whole-session flows.
mod session {
    use super::*;

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            rows: 4,
            cols: 4,
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_hint_pair_can_be_played() {
        let now = Instant::now();
        let (mut s, h) = (0..64)
            .find_map(|seed| {
                let mut s = Session::new(&config(seed), now);
                s.hint(now).map(|h| (s, h))
            })
            .unwrap();
        let score = s.score();
        s.click(h.first, now);
        assert!(matches!(s.click(h.second, now), ClickOutcome::Matched(_)));
        assert_eq!(s.score(), score + 10);
    }

    #[test]
    fn test_timeout_ends_play_until_restart() {
        let now = Instant::now();
        let mut s = Session::new(&config(21), now);
        s.tick(now + Duration::from_secs(151));
        assert_eq!(s.phase(), Phase::TimedOut);
        assert!(s.hint(now).is_none());
        s.restart(now + Duration::from_secs(152));
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.level().index, 1);
        assert_eq!(s.score(), 0);
    }
}
