use std::time::Duration;

use rand::Rng as _;

use crate::{
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
    engine::{
        piece_queue::{GameSeed, PieceQueue},
        stats::GameStats,
    },
};

/// Whether the session is still accepting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameState {
    /// A piece is falling and controllable.
    Active,
    /// Terminal: the stack reached the spawn area. Every action except
    /// [`Game::reset`] is a no-op.
    GameOver,
}

/// What an action that can lock a piece did.
///
/// Returned from [`Game::soft_drop`], [`Game::hard_drop`], and
/// [`Game::update`], so feedback (audio, haptics, toasts) keys off return
/// values instead of polled flags; an event can be neither missed nor
/// consumed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropEvent {
    /// Nothing locked. The piece may have moved down one step.
    None,
    /// The piece locked without clearing anything.
    Locked,
    /// The piece locked and cleared lines, scored a T-spin, or both.
    LockedCleared {
        /// Lines removed by this lock (0 for a line-less T-spin).
        lines: usize,
        /// The lock was classified as a T-spin.
        t_spin: bool,
    },
}

/// The rules engine: authoritative board state, piece control, line
/// clearing, scoring, and the randomized piece supply.
///
/// A host drives one instance from a single thread: [`Game::update`] once
/// per fixed tick, discrete actions on input, accessor reads when drawing.
/// Illegal moves and rotations are rejected silently; rejection is normal
/// game flow, not an error. Nothing here blocks or touches a clock.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    falling: Piece,
    ghost: Piece,
    /// Set by a successful rotation, cleared by successful translation and
    /// on spawn. Consumed by T-spin classification at lock time.
    rotated_last: bool,
    queue: PieceQueue,
    held: Option<PieceKind>,
    can_hold: bool,
    stats: GameStats,
    drop_timer: Duration,
    elapsed: Duration,
    seed: GameSeed,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Starts a session with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Starts a session with a fixed seed; the piece sequence is fully
    /// determined by it.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        let mut queue = PieceQueue::new(seed);
        let board = Board::EMPTY;
        let falling = Piece::spawn(queue.pop_next());
        let ghost = falling.dropped(&board);
        Self {
            board,
            falling,
            ghost,
            rotated_last: false,
            queue,
            held: None,
            can_hold: true,
            stats: GameStats::new(),
            drop_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            seed,
            state: GameState::Active,
        }
    }

    /// Reinitializes everything to a fresh session (empty board, zeroed
    /// stats, a newly shuffled bag) without recreating the instance.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling
    }

    /// Where the falling piece would land if dropped straight down.
    /// Recomputed after every successful move, rotation, hold, and spawn.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.ghost
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    /// The upcoming pieces, nearest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.upcoming()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Total time fed through [`Game::update`] this session.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The seed this session was started with.
    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Translates the falling piece one column left, if the spot is free.
    pub fn move_left(&mut self) {
        self.shift(-1);
    }

    /// Translates the falling piece one column right, if the spot is free.
    pub fn move_right(&mut self) {
        self.shift(1);
    }

    fn shift(&mut self, dx: i16) {
        if self.state.is_game_over() {
            return;
        }
        let moved = self.falling.translated(dx, 0);
        if !self.board.is_colliding(moved) {
            self.falling = moved;
            self.rotated_last = false;
            self.update_ghost();
        }
    }

    /// Rotates the falling piece 90° clockwise, if it fits in place.
    ///
    /// No wall-kick offsets are tried: a rotation that collides at the
    /// current position is rejected outright.
    pub fn rotate_right(&mut self) {
        self.rotate_to(self.falling.rotated_right());
    }

    /// Rotates the falling piece 90° counterclockwise, if it fits in place.
    pub fn rotate_left(&mut self) {
        self.rotate_to(self.falling.rotated_left());
    }

    fn rotate_to(&mut self, rotated: Piece) {
        if self.state.is_game_over() {
            return;
        }
        if !self.board.is_colliding(rotated) {
            self.falling = rotated;
            self.rotated_last = true;
            self.update_ghost();
        }
    }

    /// Moves the falling piece down one step. On contact with the floor or
    /// the stack, runs the lock sequence instead; there is no lock-delay
    /// timer.
    pub fn soft_drop(&mut self) -> DropEvent {
        if self.state.is_game_over() {
            return DropEvent::None;
        }
        let moved = self.falling.translated(0, 1);
        if self.board.is_colliding(moved) {
            return self.lock_falling_piece();
        }
        self.falling = moved;
        self.rotated_last = false;
        self.update_ghost();
        DropEvent::None
    }

    /// Drops the falling piece to its resting position and locks it there.
    ///
    /// The rotation marker is left alone: rotating into a slot and then
    /// hard-dropping still classifies as a T-spin.
    pub fn hard_drop(&mut self) -> DropEvent {
        if self.state.is_game_over() {
            return DropEvent::None;
        }
        self.falling = self.falling.dropped(&self.board);
        self.lock_falling_piece()
    }

    /// Stores the falling piece's kind, swapping with any already-held kind.
    ///
    /// The first hold consumes the piece outright (the replacement spawns
    /// from the queue); later holds swap, respawning the held kind at the
    /// spawn position and orientation. Usable once per lock.
    pub fn hold(&mut self) {
        if self.state.is_game_over() || !self.can_hold {
            return;
        }
        match self.held.replace(self.falling.kind()) {
            None => self.spawn_next(),
            Some(previous) => {
                self.falling = Piece::spawn(previous);
                self.rotated_last = false;
                self.update_ghost();
            }
        }
        self.can_hold = false;
    }

    /// Advances game time by one fixed quantum. When the accumulated time
    /// reaches the drop interval for the current level, performs exactly one
    /// automatic [`Game::soft_drop`] step and resets the accumulator.
    pub fn update(&mut self, dt: Duration) -> DropEvent {
        if self.state.is_game_over() {
            return DropEvent::None;
        }
        self.elapsed += dt;
        self.drop_timer += dt;
        if self.drop_timer >= self.stats.drop_interval() {
            self.drop_timer = Duration::ZERO;
            return self.soft_drop();
        }
        DropEvent::None
    }

    /// The lock sequence: write the piece into the board, classify the
    /// T-spin, clear lines, score, spawn the next piece, re-enable hold.
    fn lock_falling_piece(&mut self) -> DropEvent {
        self.board.fill_piece(self.falling);
        let t_spin = self.is_t_spin_lock();
        let lines = self.board.clear_lines();
        self.stats.record_lock(lines, t_spin);
        self.spawn_next();
        self.can_hold = true;
        if lines > 0 || t_spin {
            DropEvent::LockedCleared { lines, t_spin }
        } else {
            DropEvent::Locked
        }
    }

    /// A lock is a T-spin when the piece is a T, its last successful action
    /// was a rotation, and at least 3 of the 4 diagonal neighbors of its
    /// bounding-box anchor are occupied.
    ///
    /// Runs after the piece is written to the board, so the T's own cell at
    /// (x+1, y+1) counts toward the threshold. Out-of-bounds corners do not
    /// count.
    fn is_t_spin_lock(&self) -> bool {
        if !self.rotated_last || self.falling.kind() != PieceKind::T {
            return false;
        }
        let x = self.falling.position().x();
        let y = self.falling.position().y();
        let corners = [
            (x - 1, y - 1),
            (x + 1, y - 1),
            (x - 1, y + 1),
            (x + 1, y + 1),
        ];
        let occupied = corners
            .into_iter()
            .filter(|&(cx, cy)| self.board.is_occupied(cx, cy))
            .count();
        occupied >= 3
    }

    /// Pops the queue into a fresh falling piece at the spawn position.
    ///
    /// Tops out when the spawn position collides, or when the stack has
    /// reached the hidden buffer rows even though the spawn itself fits.
    fn spawn_next(&mut self) {
        self.falling = Piece::spawn(self.queue.pop_next());
        self.rotated_last = false;
        self.update_ghost();
        if self.board.is_colliding(self.falling) || self.board.buffer_rows_occupied() {
            self.state = GameState::GameOver;
        }
    }

    fn update_ghost(&mut self) {
        self.ghost = self.falling.dropped(&self.board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BOARD_WIDTH;

    fn seed(n: u128) -> GameSeed {
        format!("{n:032x}").parse().unwrap()
    }

    fn game() -> Game {
        Game::with_seed(seed(0x5eed))
    }

    impl Game {
        /// Swaps the playfield in, keeping the rest of the session.
        fn set_board(&mut self, board: Board) {
            self.board = board;
            self.update_ghost();
        }

        /// Replaces the falling piece, as if it had just spawned.
        fn set_falling(&mut self, piece: Piece) {
            self.falling = piece;
            self.rotated_last = false;
            self.update_ghost();
        }
    }

    /// A vertical I positioned so its column lands in `column`.
    fn vertical_i(column: i16) -> Piece {
        // The rotated I occupies box column 2.
        Piece::spawn(PieceKind::I)
            .rotated_right()
            .translated(column - 2 - 3, 0)
    }

    #[test]
    fn i_piece_fills_the_last_gap_and_clears_the_bottom_row() {
        let mut game = game();
        game.set_board(Board::from_ascii("#########."));
        game.set_falling(vertical_i(9));

        let level = game.stats().level();
        let event = game.hard_drop();

        assert_eq!(
            event,
            DropEvent::LockedCleared {
                lines: 1,
                t_spin: false
            }
        );
        assert_eq!(game.stats().lines(), 1);
        assert_eq!(game.stats().score(), 100 * level);
        // The bottom row is gone; three I cells remain stacked in column 9.
        for x in 0..BOARD_WIDTH - 1 {
            assert!(game.board().block_at(x, 21).is_empty());
        }
        assert!(!game.board().block_at(9, 21).is_empty());
        assert!(!game.board().block_at(9, 19).is_empty());
        assert!(game.board().block_at(9, 18).is_empty());
    }

    #[test]
    fn moves_are_rejected_at_the_walls() {
        let mut game = game();
        game.set_falling(Piece::spawn(PieceKind::O));

        for _ in 0..20 {
            game.move_left();
        }
        let left = game.falling_piece();
        game.move_left();
        assert_eq!(game.falling_piece(), left, "wall move must be a no-op");
        assert_eq!(left.cells().map(|(x, _)| x).min().unwrap(), 0);

        for _ in 0..20 {
            game.move_right();
        }
        let right = game.falling_piece();
        assert_eq!(
            right.cells().map(|(x, _)| x).max().unwrap(),
            BOARD_WIDTH as i16 - 1
        );
    }

    #[test]
    fn rotation_without_room_is_rejected() {
        let mut game = game();
        // Wall the vertical I into a one-cell-wide shaft.
        game.set_board(Board::from_ascii(
            r"
            #.########
            #.########
            #.########
            #.########
            ",
        ));
        let piece = vertical_i(1).translated(0, 18);
        game.set_falling(piece);
        game.rotate_right();
        assert_eq!(game.falling_piece(), piece, "no wall kick is attempted");
        game.rotate_left();
        assert_eq!(game.falling_piece(), piece);
    }

    #[test]
    fn ghost_tracks_the_falling_piece() {
        let mut game = game();
        game.set_falling(Piece::spawn(PieceKind::T));
        assert_eq!(game.ghost_piece().position().y(), 20);

        game.move_left();
        assert_eq!(
            game.ghost_piece().position().x(),
            game.falling_piece().position().x()
        );

        game.set_board(Board::from_ascii(
            r"
            ##########
            ##########
            ",
        ));
        assert_eq!(game.ghost_piece().position().y(), 18);
    }

    #[test]
    fn soft_drop_locks_on_contact() {
        let mut game = game();
        game.set_falling(Piece::spawn(PieceKind::O));
        // O rests with its box at row 20; 20 soft drops get it there.
        for _ in 0..20 {
            assert_eq!(game.soft_drop(), DropEvent::None);
        }
        assert_eq!(game.falling_piece().position().y(), 20);
        assert_eq!(game.soft_drop(), DropEvent::Locked);
        assert!(!game.board().block_at(3, 21).is_empty());
        assert_eq!(game.stats().pieces(), 1);
    }

    #[test]
    fn t_spin_double_scores_1200() {
        let mut game = game();
        // A slot for a downward-pointing T at columns 4-6, with an overhang
        // at (3, 18) supplying the third corner.
        game.set_board(Board::from_ascii(
            r"
            ...#......
            ..........
            ####...###
            #####.####
            ",
        ));
        game.set_falling(Piece::spawn(PieceKind::T).translated(1, 0).rotated_right());

        // Descend to rest, rotate into the slot, then lock in place.
        for _ in 0..19 {
            assert_eq!(game.soft_drop(), DropEvent::None);
        }
        assert_eq!(game.falling_piece().position().y(), 19);
        game.rotate_right();
        let event = game.hard_drop();

        assert_eq!(
            event,
            DropEvent::LockedCleared {
                lines: 2,
                t_spin: true
            }
        );
        assert_eq!(game.stats().score(), 1200);
        assert_eq!(game.stats().lines(), 2);
    }

    #[test]
    fn same_lock_without_final_rotation_is_not_a_t_spin() {
        let mut game = game();
        game.set_board(Board::from_ascii(
            r"
            ...#......
            ..........
            ####...###
            #####.####
            ",
        ));
        // Already pointing down; translation is the last action.
        game.set_falling(
            Piece::spawn(PieceKind::T)
                .translated(1, 0)
                .rotated_right()
                .rotated_right(),
        );

        let event = game.hard_drop();
        assert_eq!(
            event,
            DropEvent::LockedCleared {
                lines: 2,
                t_spin: false
            }
        );
        assert_eq!(game.stats().score(), 300);
    }

    #[test]
    fn line_less_t_spin_reports_a_clear_event() {
        let mut game = game();
        // Same slot, but both bottom rows have an extra gap at column 0,
        // so nothing completes.
        game.set_board(Board::from_ascii(
            r"
            ...#......
            ..........
            .###...###
            .####.####
            ",
        ));
        game.set_falling(Piece::spawn(PieceKind::T).translated(1, 0).rotated_right());

        for _ in 0..19 {
            assert_eq!(game.soft_drop(), DropEvent::None);
        }
        game.rotate_right();
        let event = game.hard_drop();

        assert_eq!(
            event,
            DropEvent::LockedCleared {
                lines: 0,
                t_spin: true
            }
        );
        assert_eq!(game.stats().score(), 400);
        assert_eq!(game.stats().lines(), 0);
    }

    #[test]
    fn hold_swaps_at_most_once_per_lock() {
        let mut game = game();
        let first = game.falling_piece().kind();
        let next: Vec<PieceKind> = game.next_pieces().collect();

        // First hold consumes the piece; the queue supplies the successor.
        game.hold();
        assert_eq!(game.held_piece(), Some(first));
        assert_eq!(game.falling_piece().kind(), next[0]);

        // Second hold before a lock is a no-op.
        let falling = game.falling_piece();
        game.hold();
        assert_eq!(game.held_piece(), Some(first));
        assert_eq!(game.falling_piece(), falling);

        // A lock re-enables hold; now it swaps with the held piece.
        game.hard_drop();
        let spawned = game.falling_piece().kind();
        game.hold();
        assert_eq!(game.held_piece(), Some(spawned));
        assert_eq!(game.falling_piece().kind(), first);
    }

    #[test]
    fn hold_swap_respawns_at_the_spawn_position() {
        let mut game = game();
        game.hold();
        game.hard_drop();

        let held = game.held_piece().unwrap();
        game.move_left();
        game.rotate_right();
        game.hold();
        let falling = game.falling_piece();
        assert_eq!(falling.kind(), held);
        assert_eq!(falling.position(), Piece::spawn(held).position());
        assert_eq!(falling.rotation(), Piece::spawn(held).rotation());
    }

    #[test]
    fn gravity_drops_exactly_once_per_interval() {
        let mut game = game();
        let quantum = Duration::from_millis(100);
        let y0 = game.falling_piece().position().y();

        for _ in 0..9 {
            assert_eq!(game.update(quantum), DropEvent::None);
            assert_eq!(game.falling_piece().position().y(), y0);
        }
        game.update(quantum); // accumulator reaches 1.0 s
        assert_eq!(game.falling_piece().position().y(), y0 + 1);
        assert_eq!(game.elapsed(), Duration::from_secs(1));

        // The accumulator reset to zero: another full interval is needed.
        for _ in 0..9 {
            game.update(quantum);
        }
        assert_eq!(game.falling_piece().position().y(), y0 + 1);
        game.update(quantum);
        assert_eq!(game.falling_piece().position().y(), y0 + 2);
    }

    #[test]
    fn level_up_crosses_at_ten_lines() {
        let mut game = game();
        for n in 1..=10 {
            game.set_board(Board::from_ascii("#########."));
            game.set_falling(vertical_i(9));
            game.hard_drop();
            let expected_level = if n < 10 { 1 } else { 2 };
            assert_eq!(game.stats().level(), expected_level, "after {n} clears");
        }
        assert_eq!(game.stats().drop_interval(), Duration::from_millis(950));
    }

    #[test]
    fn stacking_to_the_top_ends_the_game() {
        let mut game = game();
        for _ in 0..200 {
            game.hard_drop();
            if game.is_game_over() {
                break;
            }
        }
        assert!(game.is_game_over());
    }

    #[test]
    fn game_over_freezes_every_action() {
        let mut game = game();
        for _ in 0..200 {
            game.hard_drop();
            if game.is_game_over() {
                break;
            }
        }
        assert!(game.is_game_over());

        let board = game.board().clone();
        let falling = game.falling_piece();
        let score = game.stats().score();

        game.move_left();
        game.move_right();
        game.rotate_right();
        game.rotate_left();
        game.hold();
        assert_eq!(game.soft_drop(), DropEvent::None);
        assert_eq!(game.hard_drop(), DropEvent::None);
        assert_eq!(game.update(Duration::from_secs(5)), DropEvent::None);

        assert_eq!(game.board(), &board);
        assert_eq!(game.falling_piece(), falling);
        assert_eq!(game.stats().score(), score);
    }

    #[test]
    fn occupied_buffer_rows_end_the_game_even_when_spawn_fits() {
        let mut game = game();
        // One stray block in the hidden buffer, far from the spawn box.
        let mut board = Board::EMPTY;
        board.fill_piece(vertical_i(9).translated(0, 1));
        game.set_board(board);

        game.hard_drop();
        assert!(game.is_game_over());
    }

    #[test]
    fn reset_starts_a_fresh_session() {
        let mut game = game();
        for _ in 0..200 {
            game.hard_drop();
            if game.is_game_over() {
                break;
            }
        }
        assert!(game.is_game_over());

        game.reset();
        assert!(!game.is_game_over());
        assert_eq!(game.board(), &Board::EMPTY);
        assert_eq!(game.stats().score(), 0);
        assert_eq!(game.stats().lines(), 0);
        assert_eq!(game.stats().level(), 1);
        assert_eq!(game.held_piece(), None);
        assert_eq!(game.elapsed(), Duration::ZERO);
    }

    #[test]
    fn spawn_consumes_the_preview_front() {
        let mut game = game();
        let expected: Vec<PieceKind> = game.next_pieces().take(3).collect();
        for kind in expected {
            game.hard_drop();
            assert_eq!(game.falling_piece().kind(), kind);
        }
    }
}
