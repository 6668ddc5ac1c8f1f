use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Order in which an expanded node tries its children.
    pub const EXPANSION_ORDER: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    /// Order in which the final maximum is matched back to a direction.
    pub const DECISION_ORDER: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Stable slot for per-direction arrays (`Up, Down, Left, Right`).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines

struct Stores {
    shift_left: Box<[u64]>,
    shift_right: Box<[u64]>,
    shift_up: Box<[u64]>,
    shift_down: Box<[u64]>,
    score: Box<[Score]>,
}

type BoardRaw = u64;
type Line = u64;
type Tile = u64;
pub type Score = u64;

/// Result of applying one direction to a board.
///
/// `delta` is the sum of the tiles created by merges during this move; it is
/// zero whenever `changed` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub changed: bool,
    pub delta: Score,
    pub board: Board,
}

/// Packed 4x4 2048 board as 16 4-bit tile exponents in a `u64`.
///
/// Cell 0 is the top-left corner and lives in the most significant nibble;
/// cells run row-major. An exponent of 0 is an empty cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Side length of the grid.
    pub const SIZE: usize = 4;

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Build a board from a row-major grid of tile exponents.
    ///
    /// Exponents above 15 do not fit a nibble and are clamped.
    ///
    /// ```
    /// use bestfirst_2048::engine::Board;
    /// let b = Board::from_exponents([[1, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 2]]);
    /// assert_eq!(b.raw(), 0x1000_0000_0000_0002);
    /// ```
    pub fn from_exponents(grid: [[u8; 4]; 4]) -> Self {
        let mut raw = 0u64;
        for (r, row) in grid.iter().enumerate() {
            for (c, &exp) in row.iter().enumerate() {
                let idx = r * Self::SIZE + c;
                raw |= (exp.min(15) as u64) << ((15 - idx) * 4);
            }
        }
        Board(raw)
    }

    /// Row-major grid of tile exponents.
    pub fn to_exponents(self) -> [[u8; 4]; 4] {
        let mut grid = [[0u8; 4]; 4];
        for (idx, exp) in to_vec(self).into_iter().enumerate() {
            grid[idx / Self::SIZE][idx % Self::SIZE] = exp;
        }
        grid
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use bestfirst_2048::engine::{Board, Move};
    /// let b = Board::from_raw(0x0000_0000_0000_1100);
    /// assert_eq!(b.shift(Move::Left).raw(), 0x0000_0000_0000_2000);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        match dir {
            Move::Left | Move::Right => shift_rows(self, dir),
            Move::Up | Move::Down => shift_cols(self, dir),
        }
    }

    /// Apply `dir` without spawning a tile, reporting whether anything moved
    /// and the immediate score gained by merges.
    ///
    /// ```
    /// use bestfirst_2048::engine::{Board, Move};
    /// // Two 4s merge into an 8.
    /// let b = Board::from_exponents([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let out = b.execute(Move::Left);
    /// assert!(out.changed);
    /// assert_eq!(out.delta, 8);
    /// assert!(!b.execute(Move::Up).changed);
    /// ```
    #[inline]
    pub fn execute(self, dir: Move) -> MoveOutcome {
        let board = self.shift(dir);
        if board == self {
            return MoveOutcome { changed: false, delta: 0, board };
        }
        // A tile's line score counts every merge that built it, so the
        // difference is exactly the value of the tiles merged this move.
        let delta = board.score().saturating_sub(self.score());
        MoveOutcome { changed: true, delta, board }
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use bestfirst_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = count_empty(self);
        if empty == 0 {
            return self;
        }
        let mut index = rng.gen_range(0..empty);
        let mut tmp = self.0;
        let mut tile = generate_random_tile(rng);
        loop {
            while (tmp & 0xf) != 0 {
                tmp >>= 4;
                tile <<= 4;
            }
            if index == 0 { break; }
            index -= 1;
            tmp >>= 4;
            tile <<= 4;
        }
        Board(self.0 | tile)
    }

    /// Perform a move then insert a random tile if the move changed the board, using the provided RNG.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let moved = self.shift(direction);
        if moved != self { moved.with_random_tile(rng) } else { self }
    }

    /// Compute the total score for this board.
    #[inline]
    pub fn score(self) -> Score { get_score(self) }

    /// Return true if no legal moves remain.
    ///
    /// ```
    /// use bestfirst_2048::engine::Board;
    /// // Nothing can slide on an empty board.
    /// assert!(Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        Move::DECISION_ORDER.iter().all(|&dir| self.shift(dir) == self)
    }

    /// Return the highest tile value (e.g., 2048) present on the board.
    #[inline]
    pub fn highest_tile(self) -> Tile { get_highest_tile_val(self) }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> u64 { count_empty(self) }

    /// Get the actual value at index (2^exponent stored at nibble, 0 when empty).
    ///
    /// Index runs 0..16 row-major.
    #[inline]
    pub fn tile_value(self, idx: usize) -> u16 {
        match extract_tile(self, idx) {
            0 => 0,
            exp => 2_u16.pow(exp as u32),
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (row_idx, row) in self.to_exponents().iter().enumerate() {
            if row_idx > 0 {
                writeln!(f, "--------------------------------")?;
            }
            let cells: Vec<_> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<BoardRaw> for Board { fn from(v: BoardRaw) -> Self { Board::from_raw(v) } }
impl From<Board> for BoardRaw { fn from(b: Board) -> Self { b.raw() } }

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("board must be at most 16 hex digits, got {0}")]
    TooLong(usize),
    #[error("invalid hex board: {0}")]
    Hex(#[from] std::num::ParseIntError),
}

/// Parse a packed board from hex, with or without a `0x` prefix and `_` separators.
///
/// ```
/// use bestfirst_2048::engine::Board;
/// let b: Board = "0x1000_0000_0000_0011".parse().unwrap();
/// assert_eq!(b.raw(), 0x1000_0000_0000_0011);
/// ```
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits: String = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if digits.len() > 16 {
            return Err(ParseBoardError::TooLong(digits.len()));
        }
        Ok(Board(u64::from_str_radix(&digits, 16)?))
    }
}

/// Initialize internal tables on first use. Safe to call multiple times.
pub fn new() {
    let _ = stores();
}

/// Compute the total score for a board.
pub fn get_score(board: Board) -> Score {
    let score_table = &stores().score;
    (0..4).fold(0, |acc, idx| {
        let row_val = extract_line(board.0, idx) as usize;
        acc + score_table[row_val]
    })
}

// Credit to Nneonneo
fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

fn extract_line(board: BoardRaw, line_idx: u64) -> Line {
    (board >> ((3 - line_idx) * 16)) & 0xffff
}

fn line_to_vec(line: Line) -> Vec<Tile> {
    (0..4).map(|tile_idx| line >> ((3 - tile_idx) * 4) & 0xf).collect()
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> u64 {
    16 - count_non_empty(board)
}

static STORES: OnceLock<Stores> = OnceLock::new();

fn create_stores() -> Stores {
    // Allocate on the heap to avoid large stack frames
    let mut shift_left = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_right = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_up = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_down = vec![0u64; LINE_TABLE_SIZE];
    let mut score = vec![0u64; LINE_TABLE_SIZE];

    for val in 0..LINE_TABLE_SIZE {
        let line = val as u64;
        shift_left[val] = shift_line(line, Move::Left);
        shift_right[val] = shift_line(line, Move::Right);
        shift_up[val] = shift_line(line, Move::Up);
        shift_down[val] = shift_line(line, Move::Down);
        score[val] = calc_score(line);
    }

    Stores {
        shift_left: shift_left.into_boxed_slice(),
        shift_right: shift_right.into_boxed_slice(),
        shift_up: shift_up.into_boxed_slice(),
        shift_down: shift_down.into_boxed_slice(),
        score: score.into_boxed_slice(),
    }
}

#[inline(always)]
fn stores() -> &'static Stores {
    STORES.get_or_init(create_stores)
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { 1 } else { 2 } }

fn shift_rows(board: Board, move_dir: Move) -> Board {
    let s = stores();
    let table: &[u64] = match move_dir {
        Move::Left => &s.shift_left,
        _ => &s.shift_right,
    };
    let res = (0..4).fold(0, |new_board, row_idx| {
        let row_val = extract_line(board.0, row_idx) as usize;
        new_board | (table[row_val] << (48 - (16 * row_idx)))
    });
    Board(res)
}

fn shift_cols(board: Board, move_dir: Move) -> Board {
    let transpose_board = transpose(board.0);
    let s = stores();
    let table: &[u64] = match move_dir {
        Move::Up => &s.shift_up,
        _ => &s.shift_down,
    };
    let res = (0..4).fold(0, |new_board, col_idx| {
        let col_val = extract_line(transpose_board, col_idx) as usize;
        new_board | (table[col_val] << (12 - (4 * col_idx)))
    });
    Board(res)
}

fn shift_line(line: Line, direction: Move) -> Line {
    let tiles = line_to_vec(line);
    match direction {
        Move::Left | Move::Right => vec_to_row(shift_vec(tiles, direction)),
        Move::Up | Move::Down => vec_to_col(shift_vec(tiles, direction)),
    }
}

fn vec_to_row(tiles: Vec<Tile>) -> Line {
    tiles[0] << 12 | tiles[1] << 8 | tiles[2] << 4 | tiles[3]
}

fn vec_to_col(tiles: Vec<Tile>) -> Line {
    tiles[0] << 48 | tiles[1] << 32 | tiles[2] << 16 | tiles[3]
}

fn shift_vec(vec: Vec<Tile>, direction: Move) -> Vec<Tile> {
    match direction {
        Move::Left | Move::Up => shift_vec_left(vec),
        Move::Right | Move::Down => shift_vec_right(vec),
    }
}

fn shift_vec_right(vec: Vec<Tile>) -> Vec<Tile> {
    let rev_vec: Vec<Tile> = vec.into_iter().rev().collect();
    shift_vec_left(rev_vec).into_iter().rev().collect()
}

fn shift_vec_left(mut vec: Vec<Tile>) -> Vec<Tile> {
    for i in 0..4 {
        calculate_left_shift(&mut vec[i..]);
    }
    vec
}

fn calculate_left_shift(slice: &mut [Tile]) {
    let mut acc = 0;
    for idx in 0..slice.len() {
        let val = slice[idx];
        // Two 32768s have no nibble to merge into and stay put.
        if acc != 0 && acc == val && acc < 0xf {
            slice[idx] = 0;
            acc += 1;
            break;
        } else if acc != 0 && val != 0 {
            break;
        } else if acc == 0 && val != 0 {
            slice[idx] = 0;
            acc = val;
        };
    }
    slice[0] = acc;
}

// Credit to Nneonneo
fn calc_score(line: Line) -> Score {
    line_to_vec(line)
        .into_iter()
        .filter(|&tile_val| tile_val >= 2)
        // the score is the total sum of the tile and all intermediate merged tiles
        .map(|tile_val| (tile_val - 1) * (1 << tile_val))
        .sum()
}

fn count_non_empty(board: Board) -> u64 {
    let mut board_copy = board.0;
    board_copy |= board_copy >> 1;
    board_copy |= board_copy >> 2;
    board_copy &= 0x1111111111111111;
    board_copy.count_ones() as u64
}

fn to_vec(board: Board) -> Vec<u8> {
    (0..16).map(|idx| extract_tile(board, idx) as u8).collect()
}

fn extract_tile(board: Board, idx: usize) -> Tile {
    (board.0 >> ((15 - idx) * 4)) & 0xf
}

fn format_val(val: &u8) -> String {
    match val {
        0 => " ".repeat(7),
        &x => format!("{:^7}", 2_u32.pow(x as u32)),
    }
}

pub fn get_highest_tile_val(board: Board) -> Tile {
    match (0..16).map(|idx| extract_tile(board, idx)).max().unwrap_or(0) {
        0 => 0,
        exp => 2_u64.pow(exp as u32),
    }
}
