//! Fixed-size square bitboards using const generics.
//!
//! An `N×N` grid is packed row-major into the unsigned integer `T`, cell
//! `(row, col)` at bit `row * N + col`. [`crate::board`] wraps it in the typed
//! occupancy and attack grids.

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};
use num_traits::{PrimInt, Unsigned, Zero};
use serde::{Deserialize, Serialize};

/// A row or column outside `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBoardError {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell ({}, {}) is outside the board", self.row, self.col)
    }
}

impl std::error::Error for BitBoardError {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    const CELLS: usize = N * N;

    /// All `N * N` board bits set. Bits of `T` above the board stay clear.
    fn full() -> T {
        if Self::CELLS >= T::zero().count_zeros() as usize {
            !T::zero()
        } else {
            (T::one() << Self::CELLS) - T::one()
        }
    }

    /// Bits of one column; keeps sideways shifts from wrapping into the
    /// neighbouring row.
    fn column(col: usize) -> T {
        (0..N).fold(T::zero(), |acc, r| acc | (T::one() << (r * N + col)))
    }

    fn masked(bits: T) -> Self {
        Self {
            bits: bits & Self::full(),
        }
    }

    fn index(row: usize, col: usize) -> Result<usize, BitBoardError> {
        if row < N && col < N {
            Ok(row * N + col)
        } else {
            Err(BitBoardError { row, col })
        }
    }

    /// Empty board.
    pub fn new() -> Self {
        Self { bits: T::zero() }
    }

    /// Board with exactly the given `(row, col)` cells set.
    pub fn from_cells<I>(cells: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        cells.into_iter().try_fold(Self::new(), |mut board, (r, c)| {
            board.set(r, c)?;
            Ok(board)
        })
    }

    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        let idx = Self::index(row, col)?;
        Ok(!((self.bits >> idx) & T::one()).is_zero())
    }

    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        let idx = Self::index(row, col)?;
        self.bits = self.bits | (T::one() << idx);
        Ok(())
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Whether the two boards share a set cell.
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.bits & other.bits).is_zero()
    }

    /// Every cell within Chebyshev distance 1 of a set cell, the set cells
    /// included.
    pub fn halo(&self) -> Self {
        let b = self.bits;
        let row_spread = b | ((b & !Self::column(N - 1)) << 1) | ((b & !Self::column(0)) >> 1);
        Self::masked(row_spread | (row_spread << N) | (row_spread >> N))
    }

    /// Set cells as `(row, col)`, row-major.
    pub fn iter_set_bits(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..Self::CELLS)
            .filter(move |idx| !((self.bits >> *idx) & T::one()).is_zero())
            .map(|idx| (idx / N, idx % N))
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBoard<{}>{:?}", N, self.iter_set_bits().collect::<Vec<_>>())
    }
}

impl<T, const N: usize> fmt::Display for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..N {
            let line: String = (0..N)
                .map(|c| if self.get(r, c).unwrap_or(false) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl<T, const N: usize> BitAnd for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self::masked(self.bits & rhs.bits)
    }
}

impl<T, const N: usize> BitOr for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self::masked(self.bits | rhs.bits)
    }
}

/// Complement within the board; bits above `N * N` stay clear.
impl<T, const N: usize> Not for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn not(self) -> Self {
        Self::masked(!self.bits)
    }
}
