//! Row iteration shared by the primitives.
//!
//! Rows are independent for every operation in this crate, so with the
//! `parallel` feature they are handed to rayon's global pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `width`-long row of `data`.
pub(crate) fn for_each_row<F>(data: &mut [u8], width: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if width == 0 || data.is_empty() {
        return;
    }

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_visited_once() {
        let mut data = vec![0u8; 12];
        for_each_row(&mut data, 4, |y, row| row.fill(y as u8 + 1));
        assert_eq!(data, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn test_zero_width_is_noop() {
        let mut data: Vec<u8> = Vec::new();
        for_each_row(&mut data, 0, |_, _| panic!("no rows expected"));
    }
}
